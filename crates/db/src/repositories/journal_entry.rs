//! Journal entry store.
//!
//! Owns journal-entry headers and their lines. Every mutation runs inside
//! a single database transaction spanning all of its reads and writes: a
//! header is never observable without its full line set, and a failed
//! validation leaves the store untouched. Status transitions go through
//! the core transition table; the header row is locked before any
//! transition so concurrent mutations of the same entry serialize.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use partida_core::ledger::{
    validate_exchange_rate, validate_lines, CreateEntryInput, EntryStatus, EntryTotals,
    JournalLineInput, LedgerError,
};
use partida_shared::types::money::within_tolerance;
use partida_shared::types::{
    AccountId, FiscalPeriodId, JournalEntryId, PageRequest, PageResponse, ThirdPartyId, UserId,
};

use crate::entities::{journal_entries, journal_lines, sea_orm_active_enums};

use super::{account, fiscal, sequence, StoreError};

/// A journal entry header with its ordered line set.
#[derive(Debug, Clone)]
pub struct EntryWithLines {
    /// The entry header.
    pub entry: journal_entries::Model,
    /// The lines, ordered by line number.
    pub lines: Vec<journal_lines::Model>,
}

/// Libro Diario filter options.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Entries dated on or after this date.
    pub date_from: Option<NaiveDate>,
    /// Entries dated on or before this date.
    pub date_to: Option<NaiveDate>,
    /// Filter by status.
    pub status: Option<EntryStatus>,
    /// Entries with at least one line for this third party.
    pub third_party_id: Option<ThirdPartyId>,
    /// Filter by fiscal period.
    pub fiscal_period_id: Option<FiscalPeriodId>,
    /// Entry numbers starting with this prefix.
    pub entry_number_prefix: Option<String>,
}

/// Input for replacing a draft entry's header and lines.
#[derive(Debug, Clone)]
pub struct UpdateEntryInput {
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Optional external reference.
    pub reference: Option<String>,
    /// Entry description.
    pub description: String,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Exchange rate multiplier.
    pub exchange_rate: Decimal,
    /// Fiscal period; resolved from `entry_date` when absent.
    pub fiscal_period_id: Option<FiscalPeriodId>,
    /// The replacement line set.
    pub lines: Vec<JournalLineInput>,
}

/// Journal entry repository.
#[derive(Debug, Clone)]
pub struct JournalEntryRepository {
    db: DatabaseConnection,
}

impl JournalEntryRepository {
    /// Creates a new journal entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a journal entry in draft status.
    ///
    /// Allocates the entry number from the voucher type's sequence when the
    /// caller did not supply one. Header and lines are persisted in one
    /// transaction together with the sequence increment.
    ///
    /// # Errors
    ///
    /// Returns a validation error (unbalanced, empty, malformed line,
    /// inactive or non-postable account, closed period) or a not-found
    /// error for a missing account, period, or voucher type.
    pub async fn create(
        &self,
        input: CreateEntryInput,
        created_by: UserId,
    ) -> Result<EntryWithLines, StoreError> {
        let txn = self.db.begin().await?;
        let created = insert_entry(&txn, input, created_by).await?;
        txn.commit().await?;

        info!(
            entry_id = %created.entry.id,
            entry_number = %created.entry.entry_number,
            "journal entry created"
        );
        Ok(created)
    }

    /// Replaces a draft entry's header and lines.
    ///
    /// The line set is replaced wholesale (delete then reinsert) in the
    /// same transaction as the header update, and the totals are
    /// recomputed from the new lines.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` unless the entry is in draft status, plus any
    /// validation error from the replacement lines.
    pub async fn update(
        &self,
        entry_id: JournalEntryId,
        input: UpdateEntryInput,
        _actor: UserId,
    ) -> Result<EntryWithLines, StoreError> {
        validate_exchange_rate(input.exchange_rate)?;

        let txn = self.db.begin().await?;

        let entry = find_locked(&txn, entry_id).await?;
        let status: EntryStatus = entry.status.clone().into();
        if !status.is_editable() {
            return Err(LedgerError::NotEditable(status).into());
        }

        let period = match input.fiscal_period_id {
            Some(id) => fiscal::find_period(&txn, id).await?,
            None => fiscal::find_period_for_date(&txn, input.entry_date).await?,
        };
        period.validate_postable(input.entry_date)?;

        let totals = validate_line_set(&txn, &input.lines).await?;

        journal_lines::Entity::delete_many()
            .filter(journal_lines::Column::EntryId.eq(entry.id))
            .exec(&txn)
            .await?;
        let lines = insert_lines(&txn, entry.id, &input.lines).await?;

        let now = Utc::now().into();
        let mut active: journal_entries::ActiveModel = entry.into();
        active.entry_date = Set(input.entry_date);
        active.reference = Set(input.reference);
        active.description = Set(input.description);
        active.currency = Set(input.currency);
        active.exchange_rate = Set(input.exchange_rate);
        active.fiscal_period_id = Set(period.id.into_inner());
        active.total_debit = Set(totals.total_debit);
        active.total_credit = Set(totals.total_credit);
        active.updated_at = Set(now);
        let entry = active.update(&txn).await?;

        txn.commit().await?;

        info!(entry_id = %entry.id, "journal entry updated");
        Ok(EntryWithLines { entry, lines })
    }

    /// Posts a draft entry, making it count toward account balances.
    ///
    /// Balance and period openness are re-validated at transition time
    /// from the stored data, not from the creation-time inputs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the entry is in draft status.
    pub async fn post(
        &self,
        entry_id: JournalEntryId,
        actor: UserId,
    ) -> Result<EntryWithLines, StoreError> {
        let txn = self.db.begin().await?;

        let entry = find_locked(&txn, entry_id).await?;
        let entry = post_entry(&txn, entry, actor).await?;
        let lines = load_lines(&txn, entry.id).await?;

        txn.commit().await?;

        info!(
            entry_id = %entry.id,
            entry_number = %entry.entry_number,
            "journal entry posted"
        );
        Ok(EntryWithLines { entry, lines })
    }

    /// Reverses a posted entry.
    ///
    /// Reversal is a logical flag: the movement is never deleted and stays
    /// visible in journal queries, but balance computations (which only
    /// consider posted lines) exclude it from this point on.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the entry is in posted status.
    pub async fn reverse(
        &self,
        entry_id: JournalEntryId,
        actor: UserId,
    ) -> Result<EntryWithLines, StoreError> {
        let txn = self.db.begin().await?;

        let entry = find_locked(&txn, entry_id).await?;
        let status: EntryStatus = entry.status.clone().into();
        if !status.can_transition_to(EntryStatus::Reversed) {
            return Err(LedgerError::InvalidTransition {
                from: status,
                to: EntryStatus::Reversed,
            }
            .into());
        }

        let now = Utc::now().into();
        let mut active: journal_entries::ActiveModel = entry.into();
        active.status = Set(sea_orm_active_enums::EntryStatus::Reversed);
        active.reversed_by = Set(Some(actor.into_inner()));
        active.reversed_at = Set(Some(now));
        active.updated_at = Set(now);
        let entry = active.update(&txn).await?;
        let lines = load_lines(&txn, entry.id).await?;

        txn.commit().await?;

        info!(
            entry_id = %entry.id,
            entry_number = %entry.entry_number,
            "journal entry reversed"
        );
        Ok(EntryWithLines { entry, lines })
    }

    /// Deletes a draft entry and its lines.
    ///
    /// # Errors
    ///
    /// Returns `OnlyDraftDeletable` for any non-draft entry.
    pub async fn delete(
        &self,
        entry_id: JournalEntryId,
        _actor: UserId,
    ) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;

        let entry = find_locked(&txn, entry_id).await?;
        let status: EntryStatus = entry.status.clone().into();
        if status != EntryStatus::Draft {
            return Err(LedgerError::OnlyDraftDeletable.into());
        }

        // Lines go with the header via ON DELETE CASCADE
        journal_entries::Entity::delete_by_id(entry.id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(entry_id = %entry_id, "journal entry deleted");
        Ok(())
    }

    /// Gets an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if no such entry exists.
    pub async fn get(&self, entry_id: JournalEntryId) -> Result<EntryWithLines, StoreError> {
        let entry = journal_entries::Entity::find_by_id(entry_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        let lines = load_lines(&self.db, entry.id).await?;
        Ok(EntryWithLines { entry, lines })
    }

    /// Lists journal entries (Libro Diario) with filters and pagination.
    ///
    /// Entries are ordered by `(entry_date ASC, entry_number ASC)`; the
    /// response carries the total match count for pagination.
    pub async fn list(
        &self,
        filter: &JournalFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<journal_entries::Model>, StoreError> {
        let mut query = journal_entries::Entity::find();

        if let Some(date_from) = filter.date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(journal_entries::Column::EntryDate.lte(date_to));
        }
        if let Some(status) = filter.status {
            let status: sea_orm_active_enums::EntryStatus = status.into();
            query = query.filter(journal_entries::Column::Status.eq(status));
        }
        if let Some(period_id) = filter.fiscal_period_id {
            query = query
                .filter(journal_entries::Column::FiscalPeriodId.eq(period_id.into_inner()));
        }
        if let Some(prefix) = &filter.entry_number_prefix {
            query = query.filter(journal_entries::Column::EntryNumber.starts_with(prefix));
        }
        if let Some(third_party_id) = filter.third_party_id {
            let lines_for_third_party = Query::select()
                .column(journal_lines::Column::EntryId)
                .from(journal_lines::Entity)
                .and_where(
                    Expr::col(journal_lines::Column::ThirdPartyId)
                        .eq(third_party_id.into_inner()),
                )
                .to_owned();
            query =
                query.filter(journal_entries::Column::Id.in_subquery(lines_for_third_party));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_entries::Column::EntryNumber)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(rows, page, total))
    }
}

// ============================================================================
// Transaction-scoped helpers (shared with the document bridge)
// ============================================================================

/// Inserts a validated entry with its lines inside `txn`.
pub(crate) async fn insert_entry(
    txn: &DatabaseTransaction,
    input: CreateEntryInput,
    created_by: UserId,
) -> Result<EntryWithLines, StoreError> {
    validate_exchange_rate(input.exchange_rate)?;

    let period = match input.fiscal_period_id {
        Some(id) => fiscal::find_period(txn, id).await?,
        None => fiscal::find_period_for_date(txn, input.entry_date).await?,
    };
    period.validate_postable(input.entry_date)?;

    let totals = validate_line_set(txn, &input.lines).await?;

    let voucher_type = sequence::find_voucher_type(txn, input.voucher_type_id).await?;
    let entry_number = match input.entry_number {
        Some(number) => number,
        None => sequence::next_entry_number(txn, &voucher_type).await?,
    };

    let now = Utc::now().into();
    let entry = journal_entries::ActiveModel {
        id: Set(Uuid::now_v7()),
        voucher_type_id: Set(voucher_type.id),
        entry_number: Set(entry_number),
        entry_date: Set(input.entry_date),
        reference: Set(input.reference),
        description: Set(input.description),
        currency: Set(input.currency),
        exchange_rate: Set(input.exchange_rate),
        fiscal_period_id: Set(period.id.into_inner()),
        status: Set(sea_orm_active_enums::EntryStatus::Draft),
        total_debit: Set(totals.total_debit),
        total_credit: Set(totals.total_credit),
        document_type_id: Set(input
            .source_document
            .map(|doc| doc.document_type_id.into_inner())),
        document_id: Set(input.source_document.map(|doc| doc.document_id.into_inner())),
        created_by: Set(created_by.into_inner()),
        posted_by: Set(None),
        posted_at: Set(None),
        reversed_by: Set(None),
        reversed_at: Set(None),
        cancelled_at: Set(None),
        cancel_reason: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await?;

    let lines = insert_lines(txn, entry.id, &input.lines).await?;

    Ok(EntryWithLines { entry, lines })
}

/// Posts an already-locked entry after re-validating it.
pub(crate) async fn post_entry(
    txn: &DatabaseTransaction,
    entry: journal_entries::Model,
    actor: UserId,
) -> Result<journal_entries::Model, StoreError> {
    let status: EntryStatus = entry.status.clone().into();
    if !status.can_transition_to(EntryStatus::Posted) {
        return Err(LedgerError::InvalidTransition {
            from: status,
            to: EntryStatus::Posted,
        }
        .into());
    }

    // The stored data may have drifted since creation; re-check the
    // invariants that posting locks in.
    let lines = load_lines(txn, entry.id).await?;
    if lines.is_empty() {
        return Err(LedgerError::EmptyLineSet.into());
    }
    let totals = stored_totals(&lines);
    if !within_tolerance(totals.total_debit, totals.total_credit) {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.total_debit,
            credit: totals.total_credit,
        }
        .into());
    }

    let period =
        fiscal::find_period(txn, FiscalPeriodId::from_uuid(entry.fiscal_period_id)).await?;
    period.validate_postable(entry.entry_date)?;

    let now = Utc::now().into();
    let mut active: journal_entries::ActiveModel = entry.into();
    active.status = Set(sea_orm_active_enums::EntryStatus::Posted);
    active.posted_by = Set(Some(actor.into_inner()));
    active.posted_at = Set(Some(now));
    active.updated_at = Set(now);
    Ok(active.update(txn).await?)
}

/// Fetches an entry header under `SELECT … FOR UPDATE`.
pub(crate) async fn find_locked(
    txn: &DatabaseTransaction,
    entry_id: JournalEntryId,
) -> Result<journal_entries::Model, StoreError> {
    journal_entries::Entity::find_by_id(entry_id.into_inner())
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| LedgerError::EntryNotFound(entry_id).into())
}

/// Validates a line set against the accounts it references.
async fn validate_line_set<C: sea_orm::ConnectionTrait>(
    conn: &C,
    lines: &[JournalLineInput],
) -> Result<EntryTotals, StoreError> {
    let account_ids: Vec<Uuid> = lines.iter().map(|l| l.account_id.into_inner()).collect();
    let accounts = account::load_accounts(conn, &account_ids).await?;

    let totals = validate_lines(lines, |id: AccountId| {
        accounts
            .get(&id.into_inner())
            .cloned()
            .ok_or(LedgerError::AccountNotFound(id))
    })?;
    Ok(totals)
}

/// Inserts a line set for an entry, numbering lines from 1.
async fn insert_lines(
    txn: &DatabaseTransaction,
    entry_id: Uuid,
    lines: &[JournalLineInput],
) -> Result<Vec<journal_lines::Model>, StoreError> {
    let now = Utc::now().into();
    let mut inserted = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        let line_number = i32::try_from(index).unwrap_or(i32::MAX - 1) + 1;
        let model = journal_lines::ActiveModel {
            id: Set(Uuid::now_v7()),
            entry_id: Set(entry_id),
            line_number: Set(line_number),
            account_id: Set(line.account_id.into_inner()),
            description: Set(line.description.clone()),
            debit_amount: Set(line.debit_amount),
            credit_amount: Set(line.credit_amount),
            third_party_id: Set(line.third_party_id.map(ThirdPartyId::into_inner)),
            created_at: Set(now),
        }
        .insert(txn)
        .await?;
        inserted.push(model);
    }

    Ok(inserted)
}

/// Loads an entry's lines ordered by line number.
pub(crate) async fn load_lines<C: sea_orm::ConnectionTrait>(
    conn: &C,
    entry_id: Uuid,
) -> Result<Vec<journal_lines::Model>, StoreError> {
    Ok(journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.eq(entry_id))
        .order_by_asc(journal_lines::Column::LineNumber)
        .all(conn)
        .await?)
}

/// Recomputes totals from stored lines.
fn stored_totals(lines: &[journal_lines::Model]) -> EntryTotals {
    EntryTotals {
        total_debit: lines.iter().map(|l| l.debit_amount).sum(),
        total_credit: lines.iter().map(|l| l.credit_amount).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn stored_line(debit: Decimal, credit: Decimal) -> journal_lines::Model {
        journal_lines::Model {
            id: Uuid::now_v7(),
            entry_id: Uuid::now_v7(),
            line_number: 1,
            account_id: Uuid::now_v7(),
            description: None,
            debit_amount: debit,
            credit_amount: credit,
            third_party_id: None,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_stored_totals_recomputed_from_lines() {
        let lines = vec![
            stored_line(dec!(100), dec!(0)),
            stored_line(dec!(0), dec!(60)),
            stored_line(dec!(0), dec!(40)),
        ];
        let totals = stored_totals(&lines);
        assert_eq!(totals.total_debit, dec!(100));
        assert_eq!(totals.total_credit, dec!(100));
        assert!(totals.is_balanced());
    }

    #[test]
    fn test_filter_default_is_unfiltered() {
        let filter = JournalFilter::default();
        assert!(filter.date_from.is_none());
        assert!(filter.date_to.is_none());
        assert!(filter.status.is_none());
        assert!(filter.third_party_id.is_none());
        assert!(filter.fiscal_period_id.is_none());
        assert!(filter.entry_number_prefix.is_none());
    }
}
