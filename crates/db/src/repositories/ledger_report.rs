//! Ledger reporting queries: Libro Mayor and Balance de Comprobación.
//!
//! Reporting reads never open a transaction; they only ever consider
//! entries with `posted` status, so draft data is never exposed to
//! financial reports. All balance math is delegated to the core crate.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use partida_core::ledger::balance::{
    build_account_ledger, opening_balance, AccountLedger, MovementRow,
};
use partida_core::ledger::LedgerError;
use partida_core::reports::{build_trial_balance, AccountActivity, TrialBalance};
use partida_shared::types::{
    AccountId, FiscalPeriodId, JournalEntryId, JournalLineId, ThirdPartyId,
};

use crate::entities::{
    chart_of_accounts, journal_entries, journal_lines, sea_orm_active_enums::EntryStatus,
};

use super::account::account_info;
use super::StoreError;

/// Read-only repository for ledger reports.
#[derive(Debug, Clone)]
pub struct LedgerReportRepository {
    db: DatabaseConnection,
}

impl LedgerReportRepository {
    /// Creates a new ledger report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the Libro Mayor for one account.
    ///
    /// The opening balance aggregates every posted line dated strictly
    /// before `date_from` (zero when no lower bound is given); movements
    /// within the range carry running balances in
    /// `(entry_date ASC, entry_number ASC)` order.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown account.
    pub async fn account_ledger(
        &self,
        account_id: AccountId,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        fiscal_period_id: Option<FiscalPeriodId>,
    ) -> Result<AccountLedger, StoreError> {
        let account_row = chart_of_accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        let account = account_info(account_row);

        let opening = match date_from {
            Some(from) => {
                let prior_entries = self
                    .posted_entries(None, Some(from), fiscal_period_id, true)
                    .await?;
                let prior_rows = self
                    .movement_rows(account_id, &prior_entries)
                    .await?;
                opening_balance(account.normal_balance, &prior_rows)
            }
            None => Decimal::ZERO,
        };

        let entries = self
            .posted_entries(date_from, date_to, fiscal_period_id, false)
            .await?;
        let movements = self.movement_rows(account_id, &entries).await?;

        Ok(build_account_ledger(account, opening, movements))
    }

    /// Builds the Balance de Comprobación over a date range.
    ///
    /// Aggregates posted activity for every postable, active account;
    /// rows with no activity are dropped unless `include_zero_balances`.
    pub async fn trial_balance(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        fiscal_period_id: Option<FiscalPeriodId>,
        include_zero_balances: bool,
    ) -> Result<TrialBalance, StoreError> {
        let accounts = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::AllowsEntries.eq(true))
            .filter(chart_of_accounts::Column::IsActive.eq(true))
            .order_by_asc(chart_of_accounts::Column::Code)
            .all(&self.db)
            .await?;

        let entries = self
            .posted_entries(date_from, date_to, fiscal_period_id, false)
            .await?;

        let mut per_account: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
        if !entries.is_empty() {
            let entry_ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
            let lines = journal_lines::Entity::find()
                .filter(journal_lines::Column::EntryId.is_in(entry_ids))
                .all(&self.db)
                .await?;
            for line in lines {
                let slot = per_account
                    .entry(line.account_id)
                    .or_insert((Decimal::ZERO, Decimal::ZERO));
                slot.0 += line.debit_amount;
                slot.1 += line.credit_amount;
            }
        }

        let activity = accounts
            .into_iter()
            .map(|row| {
                let (total_debit, total_credit) = per_account
                    .get(&row.id)
                    .copied()
                    .unwrap_or((Decimal::ZERO, Decimal::ZERO));
                AccountActivity {
                    account_id: AccountId::from_uuid(row.id),
                    code: row.code,
                    name: row.name,
                    normal_balance: row.normal_balance.into(),
                    total_debit,
                    total_credit,
                }
            })
            .collect();

        Ok(build_trial_balance(activity, include_zero_balances))
    }

    /// Fetches posted entries, bounded by the given dates.
    ///
    /// With `strictly_before` set, `date_to` is an exclusive upper bound
    /// (used for opening balances); otherwise both bounds are inclusive.
    async fn posted_entries(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        fiscal_period_id: Option<FiscalPeriodId>,
        strictly_before: bool,
    ) -> Result<Vec<journal_entries::Model>, StoreError> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::Status.eq(EntryStatus::Posted));

        if let Some(from) = date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = date_to {
            query = if strictly_before {
                query.filter(journal_entries::Column::EntryDate.lt(to))
            } else {
                query.filter(journal_entries::Column::EntryDate.lte(to))
            };
        }
        if let Some(period_id) = fiscal_period_id {
            query = query
                .filter(journal_entries::Column::FiscalPeriodId.eq(period_id.into_inner()));
        }

        Ok(query
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_entries::Column::EntryNumber)
            .all(&self.db)
            .await?)
    }

    /// Loads one account's lines for the given entries as movement rows.
    async fn movement_rows(
        &self,
        account_id: AccountId,
        entries: &[journal_entries::Model],
    ) -> Result<Vec<MovementRow>, StoreError> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let headers: HashMap<Uuid, &journal_entries::Model> =
            entries.iter().map(|e| (e.id, e)).collect();
        let entry_ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::EntryId.is_in(entry_ids))
            .filter(journal_lines::Column::AccountId.eq(account_id.into_inner()))
            .order_by_asc(journal_lines::Column::LineNumber)
            .all(&self.db)
            .await?;

        let rows = lines
            .into_iter()
            .filter_map(|line| {
                headers.get(&line.entry_id).map(|entry| MovementRow {
                    line_id: JournalLineId::from_uuid(line.id),
                    entry_id: JournalEntryId::from_uuid(line.entry_id),
                    entry_number: entry.entry_number.clone(),
                    entry_date: entry.entry_date,
                    description: line
                        .description
                        .clone()
                        .or_else(|| Some(entry.description.clone())),
                    debit_amount: line.debit_amount,
                    credit_amount: line.credit_amount,
                    third_party_id: line.third_party_id.map(ThirdPartyId::from_uuid),
                })
            })
            .collect();

        Ok(rows)
    }
}
