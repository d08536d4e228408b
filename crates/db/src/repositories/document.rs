//! Document/voucher bridge repository.
//!
//! Coordinates the two-sided lifecycle between a legal document and its
//! derived journal entries. Both directions run as one transaction with
//! the document row and its linked entries locked, so "check for posted
//! entries" and "cancel everything" are a single atomic step; a
//! concurrent post cannot land between them.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use partida_core::ledger::{EntryStatus, LedgerError};
use partida_core::voucher::{DocumentInfo, VoucherBridge, VoucherLineBuilder};
use partida_shared::types::{
    DocumentId, DocumentTypeId, FiscalPeriodId, JournalEntryId, UserId, VoucherTypeId,
};

use crate::entities::{journal_entries, legal_documents, sea_orm_active_enums};

use super::journal_entry::{insert_entry, post_entry, EntryWithLines};
use super::StoreError;

/// Maps a document row to the core view type.
pub(crate) fn document_info(model: &legal_documents::Model) -> DocumentInfo {
    DocumentInfo {
        id: DocumentId::from_uuid(model.id),
        document_type_id: DocumentTypeId::from_uuid(model.document_type_id),
        document_number: model.document_number.clone(),
        status: model.status.clone().into(),
        document_date: model.document_date,
        total_amount: model.total_amount,
        currency: model.currency.clone(),
        exchange_rate: model.exchange_rate,
        fiscal_period_id: FiscalPeriodId::from_uuid(model.fiscal_period_id),
    }
}

/// Repository coordinating documents and their derived vouchers.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a document by id.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` if no such document exists.
    pub async fn get(&self, document_id: DocumentId) -> Result<legal_documents::Model, StoreError> {
        legal_documents::Entity::find_by_id(document_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| LedgerError::DocumentNotFound(document_id).into())
    }

    /// Generates a journal entry from an approved document.
    ///
    /// The document must be approved and must not already have an entry
    /// for this voucher type. The line set comes from the per-type
    /// `VoucherLineBuilder`; the entry is created in draft and posted in
    /// the same transaction when the builder marks it immediately
    /// postable.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotApproved`, `DuplicateVoucher`, or any entry
    /// validation error.
    pub async fn generate_voucher(
        &self,
        document_id: DocumentId,
        voucher_type_id: VoucherTypeId,
        builder: &dyn VoucherLineBuilder,
        actor: UserId,
    ) -> Result<EntryWithLines, StoreError> {
        let txn = self.db.begin().await?;

        let document = find_document_locked(&txn, document_id).await?;
        let document = document_info(&document);

        VoucherBridge::validate_can_generate(&document)?;

        let existing = journal_entries::Entity::find()
            .filter(journal_entries::Column::DocumentId.eq(document_id.into_inner()))
            .filter(journal_entries::Column::VoucherTypeId.eq(voucher_type_id.into_inner()))
            .one(&txn)
            .await?
            .map(|entry| JournalEntryId::from_uuid(entry.id));
        VoucherBridge::validate_no_existing_voucher(&document, voucher_type_id, existing)?;

        let lines = builder.build_lines(&document)?;
        let input = VoucherBridge::voucher_input(&document, voucher_type_id, lines);

        let mut created = insert_entry(&txn, input, actor).await?;
        if builder.post_immediately() {
            created.entry = post_entry(&txn, created.entry, actor).await?;
        }

        txn.commit().await?;

        info!(
            document_id = %document_id,
            entry_id = %created.entry.id,
            entry_number = %created.entry.entry_number,
            "voucher generated from document"
        );
        Ok(created)
    }

    /// Cancels a document and cascades to its non-posted entries.
    ///
    /// Fails when any linked entry is posted: the ledger must be unwound
    /// first by reversing that entry. Otherwise every linked draft entry
    /// is cancelled with the document's reason, and the document itself is
    /// marked cancelled, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `CancelReasonRequired`, `DocumentAlreadyCancelled`, or
    /// `PostedEntryBlocksCancellation` naming the blocking entry.
    pub async fn cancel_document(
        &self,
        document_id: DocumentId,
        reason: &str,
        actor: UserId,
    ) -> Result<legal_documents::Model, StoreError> {
        if reason.trim().is_empty() {
            return Err(LedgerError::CancelReasonRequired.into());
        }

        let txn = self.db.begin().await?;

        let document = find_document_locked(&txn, document_id).await?;
        let info_view = document_info(&document);

        let linked = journal_entries::Entity::find()
            .filter(journal_entries::Column::DocumentId.eq(document_id.into_inner()))
            .lock_exclusive()
            .all(&txn)
            .await?;

        let statuses: Vec<(JournalEntryId, EntryStatus)> = linked
            .iter()
            .map(|entry| {
                (
                    JournalEntryId::from_uuid(entry.id),
                    entry.status.clone().into(),
                )
            })
            .collect();
        VoucherBridge::validate_can_cancel(&info_view, &statuses)?;

        let now = Utc::now().into();
        for entry in linked {
            let status: EntryStatus = entry.status.clone().into();
            if status != EntryStatus::Draft {
                continue;
            }
            let mut active: journal_entries::ActiveModel = entry.into();
            active.status = Set(sea_orm_active_enums::EntryStatus::Cancelled);
            active.cancelled_at = Set(Some(now));
            active.cancel_reason = Set(Some(reason.to_string()));
            active.updated_at = Set(now);
            active.update(&txn).await?;
        }

        let mut active: legal_documents::ActiveModel = document.into();
        active.status = Set(sea_orm_active_enums::DocumentStatus::Cancelled);
        active.cancel_reason = Set(Some(reason.to_string()));
        active.cancelled_by = Set(Some(actor.into_inner()));
        active.cancelled_at = Set(Some(now));
        active.updated_at = Set(now);
        let document = active.update(&txn).await?;

        txn.commit().await?;

        info!(document_id = %document_id, "document cancelled with its draft vouchers");
        Ok(document)
    }
}

/// Fetches a document under `SELECT … FOR UPDATE`.
async fn find_document_locked(
    txn: &DatabaseTransaction,
    document_id: DocumentId,
) -> Result<legal_documents::Model, StoreError> {
    legal_documents::Entity::find_by_id(document_id.into_inner())
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| LedgerError::DocumentNotFound(document_id).into())
}
