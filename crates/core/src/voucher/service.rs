//! Stateless voucher bridge rules.
//!
//! Pure precondition checks and header mapping for voucher generation and
//! document cancellation. The database layer runs these inside the same
//! transaction that persists the outcome.

use partida_shared::types::{JournalEntryId, VoucherTypeId};

use super::types::{DocumentInfo, DocumentStatus};
use crate::ledger::{CreateEntryInput, EntryStatus, JournalLineInput, LedgerError, SourceDocumentRef};

/// Stateless service for document/voucher coordination rules.
pub struct VoucherBridge;

impl VoucherBridge {
    /// Validates that a voucher may be generated from a document.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotApproved` unless the document is approved.
    pub fn validate_can_generate(document: &DocumentInfo) -> Result<(), LedgerError> {
        match document.status {
            DocumentStatus::Approved => Ok(()),
            status => Err(LedgerError::DocumentNotApproved {
                document_id: document.id,
                status,
            }),
        }
    }

    /// Validates that no voucher exists yet for the document/type pair.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateVoucher` when any entry, whatever its status,
    /// already links the pair.
    pub fn validate_no_existing_voucher(
        document: &DocumentInfo,
        voucher_type_id: VoucherTypeId,
        existing: Option<JournalEntryId>,
    ) -> Result<(), LedgerError> {
        match existing {
            None => Ok(()),
            Some(_) => Err(LedgerError::DuplicateVoucher {
                document_id: document.id,
                voucher_type_id,
            }),
        }
    }

    /// Validates that a document can be cancelled given its linked entries.
    ///
    /// The check runs over the full linked entry set and must be evaluated
    /// under the same locks as the cascade itself, so a concurrent post
    /// cannot slip an entry into `posted` between check and cancel.
    ///
    /// # Errors
    ///
    /// Returns `DocumentAlreadyCancelled` for a cancelled document, or
    /// `PostedEntryBlocksCancellation` naming the first posted entry.
    pub fn validate_can_cancel(
        document: &DocumentInfo,
        linked_entries: &[(JournalEntryId, EntryStatus)],
    ) -> Result<(), LedgerError> {
        if document.status == DocumentStatus::Cancelled {
            return Err(LedgerError::DocumentAlreadyCancelled(document.id));
        }
        if let Some((entry_id, _)) = linked_entries
            .iter()
            .find(|(_, status)| *status == EntryStatus::Posted)
        {
            return Err(LedgerError::PostedEntryBlocksCancellation {
                entry_id: *entry_id,
            });
        }
        Ok(())
    }

    /// Builds the journal entry header for a document's voucher.
    ///
    /// Header fields (date, reference, currency, exchange rate, fiscal
    /// period) come from the document; the line set comes from the
    /// per-type `VoucherLineBuilder`.
    #[must_use]
    pub fn voucher_input(
        document: &DocumentInfo,
        voucher_type_id: VoucherTypeId,
        lines: Vec<JournalLineInput>,
    ) -> CreateEntryInput {
        CreateEntryInput {
            voucher_type_id,
            entry_number: None,
            entry_date: document.document_date,
            reference: Some(document.document_number.clone()),
            description: format!("Document {}", document.document_number),
            currency: document.currency.clone(),
            exchange_rate: document.exchange_rate,
            fiscal_period_id: Some(document.fiscal_period_id),
            lines,
            source_document: Some(SourceDocumentRef {
                document_type_id: document.document_type_id,
                document_id: document.id,
            }),
        }
    }
}
