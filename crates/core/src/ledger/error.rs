//! Ledger error types for validation and state errors.
//!
//! This module defines all errors that can occur during ledger operations:
//! validation errors, account errors, fiscal period errors, entry state
//! errors, and document/voucher conflicts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use partida_shared::error::ErrorKind;
use partida_shared::types::{
    AccountId, DocumentId, FiscalPeriodId, JournalEntryId, VoucherTypeId,
};

use super::types::EntryStatus;
use crate::voucher::DocumentStatus;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least one line.
    #[error("Entry must have at least one line")]
    EmptyLineSet,

    /// Entry is not balanced (debits != credits beyond tolerance).
    #[error("Entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Line must carry either a debit or a credit amount.
    #[error("Line {line} must carry a debit or a credit amount")]
    LineWithoutAmount {
        /// Zero-based line index.
        line: usize,
    },

    /// Line cannot carry both a debit and a credit amount.
    #[error("Line {line} cannot carry both a debit and a credit amount")]
    LineWithBothAmounts {
        /// Zero-based line index.
        line: usize,
    },

    /// Line amounts cannot be negative.
    #[error("Line {line} amount cannot be negative")]
    NegativeAmount {
        /// Zero-based line index.
        line: usize,
    },

    /// Exchange rate must be positive.
    #[error("Exchange rate must be positive")]
    InvalidExchangeRate,

    /// Cancellation requires a reason.
    #[error("Cancellation requires a reason")]
    CancelReasonRequired,

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is inactive and cannot receive lines.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Account does not allow journal lines (non-leaf account).
    #[error("Account {0} does not allow journal lines")]
    AccountNotPostable(AccountId),

    /// Voucher type not found.
    #[error("Voucher type not found: {0}")]
    VoucherTypeNotFound(VoucherTypeId),

    // ========== Fiscal Period Errors ==========
    /// Fiscal period not found.
    #[error("Fiscal period not found: {0}")]
    PeriodNotFound(FiscalPeriodId),

    /// No fiscal period covers the entry date.
    #[error("No fiscal period found for date {0}")]
    NoPeriodForDate(NaiveDate),

    /// Fiscal period is closed, no posting allowed.
    #[error("Fiscal period {0} is closed, no posting allowed")]
    PeriodClosed(FiscalPeriodId),

    /// Entry date falls outside the fiscal period range.
    #[error("Date {date} is outside fiscal period range {start}..={end}")]
    DateOutsidePeriod {
        /// The entry date.
        date: NaiveDate,
        /// Period start date.
        start: NaiveDate,
        /// Period end date.
        end: NaiveDate,
    },

    // ========== Entry State Errors ==========
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Status transition not in the transition table.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: EntryStatus,
        /// Requested status.
        to: EntryStatus,
    },

    /// Only draft entries can be modified.
    #[error("Cannot modify {0} entry; only draft entries are editable")]
    NotEditable(EntryStatus),

    /// Only draft entries can be deleted.
    #[error("Can only delete draft entries")]
    OnlyDraftDeletable,

    // ========== Document / Voucher Errors ==========
    /// Legal document not found.
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// Voucher generation requires an approved document.
    #[error("Document {document_id} is {status}, vouchers require an approved document")]
    DocumentNotApproved {
        /// The document.
        document_id: DocumentId,
        /// Its current status.
        status: DocumentStatus,
    },

    /// Document already cancelled.
    #[error("Document {0} is already cancelled")]
    DocumentAlreadyCancelled(DocumentId),

    /// A voucher already exists for this document/voucher-type pair.
    #[error("Voucher already exists for document {document_id} and voucher type {voucher_type_id}")]
    DuplicateVoucher {
        /// The document.
        document_id: DocumentId,
        /// The voucher type.
        voucher_type_id: VoucherTypeId,
    },

    /// Posted entries block document cancellation.
    #[error("Cannot cancel document: entry {entry_id} is posted; reverse it first")]
    PostedEntryBlocksCancellation {
        /// The blocking posted entry.
        entry_id: JournalEntryId,
    },
}

impl LedgerError {
    /// Returns the stable error code for external consumers.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyLineSet => "EMPTY_LINE_SET",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::LineWithoutAmount { .. } => "LINE_WITHOUT_AMOUNT",
            Self::LineWithBothAmounts { .. } => "LINE_WITH_BOTH_AMOUNTS",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::InvalidExchangeRate => "INVALID_EXCHANGE_RATE",
            Self::CancelReasonRequired => "CANCEL_REASON_REQUIRED",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::AccountNotPostable(_) => "ACCOUNT_NOT_POSTABLE",
            Self::VoucherTypeNotFound(_) => "VOUCHER_TYPE_NOT_FOUND",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::NoPeriodForDate(_) => "NO_PERIOD_FOR_DATE",
            Self::PeriodClosed(_) => "PERIOD_CLOSED",
            Self::DateOutsidePeriod { .. } => "DATE_OUTSIDE_PERIOD",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotEditable(_) => "NOT_EDITABLE",
            Self::OnlyDraftDeletable => "ONLY_DRAFT_DELETABLE",
            Self::DocumentNotFound(_) => "DOCUMENT_NOT_FOUND",
            Self::DocumentNotApproved { .. } => "DOCUMENT_NOT_APPROVED",
            Self::DocumentAlreadyCancelled(_) => "DOCUMENT_ALREADY_CANCELLED",
            Self::DuplicateVoucher { .. } => "DUPLICATE_VOUCHER",
            Self::PostedEntryBlocksCancellation { .. } => "POSTED_ENTRY_BLOCKS_CANCELLATION",
        }
    }

    /// Returns the classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyLineSet
            | Self::UnbalancedEntry { .. }
            | Self::LineWithoutAmount { .. }
            | Self::LineWithBothAmounts { .. }
            | Self::NegativeAmount { .. }
            | Self::InvalidExchangeRate
            | Self::CancelReasonRequired
            | Self::AccountInactive(_)
            | Self::AccountNotPostable(_)
            | Self::PeriodClosed(_)
            | Self::DateOutsidePeriod { .. } => ErrorKind::Validation,

            Self::AccountNotFound(_)
            | Self::VoucherTypeNotFound(_)
            | Self::PeriodNotFound(_)
            | Self::NoPeriodForDate(_)
            | Self::EntryNotFound(_)
            | Self::DocumentNotFound(_) => ErrorKind::NotFound,

            Self::InvalidTransition { .. }
            | Self::NotEditable(_)
            | Self::OnlyDraftDeletable
            | Self::DocumentNotApproved { .. }
            | Self::DocumentAlreadyCancelled(_) => ErrorKind::InvalidState,

            Self::DuplicateVoucher { .. } | Self::PostedEntryBlocksCancellation { .. } => {
                ErrorKind::Conflict
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::EmptyLineSet.error_code(), "EMPTY_LINE_SET");
        assert_eq!(
            LedgerError::UnbalancedEntry {
                debit: dec!(50),
                credit: dec!(40),
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(
            LedgerError::OnlyDraftDeletable.error_code(),
            "ONLY_DRAFT_DELETABLE"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(LedgerError::EmptyLineSet.kind(), ErrorKind::Validation);
        assert_eq!(
            LedgerError::AccountNotFound(AccountId::new()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LedgerError::InvalidTransition {
                from: EntryStatus::Posted,
                to: EntryStatus::Draft,
            }
            .kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            LedgerError::DuplicateVoucher {
                document_id: DocumentId::new(),
                voucher_type_id: VoucherTypeId::new(),
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            LedgerError::PostedEntryBlocksCancellation {
                entry_id: JournalEntryId::new(),
            }
            .kind(),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::UnbalancedEntry {
            debit: dec!(100.00),
            credit: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Entry is not balanced. Debit: 100.00, Credit: 50.00"
        );

        let err = LedgerError::InvalidTransition {
            from: EntryStatus::Posted,
            to: EntryStatus::Draft,
        };
        assert_eq!(
            err.to_string(),
            "Invalid status transition from posted to draft"
        );
    }
}
