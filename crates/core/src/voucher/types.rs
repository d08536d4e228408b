//! Document domain types for voucher generation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use partida_shared::types::{DocumentId, DocumentTypeId, FiscalPeriodId};

use crate::ledger::{JournalLineInput, LedgerError};

/// Legal document status.
///
/// Valid transitions: Draft → Approved, Draft → Cancelled,
/// Approved → Cancelled (blocked while posted vouchers exist).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Document is being drafted.
    Draft,
    /// Document has been approved and may generate vouchers.
    Approved,
    /// Document has been cancelled.
    Cancelled,
}

impl DocumentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "approved" => Some(Self::Approved),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Document fields the voucher bridge consumes.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    /// The document ID.
    pub id: DocumentId,
    /// The document type.
    pub document_type_id: DocumentTypeId,
    /// Human-facing document number.
    pub document_number: String,
    /// Current status.
    pub status: DocumentStatus,
    /// Document date.
    pub document_date: NaiveDate,
    /// Document total.
    pub total_amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Exchange rate multiplier.
    pub exchange_rate: Decimal,
    /// Fiscal period the document belongs to.
    pub fiscal_period_id: FiscalPeriodId,
}

/// Pluggable per-document-type mapping from a document to journal lines.
///
/// The accounting treatment of each document type (which accounts to
/// debit and credit for a disbursement, a collection, an adjustment, …)
/// lives outside the ledger core; implementations of this trait supply it.
pub trait VoucherLineBuilder {
    /// Builds the journal lines for a document.
    ///
    /// # Errors
    ///
    /// Returns a `LedgerError` when the document cannot be mapped
    /// (the resulting lines are validated again by the entry store).
    fn build_lines(&self, document: &DocumentInfo) -> Result<Vec<JournalLineInput>, LedgerError>;

    /// Whether the generated entry should be posted immediately after
    /// creation instead of staying in draft.
    fn post_immediately(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            DocumentStatus::Draft,
            DocumentStatus::Approved,
            DocumentStatus::Cancelled,
        ] {
            assert_eq!(DocumentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DocumentStatus::parse("posted"), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(DocumentStatus::Approved.to_string(), "approved");
    }
}
