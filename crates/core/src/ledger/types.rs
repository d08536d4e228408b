//! Journal entry domain types.
//!
//! This module defines the core types used for creating and validating
//! journal entries in the double-entry bookkeeping system, including the
//! entry state machine and the normal-balance polarity of accounts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use partida_shared::types::money::within_tolerance;
use partida_shared::types::{
    AccountId, DocumentId, DocumentTypeId, FiscalPeriodId, ThirdPartyId, VoucherTypeId,
};

/// Journal entry status.
///
/// Entries progress through these states from creation to posting.
/// The valid transitions are:
/// - Draft → Posted (post)
/// - Draft → Cancelled (document cancellation cascade)
/// - Posted → Reversed (reverse)
///
/// Draft entries may also be deleted outright; no transition ever
/// re-enters Draft, and Reversed/Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted and can be modified.
    Draft,
    /// Entry has been posted to the ledger (immutable, counts toward balances).
    Posted,
    /// Entry has been reversed; the movement remains in history but no
    /// longer contributes to balances.
    Reversed,
    /// Entry was cancelled before posting (document cancellation cascade).
    Cancelled,
}

impl EntryStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Reversed => "reversed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "posted" => Some(Self::Posted),
            "reversed" => Some(Self::Reversed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the entry can be modified or deleted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry contributes to account balances.
    #[must_use]
    pub fn counts_toward_balances(&self) -> bool {
        matches!(self, Self::Posted)
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Reversed | Self::Cancelled)
    }

    /// The transition table for the entry state machine.
    ///
    /// Every status mutation in the engine consults this single table;
    /// anything not listed here is rejected.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Posted | Self::Cancelled) | (Self::Posted, Self::Reversed)
        )
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normal-balance polarity of an account.
///
/// In double-entry bookkeeping:
/// - Debit-normal accounts (assets, expenses) grow with debits
/// - Credit-normal accounts (liabilities, equity, revenue) grow with credits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debit-normal account.
    Debit,
    /// Credit-normal account.
    Credit,
}

impl NormalBalance {
    /// Returns the signed balance contribution of a movement.
    ///
    /// Debit-normal accounts accumulate `debit - credit`; credit-normal
    /// accounts accumulate `credit - debit`.
    #[must_use]
    pub fn signed_delta(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Account metadata needed for validation and balance math.
///
/// Supplied by the chart-of-accounts gateway; the ledger engine consumes
/// but does not own accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// The account ID.
    pub id: AccountId,
    /// Hierarchical account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Normal-balance polarity.
    pub normal_balance: NormalBalance,
    /// Whether the account may receive journal lines (leaf accounts only).
    pub allows_entries: bool,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Input for a single journal line.
///
/// Exactly one of `debit_amount` / `credit_amount` must be positive;
/// the other must be zero.
#[derive(Debug, Clone)]
pub struct JournalLineInput {
    /// The account to post to (must allow entries).
    pub account_id: AccountId,
    /// Optional line description.
    pub description: Option<String>,
    /// Debit amount (zero if this is a credit line).
    pub debit_amount: Decimal,
    /// Credit amount (zero if this is a debit line).
    pub credit_amount: Decimal,
    /// Optional third party this movement relates to.
    pub third_party_id: Option<ThirdPartyId>,
}

impl JournalLineInput {
    /// Returns true if the line carries a debit amount.
    #[must_use]
    pub fn is_debit(&self) -> bool {
        self.debit_amount > Decimal::ZERO
    }
}

/// Reference from a journal entry back to its source legal document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocumentRef {
    /// The document type.
    pub document_type_id: DocumentTypeId,
    /// The document.
    pub document_id: DocumentId,
}

/// Input for creating a journal entry.
#[derive(Debug, Clone)]
pub struct CreateEntryInput {
    /// The voucher type, which drives document numbering.
    pub voucher_type_id: VoucherTypeId,
    /// Caller-supplied entry number; allocated from the sequence when absent.
    pub entry_number: Option<String>,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Optional external reference.
    pub reference: Option<String>,
    /// Entry description.
    pub description: String,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Exchange rate multiplier to the functional currency.
    pub exchange_rate: Decimal,
    /// Fiscal period; resolved from `entry_date` when absent.
    pub fiscal_period_id: Option<FiscalPeriodId>,
    /// The debit/credit lines (non-empty, balanced).
    pub lines: Vec<JournalLineInput>,
    /// Optional source legal document.
    pub source_document: Option<SourceDocumentRef>,
}

/// Derived debit/credit totals for an entry.
///
/// Totals are always recomputed from the line set; they are never accepted
/// from callers, so the stored header projection cannot drift from the
/// line data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Sum of all debit amounts.
    pub total_debit: Decimal,
    /// Sum of all credit amounts.
    pub total_credit: Decimal,
}

impl EntryTotals {
    /// Computes totals from a line set.
    #[must_use]
    pub fn from_lines(lines: &[JournalLineInput]) -> Self {
        Self {
            total_debit: lines.iter().map(|l| l.debit_amount).sum(),
            total_credit: lines.iter().map(|l| l.credit_amount).sum(),
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }

    /// Returns true if debits equal credits within the monetary tolerance.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        within_tolerance(self.total_debit, self.total_credit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_as_str_round_trip() {
        for status in [
            EntryStatus::Draft,
            EntryStatus::Posted,
            EntryStatus::Reversed,
            EntryStatus::Cancelled,
        ] {
            assert_eq!(EntryStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(EntryStatus::parse("invalid"), None);
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(EntryStatus::parse("POSTED"), Some(EntryStatus::Posted));
        assert_eq!(EntryStatus::parse("Draft"), Some(EntryStatus::Draft));
    }

    #[rstest]
    #[case(EntryStatus::Draft, EntryStatus::Posted, true)]
    #[case(EntryStatus::Draft, EntryStatus::Cancelled, true)]
    #[case(EntryStatus::Posted, EntryStatus::Reversed, true)]
    #[case(EntryStatus::Draft, EntryStatus::Reversed, false)]
    #[case(EntryStatus::Posted, EntryStatus::Posted, false)]
    #[case(EntryStatus::Posted, EntryStatus::Draft, false)]
    #[case(EntryStatus::Posted, EntryStatus::Cancelled, false)]
    #[case(EntryStatus::Reversed, EntryStatus::Posted, false)]
    #[case(EntryStatus::Reversed, EntryStatus::Draft, false)]
    #[case(EntryStatus::Cancelled, EntryStatus::Posted, false)]
    #[case(EntryStatus::Cancelled, EntryStatus::Draft, false)]
    fn test_transition_table(
        #[case] from: EntryStatus,
        #[case] to: EntryStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn test_status_predicates() {
        assert!(EntryStatus::Draft.is_editable());
        assert!(!EntryStatus::Posted.is_editable());
        assert!(EntryStatus::Posted.counts_toward_balances());
        assert!(!EntryStatus::Reversed.counts_toward_balances());
        assert!(!EntryStatus::Draft.counts_toward_balances());
        assert!(EntryStatus::Reversed.is_terminal());
        assert!(EntryStatus::Cancelled.is_terminal());
        assert!(!EntryStatus::Draft.is_terminal());
    }

    #[test]
    fn test_signed_delta() {
        // Debit-normal: balance grows with debits
        assert_eq!(NormalBalance::Debit.signed_delta(dec!(100), dec!(0)), dec!(100));
        assert_eq!(NormalBalance::Debit.signed_delta(dec!(0), dec!(40)), dec!(-40));
        // Credit-normal: the rule inverts
        assert_eq!(NormalBalance::Credit.signed_delta(dec!(0), dec!(100)), dec!(100));
        assert_eq!(NormalBalance::Credit.signed_delta(dec!(40), dec!(0)), dec!(-40));
    }

    #[test]
    fn test_totals_from_lines() {
        let lines = vec![
            line(dec!(100), dec!(0)),
            line(dec!(0), dec!(60)),
            line(dec!(0), dec!(40)),
        ];
        let totals = EntryTotals::from_lines(&lines);
        assert_eq!(totals.total_debit, dec!(100));
        assert_eq!(totals.total_credit, dec!(100));
        assert!(totals.is_balanced());
        assert_eq!(totals.difference(), dec!(0));
    }

    #[test]
    fn test_totals_unbalanced() {
        let lines = vec![line(dec!(50), dec!(0)), line(dec!(0), dec!(40))];
        let totals = EntryTotals::from_lines(&lines);
        assert!(!totals.is_balanced());
        assert_eq!(totals.difference(), dec!(10));
    }

    #[test]
    fn test_totals_balanced_within_tolerance() {
        // Sub-cent residue from rate conversion is absorbed
        let lines = vec![line(dec!(100.004), dec!(0)), line(dec!(0), dec!(100.00))];
        let totals = EntryTotals::from_lines(&lines);
        assert!(totals.is_balanced());
    }

    fn line(debit: Decimal, credit: Decimal) -> JournalLineInput {
        JournalLineInput {
            account_id: AccountId::new(),
            description: None,
            debit_amount: debit,
            credit_amount: credit,
            third_party_id: None,
        }
    }
}
