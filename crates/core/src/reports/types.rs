//! Report data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use partida_shared::types::money::within_tolerance;
use partida_shared::types::AccountId;

use crate::ledger::NormalBalance;

/// Posted debit/credit activity for one account, as read from storage.
#[derive(Debug, Clone)]
pub struct AccountActivity {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Normal-balance polarity.
    pub normal_balance: NormalBalance,
    /// Total posted debits in the range.
    pub total_debit: Decimal,
    /// Total posted credits in the range.
    pub total_credit: Decimal,
}

/// One trial balance row with the sign-split balance columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Normal-balance polarity.
    pub normal_balance: NormalBalance,
    /// Total posted debits.
    pub total_debit: Decimal,
    /// Total posted credits.
    pub total_credit: Decimal,
    /// Saldo deudor: the balance when it lands on the account's debtor side.
    pub debtor_balance: Decimal,
    /// Saldo acreedor: the balance when it lands on the creditor side.
    pub creditor_balance: Decimal,
}

/// Column totals across all rows.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Sum of the debit column.
    pub total_debit: Decimal,
    /// Sum of the credit column.
    pub total_credit: Decimal,
    /// Sum of the debtor-balance column.
    pub debtor_sum: Decimal,
    /// Sum of the creditor-balance column.
    pub creditor_sum: Decimal,
}

/// The trial balance integrity check.
///
/// Both conditions are required: a ledger can have equal debit and credit
/// columns overall yet leave an unclassified residual if the sign split is
/// wrong, so the two checks are evaluated (and tested) independently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BalanceCheck {
    /// Debit column equals credit column within tolerance.
    pub debits_equal_credits: bool,
    /// Debtor column equals creditor column within tolerance.
    pub balances_classified: bool,
    /// Both conditions hold.
    pub balanced: bool,
}

impl BalanceCheck {
    /// Evaluates the check from column totals.
    #[must_use]
    pub fn evaluate(totals: &TrialBalanceTotals) -> Self {
        let debits_equal_credits = within_tolerance(totals.total_debit, totals.total_credit);
        let balances_classified = within_tolerance(totals.debtor_sum, totals.creditor_sum);
        Self {
            debits_equal_credits,
            balances_classified,
            balanced: debits_equal_credits && balances_classified,
        }
    }
}

/// Balance de Comprobación over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Per-account rows, ordered by account code.
    pub accounts: Vec<TrialBalanceRow>,
    /// Column totals.
    pub totals: TrialBalanceTotals,
    /// Integrity check result.
    pub balance_check: BalanceCheck,
}
