//! Financial report construction.
//!
//! The trial balance (Balance de Comprobación) aggregates posted activity
//! per account and verifies the ledger's integrity.

pub mod service;
pub mod types;

pub use service::build_trial_balance;
pub use types::{
    AccountActivity, BalanceCheck, TrialBalance, TrialBalanceRow, TrialBalanceTotals,
};
