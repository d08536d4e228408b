//! Double-entry journal logic.
//!
//! This module defines the journal entry domain types, the entry state
//! machine, line-set validation, and the signed balance arithmetic used by
//! ledger and trial-balance reporting.

pub mod balance;
pub mod error;
pub mod types;
pub mod validation;

pub use balance::{AccountLedger, LedgerMovement, MovementRow};
pub use error::LedgerError;
pub use types::{
    AccountInfo, CreateEntryInput, EntryStatus, EntryTotals, JournalLineInput, NormalBalance,
    SourceDocumentRef,
};
pub use validation::{validate_exchange_rate, validate_lines};
