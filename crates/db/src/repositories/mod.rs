//! Repository abstractions for ledger data access.
//!
//! Every mutating operation opens one database transaction spanning all of
//! its reads and writes; a failure anywhere aborts the whole unit, so the
//! stored state is exactly as it was before the call.

use sea_orm::DbErr;
use thiserror::Error;

use partida_core::ledger::LedgerError;
use partida_shared::error::{AppError, ErrorKind};

pub mod account;
pub mod document;
pub mod fiscal;
pub mod journal_entry;
pub mod ledger_report;
pub mod sequence;

pub use account::AccountRepository;
pub use document::DocumentRepository;
pub use fiscal::FiscalPeriodRepository;
pub use journal_entry::{EntryWithLines, JournalEntryRepository, JournalFilter, UpdateEntryInput};
pub use ledger_report::LedgerReportRepository;
pub use sequence::SequenceRepository;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A ledger business rule was violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    /// Returns the classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Ledger(err) => err.kind(),
            Self::Database(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::InvalidState => Self::InvalidState(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::Internal => match err {
                StoreError::Database(_) => Self::Database(message),
                StoreError::Ledger(_) => Self::Internal(message),
            },
        }
    }
}
