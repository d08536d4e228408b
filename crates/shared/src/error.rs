//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Coarse error classification shared by every layer.
///
/// Business errors raised anywhere in the engine fall into exactly one of
/// these kinds, so embedding callers can map them to transport-level codes
/// without inspecting individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input violates a business rule (unbalanced entry, malformed line, closed period).
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// The operation is not allowed in the entity's current state.
    InvalidState,
    /// The operation collides with existing data (duplicate voucher, blocking entries).
    Conflict,
    /// Infrastructure failure (database, configuration).
    Internal,
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input violates a business rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation not allowed in the entity's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Conflict (e.g., duplicate voucher for a document).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Database(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the stable error code for external consumers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
