//! Document/voucher bridge rules.
//!
//! A legal document drives derived journal entries ("vouchers"). This
//! module owns the two-sided lifecycle coordination: voucher generation
//! preconditions, the per-document-type line mapping seam, and the
//! cancellation cascade gates. Keeping both directions in one place is
//! what makes the invariant "no document is cancelled while it has a
//! posted entry" enforceable.

pub mod service;
pub mod types;

pub use service::VoucherBridge;
pub use types::{DocumentInfo, DocumentStatus, VoucherLineBuilder};
