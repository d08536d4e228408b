//! Document number formatting.
//!
//! The sequence allocator keeps one integer counter per voucher type; the
//! rendered entry number is a pure function of the type's configured
//! pattern and that counter. Formatting lives here so the database layer
//! only ever moves the integer.

use serde::{Deserialize, Serialize};

/// Per-voucher-type number pattern: a prefix and a zero-padded width.
///
/// `NumberFormat { prefix: "CI-", width: 6 }` renders counter 42 as
/// `CI-000042`. Counters that outgrow the width keep all their digits, so
/// numbers stay unique (though no longer fixed-width).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    /// Literal prefix, typically the voucher type code plus a separator.
    pub prefix: String,
    /// Minimum digit count; smaller counters are zero-padded.
    pub width: usize,
}

impl NumberFormat {
    /// Creates a new number format.
    #[must_use]
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
        }
    }

    /// Renders a counter value as an entry number.
    #[must_use]
    pub fn format(&self, counter: i64) -> String {
        format!("{}{:0width$}", self.prefix, counter, width = self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_width() {
        let fmt = NumberFormat::new("CI-", 6);
        assert_eq!(fmt.format(1), "CI-000001");
        assert_eq!(fmt.format(42), "CI-000042");
        assert_eq!(fmt.format(999_999), "CI-999999");
    }

    #[test]
    fn test_format_beyond_width_keeps_digits() {
        let fmt = NumberFormat::new("CI-", 4);
        assert_eq!(fmt.format(123_456), "CI-123456");
    }

    #[test]
    fn test_empty_prefix() {
        let fmt = NumberFormat::new("", 3);
        assert_eq!(fmt.format(7), "007");
    }

    #[test]
    fn test_consecutive_numbers_sort_lexicographically() {
        // Zero padding keeps string order aligned with numeric order,
        // which the ledger's (date, entry_number) tie-break relies on.
        let fmt = NumberFormat::new("CD-", 6);
        let a = fmt.format(9);
        let b = fmt.format(10);
        assert!(a < b);
    }
}
