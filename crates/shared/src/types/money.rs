//! Monetary helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` at a scale of 2 decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Scale (decimal places) for all stored monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Tolerance for monetary equality checks: 0.01.
///
/// Balance comparisons never rely on exact `Decimal` equality; a difference
/// strictly below one cent is treated as equal to absorb rounding residue
/// from exchange-rate multiplication.
#[must_use]
pub fn tolerance() -> Decimal {
    Decimal::new(1, MONEY_SCALE)
}

/// Rounds an amount to the monetary scale using Banker's Rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if two amounts are equal within the monetary tolerance.
#[must_use]
pub fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < tolerance()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_even() {
        // Banker's rounding: ties go to the even digit
        assert_eq!(round_money(dec!(2.125)), dec!(2.12));
        assert_eq!(round_money(dec!(2.135)), dec!(2.14));
        assert_eq!(round_money(dec!(2.1)), dec!(2.1));
    }

    #[test]
    fn test_within_tolerance() {
        assert!(within_tolerance(dec!(100.00), dec!(100.00)));
        assert!(within_tolerance(dec!(100.005), dec!(100.00)));
        assert!(within_tolerance(dec!(99.995), dec!(100.00)));
        assert!(!within_tolerance(dec!(100.01), dec!(100.00)));
        assert!(!within_tolerance(dec!(99.98), dec!(100.00)));
    }

    #[test]
    fn test_tolerance_is_one_cent() {
        assert_eq!(tolerance(), dec!(0.01));
    }
}
