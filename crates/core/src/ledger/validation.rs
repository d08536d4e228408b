//! Business rule validation for journal entries.
//!
//! Validation is pure: account metadata is injected by the caller so the
//! same rules run identically inside a database transaction or a unit test.

use rust_decimal::Decimal;

use partida_shared::types::AccountId;

use super::error::LedgerError;
use super::types::{AccountInfo, EntryTotals, JournalLineInput};

/// Validates a journal line set and returns its derived totals.
///
/// Rules enforced:
/// 1. The line set is non-empty.
/// 2. Each line carries exactly one positive amount (debit or credit,
///    never both, never negative, never neither).
/// 3. Each referenced account exists, is active, and allows entries.
/// 4. Total debits equal total credits within the monetary tolerance.
///
/// # Errors
///
/// Returns a `LedgerError` describing the first rule violated.
pub fn validate_lines<A>(
    lines: &[JournalLineInput],
    account_lookup: A,
) -> Result<EntryTotals, LedgerError>
where
    A: Fn(AccountId) -> Result<AccountInfo, LedgerError>,
{
    if lines.is_empty() {
        return Err(LedgerError::EmptyLineSet);
    }

    for (index, line) in lines.iter().enumerate() {
        validate_line(index, line)?;

        let account = account_lookup(line.account_id)?;
        if !account.is_active {
            return Err(LedgerError::AccountInactive(account.id));
        }
        if !account.allows_entries {
            return Err(LedgerError::AccountNotPostable(account.id));
        }
    }

    let totals = EntryTotals::from_lines(lines);
    if !totals.is_balanced() {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.total_debit,
            credit: totals.total_credit,
        });
    }

    Ok(totals)
}

/// Validates a single line's amount shape.
fn validate_line(index: usize, line: &JournalLineInput) -> Result<(), LedgerError> {
    if line.debit_amount < Decimal::ZERO || line.credit_amount < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount { line: index });
    }
    let has_debit = line.debit_amount > Decimal::ZERO;
    let has_credit = line.credit_amount > Decimal::ZERO;
    match (has_debit, has_credit) {
        (true, true) => Err(LedgerError::LineWithBothAmounts { line: index }),
        (false, false) => Err(LedgerError::LineWithoutAmount { line: index }),
        _ => Ok(()),
    }
}

/// Validates an exchange rate multiplier.
///
/// # Errors
///
/// Returns `InvalidExchangeRate` if the rate is zero or negative.
pub fn validate_exchange_rate(rate: Decimal) -> Result<(), LedgerError> {
    if rate <= Decimal::ZERO {
        return Err(LedgerError::InvalidExchangeRate);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::NormalBalance;
    use rust_decimal_macros::dec;

    fn account_info(id: AccountId) -> AccountInfo {
        AccountInfo {
            id,
            code: "1105".to_string(),
            name: "Caja".to_string(),
            normal_balance: NormalBalance::Debit,
            allows_entries: true,
            is_active: true,
        }
    }

    fn ok_lookup(id: AccountId) -> Result<AccountInfo, LedgerError> {
        Ok(account_info(id))
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

    #[test]
    fn test_balanced_lines() {
        let lines = vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(100))];
        let totals = validate_lines(&lines, ok_lookup).unwrap();
        assert_eq!(totals.total_debit, dec!(100));
        assert_eq!(totals.total_credit, dec!(100));
    }

    #[test]
    fn test_empty_line_set() {
        let result = validate_lines(&[], ok_lookup);
        assert!(matches!(result, Err(LedgerError::EmptyLineSet)));
    }

    #[test]
    fn test_unbalanced_lines() {
        // Difference of 10 is well beyond the 0.01 tolerance
        let lines = vec![line(dec!(50), dec!(0)), line(dec!(0), dec!(40))];
        let result = validate_lines(&lines, ok_lookup);
        assert!(matches!(
            result,
            Err(LedgerError::UnbalancedEntry { debit, credit })
                if debit == dec!(50) && credit == dec!(40)
        ));
    }

    #[test]
    fn test_line_with_both_amounts() {
        let lines = vec![line(dec!(50), dec!(50)), line(dec!(0), dec!(0))];
        let result = validate_lines(&lines, ok_lookup);
        assert!(matches!(
            result,
            Err(LedgerError::LineWithBothAmounts { line: 0 })
        ));
    }

    #[test]
    fn test_line_without_amount() {
        let lines = vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(0))];
        let result = validate_lines(&lines, ok_lookup);
        assert!(matches!(
            result,
            Err(LedgerError::LineWithoutAmount { line: 1 })
        ));
    }

    #[test]
    fn test_negative_amount() {
        let lines = vec![line(dec!(-100), dec!(0)), line(dec!(0), dec!(100))];
        let result = validate_lines(&lines, ok_lookup);
        assert!(matches!(result, Err(LedgerError::NegativeAmount { line: 0 })));
    }

    #[test]
    fn test_inactive_account() {
        let lookup = |id: AccountId| -> Result<AccountInfo, LedgerError> {
            let mut info = account_info(id);
            info.is_active = false;
            Ok(info)
        };
        let lines = vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(100))];
        let result = validate_lines(&lines, lookup);
        assert!(matches!(result, Err(LedgerError::AccountInactive(_))));
    }

    #[test]
    fn test_non_postable_account() {
        let lookup = |id: AccountId| -> Result<AccountInfo, LedgerError> {
            let mut info = account_info(id);
            info.allows_entries = false;
            Ok(info)
        };
        let lines = vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(100))];
        let result = validate_lines(&lines, lookup);
        assert!(matches!(result, Err(LedgerError::AccountNotPostable(_))));
    }

    #[test]
    fn test_missing_account() {
        let lookup =
            |id: AccountId| -> Result<AccountInfo, LedgerError> { Err(LedgerError::AccountNotFound(id)) };
        let lines = vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(100))];
        let result = validate_lines(&lines, lookup);
        assert!(matches!(result, Err(LedgerError::AccountNotFound(_))));
    }

    #[test]
    fn test_sub_cent_residue_is_balanced() {
        let lines = vec![line(dec!(33.335), dec!(0)), line(dec!(0), dec!(33.33))];
        assert!(validate_lines(&lines, ok_lookup).is_ok());
    }

    #[test]
    fn test_exchange_rate_validation() {
        assert!(validate_exchange_rate(dec!(1)).is_ok());
        assert!(validate_exchange_rate(dec!(0.000001)).is_ok());
        assert!(matches!(
            validate_exchange_rate(dec!(0)),
            Err(LedgerError::InvalidExchangeRate)
        ));
        assert!(matches!(
            validate_exchange_rate(dec!(-1)),
            Err(LedgerError::InvalidExchangeRate)
        ));
    }
}
