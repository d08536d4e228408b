//! Trial balance generation.

use rust_decimal::Decimal;

use super::types::{
    AccountActivity, BalanceCheck, TrialBalance, TrialBalanceRow, TrialBalanceTotals,
};
use crate::ledger::NormalBalance;

/// Builds the Balance de Comprobación from per-account posted activity.
///
/// For each account the difference `total_debit - total_credit` is split
/// into a debtor or creditor balance according to the account's normal
/// balance: a debit-normal account with a positive difference carries a
/// debtor balance, a negative one carries the absolute value as a creditor
/// balance, and the rule inverts for credit-normal accounts. Rows with no
/// activity are dropped unless `include_zero_balances` is set.
#[must_use]
pub fn build_trial_balance(
    activity: Vec<AccountActivity>,
    include_zero_balances: bool,
) -> TrialBalance {
    let mut rows = Vec::with_capacity(activity.len());
    let mut totals = TrialBalanceTotals::default();

    for account in activity {
        if !include_zero_balances && account.total_debit + account.total_credit == Decimal::ZERO {
            continue;
        }

        let (debtor_balance, creditor_balance) = split_balance(
            account.normal_balance,
            account.total_debit,
            account.total_credit,
        );

        totals.total_debit += account.total_debit;
        totals.total_credit += account.total_credit;
        totals.debtor_sum += debtor_balance;
        totals.creditor_sum += creditor_balance;

        rows.push(TrialBalanceRow {
            account_id: account.account_id,
            code: account.code,
            name: account.name,
            normal_balance: account.normal_balance,
            total_debit: account.total_debit,
            total_credit: account.total_credit,
            debtor_balance,
            creditor_balance,
        });
    }

    rows.sort_by(|a, b| a.code.cmp(&b.code));

    let balance_check = BalanceCheck::evaluate(&totals);

    TrialBalance {
        accounts: rows,
        totals,
        balance_check,
    }
}

/// Splits an account's net difference into debtor/creditor columns.
fn split_balance(
    normal_balance: NormalBalance,
    total_debit: Decimal,
    total_credit: Decimal,
) -> (Decimal, Decimal) {
    let difference = total_debit - total_credit;
    match normal_balance {
        NormalBalance::Debit => {
            if difference >= Decimal::ZERO {
                (difference, Decimal::ZERO)
            } else {
                (Decimal::ZERO, -difference)
            }
        }
        NormalBalance::Credit => {
            if difference <= Decimal::ZERO {
                (Decimal::ZERO, -difference)
            } else {
                (difference, Decimal::ZERO)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partida_shared::types::AccountId;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn activity(
        code: &str,
        normal_balance: NormalBalance,
        debit: Decimal,
        credit: Decimal,
    ) -> AccountActivity {
        AccountActivity {
            account_id: AccountId::new(),
            code: code.to_string(),
            name: format!("Account {code}"),
            normal_balance,
            total_debit: debit,
            total_credit: credit,
        }
    }

    #[test]
    fn test_two_entry_scenario_totals() {
        // Account A (debit-normal): debited 100, credited 40.
        // Account B (credit-normal): credited 100, debited 40.
        let report = build_trial_balance(
            vec![
                activity("1105", NormalBalance::Debit, dec!(100), dec!(40)),
                activity("2105", NormalBalance::Credit, dec!(40), dec!(100)),
            ],
            false,
        );

        assert_eq!(report.totals.total_debit, dec!(140));
        assert_eq!(report.totals.total_credit, dec!(140));
        assert_eq!(report.totals.debtor_sum, dec!(60));
        assert_eq!(report.totals.creditor_sum, dec!(60));
        assert!(report.balance_check.balanced);
    }

    #[test]
    fn test_debit_normal_positive_difference_is_debtor() {
        let report = build_trial_balance(
            vec![activity("1105", NormalBalance::Debit, dec!(100), dec!(30))],
            false,
        );
        let row = &report.accounts[0];
        assert_eq!(row.debtor_balance, dec!(70));
        assert_eq!(row.creditor_balance, dec!(0));
    }

    #[test]
    fn test_debit_normal_negative_difference_is_creditor() {
        let report = build_trial_balance(
            vec![activity("1105", NormalBalance::Debit, dec!(30), dec!(100))],
            false,
        );
        let row = &report.accounts[0];
        assert_eq!(row.debtor_balance, dec!(0));
        assert_eq!(row.creditor_balance, dec!(70));
    }

    #[test]
    fn test_credit_normal_rule_inverts() {
        let report = build_trial_balance(
            vec![
                activity("2105", NormalBalance::Credit, dec!(30), dec!(100)),
                activity("2110", NormalBalance::Credit, dec!(100), dec!(30)),
            ],
            false,
        );
        // Credited more than debited: creditor side
        assert_eq!(report.accounts[0].creditor_balance, dec!(70));
        assert_eq!(report.accounts[0].debtor_balance, dec!(0));
        // Debited more than credited: debtor side
        assert_eq!(report.accounts[1].debtor_balance, dec!(70));
        assert_eq!(report.accounts[1].creditor_balance, dec!(0));
    }

    #[test]
    fn test_zero_rows_dropped_by_default() {
        let report = build_trial_balance(
            vec![
                activity("1105", NormalBalance::Debit, dec!(100), dec!(100)),
                activity("1110", NormalBalance::Debit, dec!(0), dec!(0)),
            ],
            false,
        );
        assert_eq!(report.accounts.len(), 1);
        assert_eq!(report.accounts[0].code, "1105");
    }

    #[test]
    fn test_zero_rows_kept_when_requested() {
        let report = build_trial_balance(
            vec![activity("1110", NormalBalance::Debit, dec!(0), dec!(0))],
            true,
        );
        assert_eq!(report.accounts.len(), 1);
        assert_eq!(report.accounts[0].debtor_balance, dec!(0));
        assert_eq!(report.accounts[0].creditor_balance, dec!(0));
    }

    #[test]
    fn test_rows_ordered_by_code() {
        let report = build_trial_balance(
            vec![
                activity("5105", NormalBalance::Debit, dec!(10), dec!(0)),
                activity("1105", NormalBalance::Debit, dec!(0), dec!(10)),
            ],
            false,
        );
        assert_eq!(report.accounts[0].code, "1105");
        assert_eq!(report.accounts[1].code, "5105");
    }

    #[test]
    fn test_deterministic_for_identical_input() {
        let input = || {
            vec![
                activity("1105", NormalBalance::Debit, dec!(100), dec!(40)),
                activity("2105", NormalBalance::Credit, dec!(40), dec!(100)),
            ]
        };
        let a = build_trial_balance(input(), false);
        let b = build_trial_balance(input(), false);
        assert_eq!(a.totals.total_debit, b.totals.total_debit);
        assert_eq!(a.totals.debtor_sum, b.totals.debtor_sum);
        assert_eq!(a.accounts.len(), b.accounts.len());
        for (ra, rb) in a.accounts.iter().zip(&b.accounts) {
            assert_eq!(ra.debtor_balance, rb.debtor_balance);
            assert_eq!(ra.creditor_balance, rb.creditor_balance);
        }
    }

    // ========================================================================
    // Property tests
    // ========================================================================

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn normal_balance_strategy() -> impl Strategy<Value = NormalBalance> {
        prop_oneof![Just(NormalBalance::Debit), Just(NormalBalance::Credit)]
    }

    proptest! {
        /// Exactly one side of the split carries the absolute difference.
        #[test]
        fn prop_split_carries_absolute_difference(
            normal_balance in normal_balance_strategy(),
            debit in amount_strategy(),
            credit in amount_strategy(),
        ) {
            let (debtor, creditor) = split_balance(normal_balance, debit, credit);
            prop_assert!(debtor >= Decimal::ZERO);
            prop_assert!(creditor >= Decimal::ZERO);
            prop_assert!(debtor == Decimal::ZERO || creditor == Decimal::ZERO);
            prop_assert_eq!(debtor + creditor, (debit - credit).abs());
        }

        /// The debtor/creditor columns always reconcile with the raw
        /// debit/credit columns: debtor − creditor == debit − credit for
        /// debit-normal accounts, and the negation for credit-normal ones.
        #[test]
        fn prop_split_preserves_net(
            normal_balance in normal_balance_strategy(),
            debit in amount_strategy(),
            credit in amount_strategy(),
        ) {
            let (debtor, creditor) = split_balance(normal_balance, debit, credit);
            let expected = match normal_balance {
                NormalBalance::Debit => debit - credit,
                NormalBalance::Credit => credit - debit,
            };
            let net = match normal_balance {
                NormalBalance::Debit => debtor - creditor,
                NormalBalance::Credit => creditor - debtor,
            };
            prop_assert_eq!(net, expected);
        }
    }
}
