//! Account balance calculations.
//!
//! Opening balances, ordered running balances, and the signed accumulation
//! rule used by the Libro Mayor and the trial balance. Balances are never
//! maintained as stored running totals; they are recomputed from posted
//! lines at read time, so concurrent postings to different accounts never
//! contend.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use partida_shared::types::{JournalEntryId, JournalLineId, ThirdPartyId};

use super::types::{AccountInfo, NormalBalance};

/// One posted line for an account, as read from storage.
#[derive(Debug, Clone)]
pub struct MovementRow {
    /// The line ID.
    pub line_id: JournalLineId,
    /// The owning entry.
    pub entry_id: JournalEntryId,
    /// The owning entry's document number.
    pub entry_number: String,
    /// The entry date.
    pub entry_date: NaiveDate,
    /// Line (or entry) description.
    pub description: Option<String>,
    /// Debit amount.
    pub debit_amount: Decimal,
    /// Credit amount.
    pub credit_amount: Decimal,
    /// Optional third party.
    pub third_party_id: Option<ThirdPartyId>,
}

/// A movement with its running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerMovement {
    /// The line ID.
    pub line_id: JournalLineId,
    /// The owning entry.
    pub entry_id: JournalEntryId,
    /// The owning entry's document number.
    pub entry_number: String,
    /// The entry date.
    pub entry_date: NaiveDate,
    /// Line (or entry) description.
    pub description: Option<String>,
    /// Debit amount.
    pub debit_amount: Decimal,
    /// Credit amount.
    pub credit_amount: Decimal,
    /// Optional third party.
    pub third_party_id: Option<ThirdPartyId>,
    /// Cumulative signed balance immediately after this movement.
    pub running_balance: Decimal,
}

/// Libro Mayor for one account over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLedger {
    /// The account.
    pub account: AccountInfo,
    /// Signed balance of all posted movements strictly before the range.
    pub opening_balance: Decimal,
    /// Ordered movements with running balances.
    pub movements: Vec<LedgerMovement>,
    /// Sum of debit amounts within the range.
    pub total_debit: Decimal,
    /// Sum of credit amounts within the range.
    pub total_credit: Decimal,
    /// Running balance after the last movement (equals the opening balance
    /// when the range holds no movements).
    pub closing_balance: Decimal,
}

/// Computes an opening balance: the signed aggregate of prior movements.
#[must_use]
pub fn opening_balance(normal_balance: NormalBalance, prior: &[MovementRow]) -> Decimal {
    prior
        .iter()
        .map(|row| normal_balance.signed_delta(row.debit_amount, row.credit_amount))
        .sum()
}

/// Builds the Libro Mayor for an account.
///
/// Movements are ordered by `(entry_date ASC, entry_number ASC)`. The
/// entry number is the only deterministic tie-break when several entries
/// share a date, and the running balance shown to the user depends on it,
/// so the ordering is re-applied here even when the caller's query was
/// already sorted.
#[must_use]
pub fn build_account_ledger(
    account: AccountInfo,
    opening: Decimal,
    mut movements: Vec<MovementRow>,
) -> AccountLedger {
    movements.sort_by(|a, b| {
        a.entry_date
            .cmp(&b.entry_date)
            .then_with(|| a.entry_number.cmp(&b.entry_number))
    });

    let normal_balance = account.normal_balance;
    let mut running = opening;
    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;

    let movements = movements
        .into_iter()
        .map(|row| {
            total_debit += row.debit_amount;
            total_credit += row.credit_amount;
            running += normal_balance.signed_delta(row.debit_amount, row.credit_amount);
            LedgerMovement {
                line_id: row.line_id,
                entry_id: row.entry_id,
                entry_number: row.entry_number,
                entry_date: row.entry_date,
                description: row.description,
                debit_amount: row.debit_amount,
                credit_amount: row.credit_amount,
                third_party_id: row.third_party_id,
                running_balance: running,
            }
        })
        .collect();

    AccountLedger {
        account,
        opening_balance: opening,
        movements,
        total_debit,
        total_credit,
        closing_balance: running,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partida_shared::types::AccountId;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn account(normal_balance: NormalBalance) -> AccountInfo {
        AccountInfo {
            id: AccountId::new(),
            code: "1105".to_string(),
            name: "Caja".to_string(),
            normal_balance,
            allows_entries: true,
            is_active: true,
        }
    }

    fn row(number: &str, date: NaiveDate, debit: Decimal, credit: Decimal) -> MovementRow {
        MovementRow {
            line_id: JournalLineId::new(),
            entry_id: JournalEntryId::new(),
            entry_number: number.to_string(),
            entry_date: date,
            description: None,
            debit_amount: debit,
            credit_amount: credit,
            third_party_id: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_debit_normal_running_balance() {
        // Debit-normal account A: debit 100 on Jan 5, credit 40 on Jan 10.
        let movements = vec![
            row("CD-000001", date(2024, 1, 5), dec!(100), dec!(0)),
            row("CD-000002", date(2024, 1, 10), dec!(0), dec!(40)),
        ];
        let ledger = build_account_ledger(account(NormalBalance::Debit), dec!(0), movements);

        assert_eq!(ledger.opening_balance, dec!(0));
        assert_eq!(ledger.movements[0].running_balance, dec!(100));
        assert_eq!(ledger.movements[1].running_balance, dec!(60));
        assert_eq!(ledger.closing_balance, dec!(60));
        assert_eq!(ledger.total_debit, dec!(100));
        assert_eq!(ledger.total_credit, dec!(40));
    }

    #[test]
    fn test_credit_normal_inverts_sign() {
        let movements = vec![
            row("CD-000001", date(2024, 1, 5), dec!(0), dec!(100)),
            row("CD-000002", date(2024, 1, 10), dec!(40), dec!(0)),
        ];
        let ledger = build_account_ledger(account(NormalBalance::Credit), dec!(0), movements);

        assert_eq!(ledger.movements[0].running_balance, dec!(100));
        assert_eq!(ledger.movements[1].running_balance, dec!(60));
        assert_eq!(ledger.closing_balance, dec!(60));
    }

    #[test]
    fn test_opening_balance_feeds_running() {
        let movements = vec![row("CD-000009", date(2024, 2, 1), dec!(50), dec!(0))];
        let ledger = build_account_ledger(account(NormalBalance::Debit), dec!(200), movements);

        assert_eq!(ledger.opening_balance, dec!(200));
        assert_eq!(ledger.movements[0].running_balance, dec!(250));
        assert_eq!(ledger.closing_balance, dec!(250));
    }

    #[test]
    fn test_no_movements_closing_equals_opening() {
        let ledger = build_account_ledger(account(NormalBalance::Debit), dec!(75.50), vec![]);
        assert_eq!(ledger.closing_balance, dec!(75.50));
        assert_eq!(ledger.total_debit, dec!(0));
        assert_eq!(ledger.total_credit, dec!(0));
    }

    #[test]
    fn test_same_date_ordered_by_entry_number() {
        // Two entries on the same date: the entry number breaks the tie.
        let movements = vec![
            row("CD-000002", date(2024, 3, 1), dec!(0), dec!(30)),
            row("CD-000001", date(2024, 3, 1), dec!(100), dec!(0)),
        ];
        let ledger = build_account_ledger(account(NormalBalance::Debit), dec!(0), movements);

        assert_eq!(ledger.movements[0].entry_number, "CD-000001");
        assert_eq!(ledger.movements[0].running_balance, dec!(100));
        assert_eq!(ledger.movements[1].entry_number, "CD-000002");
        assert_eq!(ledger.movements[1].running_balance, dec!(70));
    }

    #[test]
    fn test_opening_balance_aggregation() {
        let prior = vec![
            row("CD-000001", date(2023, 12, 1), dec!(300), dec!(0)),
            row("CD-000002", date(2023, 12, 15), dec!(0), dec!(120)),
        ];
        assert_eq!(opening_balance(NormalBalance::Debit, &prior), dec!(180));
        assert_eq!(opening_balance(NormalBalance::Credit, &prior), dec!(-180));
    }

    // ========================================================================
    // Property tests
    // ========================================================================

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn movement_strategy() -> impl Strategy<Value = (Decimal, Decimal)> {
        (amount_strategy(), prop::bool::ANY).prop_map(|(amount, is_debit)| {
            if is_debit {
                (amount, Decimal::ZERO)
            } else {
                (Decimal::ZERO, amount)
            }
        })
    }

    proptest! {
        /// Opening balance plus the sum of signed deltas always equals the
        /// closing balance.
        #[test]
        fn prop_round_trip_closing_balance(
            opening in amount_strategy(),
            amounts in prop::collection::vec(movement_strategy(), 0..20),
        ) {
            let movements: Vec<MovementRow> = amounts
                .iter()
                .enumerate()
                .map(|(i, (d, c))| row(&format!("CD-{i:06}"), date(2024, 1, 1), *d, *c))
                .collect();

            let expected: Decimal = opening
                + movements
                    .iter()
                    .map(|m| NormalBalance::Debit.signed_delta(m.debit_amount, m.credit_amount))
                    .sum::<Decimal>();

            let ledger = build_account_ledger(account(NormalBalance::Debit), opening, movements);
            prop_assert_eq!(ledger.closing_balance, expected);
        }

        /// Each movement's running balance equals the previous running
        /// balance plus its own signed delta.
        #[test]
        fn prop_running_balance_chain(
            amounts in prop::collection::vec(movement_strategy(), 1..20),
        ) {
            let movements: Vec<MovementRow> = amounts
                .iter()
                .enumerate()
                .map(|(i, (d, c))| row(&format!("CD-{i:06}"), date(2024, 1, 1), *d, *c))
                .collect();

            let ledger = build_account_ledger(account(NormalBalance::Debit), Decimal::ZERO, movements);

            let mut previous = ledger.opening_balance;
            for movement in &ledger.movements {
                let delta = NormalBalance::Debit
                    .signed_delta(movement.debit_amount, movement.credit_amount);
                prop_assert_eq!(movement.running_balance, previous + delta);
                previous = movement.running_balance;
            }
        }

        /// The sign rule inverts exactly between the two polarities.
        #[test]
        fn prop_sign_rule_inverts(
            debit in amount_strategy(),
            credit in amount_strategy(),
        ) {
            prop_assert_eq!(
                NormalBalance::Debit.signed_delta(debit, credit),
                -NormalBalance::Credit.signed_delta(debit, credit)
            );
        }
    }
}
