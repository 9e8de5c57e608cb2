//! Property-based tests for operation planning.
//!
//! These properties pin down the arithmetic the transaction engine relies
//! on: signed deltas that offset exactly, cent-scaled trade values, and
//! rejection of amounts the wallets cannot represent.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::WalletKind;

/// Strategy for cash amounts (0.01 to 1,000,000.00).
fn cash_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for gold amounts large enough to price (0.01 to 1,000.0000 oz).
fn tradable_gold_amount() -> impl Strategy<Value = Decimal> {
    (100i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 4))
}

/// Strategy for gold amounts down to the minimum unit (may be dust).
fn any_gold_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=100_000_000_000i64).prop_map(|n| Decimal::new(n, 8))
}

/// Strategy for unit prices of at least 1.00 per troy ounce.
fn unit_price() -> impl Strategy<Value = Decimal> {
    (100i64..=10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A withdrawal plan is the exact negative of a deposit plan for the
    /// same amount, and neither touches the gold wallet.
    #[test]
    fn prop_deposit_withdraw_offset(amount in cash_amount()) {
        let deposit = LedgerService::plan_deposit(amount).unwrap();
        let withdraw = LedgerService::plan_withdraw(amount).unwrap();

        prop_assert_eq!(deposit.cash_delta, -withdraw.cash_delta);
        prop_assert!(deposit.cash_delta > Decimal::ZERO);
        prop_assert_eq!(deposit.gold_delta, Decimal::ZERO);
        prop_assert_eq!(withdraw.gold_delta, Decimal::ZERO);
    }

    /// Buying and selling the same gold amount at the same price produce
    /// exactly offsetting deltas, so the pair restores both balances.
    #[test]
    fn prop_buy_sell_offset(
        gold_amount in tradable_gold_amount(),
        price in unit_price(),
    ) {
        let buy = LedgerService::plan_buy(gold_amount, price).unwrap();
        let sell = LedgerService::plan_sell(gold_amount, price).unwrap();

        prop_assert_eq!(buy.cash_delta, -sell.cash_delta);
        prop_assert_eq!(buy.gold_delta, -sell.gold_delta);
        prop_assert_eq!(buy.unit_price, Some(price));
        prop_assert_eq!(sell.unit_price, Some(price));
    }

    /// The cash leg of a trade stays within half a cent of the exact
    /// product, the bound banker's rounding guarantees.
    #[test]
    fn prop_trade_value_within_half_cent(
        gold_amount in tradable_gold_amount(),
        price in unit_price(),
    ) {
        let value = LedgerService::trade_cash_value(gold_amount, price).unwrap();
        let exact = gold_amount * price;

        prop_assert!((value - exact).abs() <= dec!(0.005));
        prop_assert_eq!(value.scale(), WalletKind::Cash.decimal_places());
    }

    /// A successful trade plan moves both wallets in opposite directions.
    #[test]
    fn prop_trade_moves_both_wallets(
        gold_amount in tradable_gold_amount(),
        price in unit_price(),
    ) {
        let buy = LedgerService::plan_buy(gold_amount, price).unwrap();

        prop_assert!(buy.cash_delta < Decimal::ZERO);
        prop_assert!(buy.gold_delta > Decimal::ZERO);
        prop_assert_eq!(buy.deltas().len(), 2);
        prop_assert_eq!(buy.debits(), vec![(WalletKind::Cash, -buy.cash_delta)]);
    }

    /// For any gold amount and price, planning either fails or yields a
    /// cash leg of at least one cent. A trade can never be booked for
    /// free gold.
    #[test]
    fn prop_no_zero_value_trades(
        gold_amount in any_gold_amount(),
        price in unit_price(),
    ) {
        match LedgerService::plan_buy(gold_amount, price) {
            Ok(plan) => prop_assert!(-plan.cash_delta >= dec!(0.01)),
            Err(LedgerError::TradeTooSmall) => {
                // Rejected dust: the exact value rounds below one cent.
                prop_assert!((gold_amount * price) <= dec!(0.005));
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// Plan deltas always carry the wallet's canonical scale.
    #[test]
    fn prop_plan_scales_canonical(
        gold_amount in tradable_gold_amount(),
        price in unit_price(),
    ) {
        let plan = LedgerService::plan_sell(gold_amount, price).unwrap();

        prop_assert_eq!(plan.cash_delta.scale(), 2);
        prop_assert_eq!(plan.gold_delta.scale(), 8);
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Specific example: a buy immediately followed by a sell at the same
    /// price returns the account to its starting balances.
    #[test]
    fn test_buy_then_sell_at_same_price_restores_balances() {
        let buy = LedgerService::plan_buy(dec!(1.23456789), dec!(1987.65)).unwrap();
        let sell = LedgerService::plan_sell(dec!(1.23456789), dec!(1987.65)).unwrap();

        assert_eq!(buy.cash_delta + sell.cash_delta, dec!(0.00));
        assert_eq!(buy.gold_delta + sell.gold_delta, dec!(0.00000000));
    }

    /// Specific example: accumulated midpoints round toward even cents.
    #[test]
    fn test_midpoint_values_round_to_even_cents() {
        // 0.003 oz * 1675 = 5.025 -> 5.02 (2 is even)
        assert_eq!(
            LedgerService::trade_cash_value(dec!(0.003), dec!(1675)).unwrap(),
            dec!(5.02)
        );
        // 0.005 oz * 1675 = 8.375 -> 8.38 (8 is even)
        assert_eq!(
            LedgerService::trade_cash_value(dec!(0.005), dec!(1675)).unwrap(),
            dec!(8.38)
        );
    }
}
