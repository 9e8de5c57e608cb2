//! Ledger service for operation validation and planning.
//!
//! This module provides the core business logic for turning a requested
//! wallet operation into a validated plan of signed deltas before anything
//! is persisted to the database.

use rust_decimal::{Decimal, RoundingStrategy};

use aurum_shared::types::{AmountError, validate_amount};

use super::error::LedgerError;
use super::types::{OperationPlan, TransactionKind, WalletKind};

/// Ledger service for operation validation and planning.
///
/// This service contains pure business logic with no database dependencies.
/// It validates amounts, prices the cash leg of trades, and produces the
/// signed deltas the transaction engine applies atomically.
pub struct LedgerService;

impl LedgerService {
    /// Plan a cash deposit.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the amount is not a positive multiple of
    /// the cash minimum unit.
    pub fn plan_deposit(amount: Decimal) -> Result<OperationPlan, LedgerError> {
        let amount = Self::validate_wallet_amount(WalletKind::Cash, amount)?;

        Ok(OperationPlan {
            kind: TransactionKind::Deposit,
            cash_delta: amount,
            gold_delta: Decimal::ZERO,
            unit_price: None,
        })
    }

    /// Plan a cash withdrawal.
    ///
    /// The plan carries a negative cash delta; whether the balance covers
    /// it is decided atomically at apply time, not here.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the amount is not a positive multiple of
    /// the cash minimum unit.
    pub fn plan_withdraw(amount: Decimal) -> Result<OperationPlan, LedgerError> {
        let amount = Self::validate_wallet_amount(WalletKind::Cash, amount)?;

        Ok(OperationPlan {
            kind: TransactionKind::Withdraw,
            cash_delta: -amount,
            gold_delta: Decimal::ZERO,
            unit_price: None,
        })
    }

    /// Plan a gold purchase at the given unit price.
    ///
    /// The cash cost is `gold_amount * unit_price` rounded to cents with
    /// banker's rounding, and the price is pinned into the plan so the
    /// resulting record is auditable without the price feed.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the gold amount is invalid, the unit price
    /// is unusable, or the cash value rounds below one cent.
    pub fn plan_buy(
        gold_amount: Decimal,
        unit_price: Decimal,
    ) -> Result<OperationPlan, LedgerError> {
        let gold_amount = Self::validate_wallet_amount(WalletKind::Gold, gold_amount)?;
        let cost = Self::trade_cash_value(gold_amount, unit_price)?;

        Ok(OperationPlan {
            kind: TransactionKind::Buy,
            cash_delta: -cost,
            gold_delta: gold_amount,
            unit_price: Some(unit_price),
        })
    }

    /// Plan a gold sale at the given unit price.
    ///
    /// Symmetric to [`Self::plan_buy`]: the same gold amount at the same
    /// price yields the same cash value, so a buy immediately followed by
    /// a sell at an unchanged price restores both balances exactly.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the gold amount is invalid, the unit price
    /// is unusable, or the cash value rounds below one cent.
    pub fn plan_sell(
        gold_amount: Decimal,
        unit_price: Decimal,
    ) -> Result<OperationPlan, LedgerError> {
        let gold_amount = Self::validate_wallet_amount(WalletKind::Gold, gold_amount)?;
        let proceeds = Self::trade_cash_value(gold_amount, unit_price)?;

        Ok(OperationPlan {
            kind: TransactionKind::Sell,
            cash_delta: proceeds,
            gold_delta: -gold_amount,
            unit_price: Some(unit_price),
        })
    }

    /// Computes the cash leg of a trade.
    ///
    /// Multiplies the gold amount by the unit price and rounds to cents
    /// using banker's rounding (round half to even) to minimize cumulative
    /// errors across many trades.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::PriceUnavailable` for a non-positive unit
    /// price and `LedgerError::TradeTooSmall` when the value rounds below
    /// one cent.
    pub fn trade_cash_value(
        gold_amount: Decimal,
        unit_price: Decimal,
    ) -> Result<Decimal, LedgerError> {
        if unit_price <= Decimal::ZERO {
            return Err(LedgerError::PriceUnavailable(format!(
                "unusable unit price: {unit_price}"
            )));
        }

        let scale = WalletKind::Cash.decimal_places();
        let mut value = (gold_amount * unit_price)
            .round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven);

        if value < WalletKind::Cash.minimum_unit() {
            return Err(LedgerError::TradeTooSmall);
        }

        value.rescale(scale);
        Ok(value)
    }

    /// Validates an operation amount for a wallet kind.
    fn validate_wallet_amount(kind: WalletKind, amount: Decimal) -> Result<Decimal, LedgerError> {
        validate_amount(kind, amount).map_err(|err| match err {
            AmountError::NotPositive => LedgerError::AmountNotPositive,
            AmountError::TooPrecise { max_scale } => {
                LedgerError::AmountTooPrecise { kind, max_scale }
            }
            AmountError::UnknownWalletKind(other) => {
                LedgerError::Internal(format!("unknown wallet kind: {other}"))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_plan_deposit() {
        let plan = LedgerService::plan_deposit(dec!(100)).unwrap();

        assert_eq!(plan.kind, TransactionKind::Deposit);
        assert_eq!(plan.cash_delta, dec!(100.00));
        assert_eq!(plan.gold_delta, Decimal::ZERO);
        assert_eq!(plan.unit_price, None);
    }

    #[test]
    fn test_plan_withdraw_debits_cash() {
        let plan = LedgerService::plan_withdraw(dec!(59.90)).unwrap();

        assert_eq!(plan.kind, TransactionKind::Withdraw);
        assert_eq!(plan.cash_delta, dec!(-59.90));
        assert_eq!(plan.gold_delta, Decimal::ZERO);
        assert_eq!(plan.debits(), vec![(WalletKind::Cash, dec!(59.90))]);
    }

    #[test]
    fn test_plan_rejects_non_positive_amount() {
        assert!(matches!(
            LedgerService::plan_deposit(Decimal::ZERO),
            Err(LedgerError::AmountNotPositive)
        ));
        assert!(matches!(
            LedgerService::plan_withdraw(dec!(-10.00)),
            Err(LedgerError::AmountNotPositive)
        ));
    }

    #[test]
    fn test_plan_rejects_sub_cent_cash() {
        assert!(matches!(
            LedgerService::plan_deposit(dec!(10.005)),
            Err(LedgerError::AmountTooPrecise {
                kind: WalletKind::Cash,
                max_scale: 2,
            })
        ));
    }

    #[test]
    fn test_plan_buy_pins_price() {
        let plan = LedgerService::plan_buy(dec!(0.05), dec!(2000.00)).unwrap();

        assert_eq!(plan.kind, TransactionKind::Buy);
        assert_eq!(plan.cash_delta, dec!(-100.00));
        assert_eq!(plan.gold_delta, dec!(0.05000000));
        assert_eq!(plan.unit_price, Some(dec!(2000.00)));
    }

    #[test]
    fn test_plan_sell_credits_cash() {
        let plan = LedgerService::plan_sell(dec!(0.05), dec!(2100.00)).unwrap();

        assert_eq!(plan.kind, TransactionKind::Sell);
        assert_eq!(plan.cash_delta, dec!(105.00));
        assert_eq!(plan.gold_delta, dec!(-0.05000000));
        assert_eq!(plan.unit_price, Some(dec!(2100.00)));
    }

    #[test]
    fn test_trade_value_uses_bankers_rounding() {
        // 0.001 * 1505 = 1.505 -> rounds half to even -> 1.50
        assert_eq!(
            LedgerService::trade_cash_value(dec!(0.001), dec!(1505)).unwrap(),
            dec!(1.50)
        );
        // 0.001 * 1515 = 1.515 -> rounds half to even -> 1.52
        assert_eq!(
            LedgerService::trade_cash_value(dec!(0.001), dec!(1515)).unwrap(),
            dec!(1.52)
        );
    }

    #[test]
    fn test_trade_value_rejects_dust() {
        // 0.00000001 oz at 100.00/oz rounds far below one cent
        assert!(matches!(
            LedgerService::plan_buy(dec!(0.00000001), dec!(100.00)),
            Err(LedgerError::TradeTooSmall)
        ));
        assert!(matches!(
            LedgerService::plan_sell(dec!(0.00000001), dec!(100.00)),
            Err(LedgerError::TradeTooSmall)
        ));
    }

    #[test]
    fn test_trade_value_rejects_unusable_price() {
        assert!(matches!(
            LedgerService::plan_buy(dec!(1.0), Decimal::ZERO),
            Err(LedgerError::PriceUnavailable(_))
        ));
        assert!(matches!(
            LedgerService::plan_sell(dec!(1.0), dec!(-5)),
            Err(LedgerError::PriceUnavailable(_))
        ));
    }

    #[test]
    fn test_buy_rejects_too_precise_gold() {
        assert!(matches!(
            LedgerService::plan_buy(dec!(0.000000001), dec!(2000.00)),
            Err(LedgerError::AmountTooPrecise {
                kind: WalletKind::Gold,
                max_scale: 8,
            })
        ));
    }

    #[test]
    fn test_trade_deltas_are_canonically_scaled() {
        let plan = LedgerService::plan_buy(dec!(1), dec!(1971.5)).unwrap();

        assert_eq!(plan.cash_delta.scale(), 2);
        assert_eq!(plan.gold_delta.scale(), 8);
    }
}
