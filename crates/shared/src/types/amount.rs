//! Wallet kinds and amount validation.
//!
//! Aurum keeps two balances per customer: cash (2 decimal places) and
//! gold in troy ounces (8 decimal places). All amounts are `rust_decimal::Decimal`;
//! floats are banned workspace-wide.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of wallet a balance or delta applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    /// Fiat cash balance.
    Cash,
    /// Gold holdings in troy ounces.
    Gold,
}

impl WalletKind {
    /// Returns the number of decimal places this wallet kind supports.
    ///
    /// Cash is tracked to the cent (2), gold to 10^-8 troy ounces (8).
    #[must_use]
    pub const fn decimal_places(self) -> u32 {
        match self {
            Self::Cash => 2,
            Self::Gold => 8,
        }
    }

    /// Returns the smallest representable unit for this wallet kind.
    #[must_use]
    pub fn minimum_unit(self) -> Decimal {
        Decimal::new(1, self.decimal_places())
    }
}

impl std::fmt::Display for WalletKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Gold => write!(f, "gold"),
        }
    }
}

impl std::str::FromStr for WalletKind {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "gold" => Ok(Self::Gold),
            _ => Err(AmountError::UnknownWalletKind(s.to_string())),
        }
    }
}

/// Errors produced when validating a customer-supplied amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Amount must be strictly positive.
    #[error("amount must be greater than zero")]
    NotPositive,

    /// Amount has more decimal places than the wallet kind supports.
    #[error("amount exceeds {max_scale} decimal places")]
    TooPrecise {
        /// Maximum number of decimal places for the wallet kind.
        max_scale: u32,
    },

    /// Unknown wallet kind string.
    #[error("unknown wallet kind: {0}")]
    UnknownWalletKind(String),
}

/// Validates and normalizes an operation amount for a wallet kind.
///
/// The amount must be strictly positive and a whole multiple of the
/// kind's minimum unit. On success the amount is rescaled to the kind's
/// canonical number of decimal places.
///
/// # Errors
///
/// Returns `AmountError::NotPositive` for zero or negative amounts and
/// `AmountError::TooPrecise` when the amount carries sub-unit precision.
pub fn validate_amount(kind: WalletKind, amount: Decimal) -> Result<Decimal, AmountError> {
    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive);
    }

    let scale = kind.decimal_places();
    if amount.round_dp(scale) != amount {
        return Err(AmountError::TooPrecise { max_scale: scale });
    }

    let mut normalized = amount;
    normalized.rescale(scale);
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_decimal_places() {
        assert_eq!(WalletKind::Cash.decimal_places(), 2);
        assert_eq!(WalletKind::Gold.decimal_places(), 8);
    }

    #[test]
    fn test_minimum_unit() {
        assert_eq!(WalletKind::Cash.minimum_unit(), dec!(0.01));
        assert_eq!(WalletKind::Gold.minimum_unit(), dec!(0.00000001));
    }

    #[test]
    fn test_wallet_kind_display() {
        assert_eq!(WalletKind::Cash.to_string(), "cash");
        assert_eq!(WalletKind::Gold.to_string(), "gold");
    }

    #[test]
    fn test_wallet_kind_from_str() {
        assert_eq!(WalletKind::from_str("cash").unwrap(), WalletKind::Cash);
        assert_eq!(WalletKind::from_str("GOLD").unwrap(), WalletKind::Gold);
        assert!(WalletKind::from_str("silver").is_err());
        assert!(WalletKind::from_str("").is_err());
    }

    #[rstest]
    #[case(WalletKind::Cash, dec!(100), dec!(100.00))]
    #[case(WalletKind::Cash, dec!(0.01), dec!(0.01))]
    #[case(WalletKind::Cash, dec!(59.90), dec!(59.90))]
    #[case(WalletKind::Gold, dec!(0.05), dec!(0.05000000))]
    #[case(WalletKind::Gold, dec!(0.00000001), dec!(0.00000001))]
    fn test_validate_amount_accepts(
        #[case] kind: WalletKind,
        #[case] input: Decimal,
        #[case] expected: Decimal,
    ) {
        let normalized = validate_amount(kind, input).unwrap();
        assert_eq!(normalized, expected);
        assert_eq!(normalized.scale(), kind.decimal_places());
    }

    #[rstest]
    #[case(WalletKind::Cash, dec!(0))]
    #[case(WalletKind::Cash, dec!(-10.00))]
    #[case(WalletKind::Gold, dec!(-0.00000001))]
    fn test_validate_amount_rejects_non_positive(#[case] kind: WalletKind, #[case] input: Decimal) {
        assert_eq!(validate_amount(kind, input), Err(AmountError::NotPositive));
    }

    #[rstest]
    #[case(WalletKind::Cash, dec!(0.001))]
    #[case(WalletKind::Cash, dec!(10.005))]
    #[case(WalletKind::Gold, dec!(0.000000001))]
    fn test_validate_amount_rejects_sub_unit_precision(
        #[case] kind: WalletKind,
        #[case] input: Decimal,
    ) {
        assert_eq!(
            validate_amount(kind, input),
            Err(AmountError::TooPrecise {
                max_scale: kind.decimal_places()
            })
        );
    }

    #[test]
    fn test_validate_amount_scale_only_zeros_ok() {
        // Trailing zeros beyond the scale do not carry precision
        assert_eq!(
            validate_amount(WalletKind::Cash, dec!(10.0000)).unwrap(),
            dec!(10.00)
        );
    }
}
