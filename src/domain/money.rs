use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// A currency amount as PayPal displays it: two decimal places.
///
/// Wraps `rust_decimal::Decimal` so that totals are summed as decimals and only
/// formatted at the very end, never concatenated as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates an amount rounded half away from zero to two decimal places.
    pub fn new(value: Decimal) -> Self {
        Self(value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Formats the amount with exactly two decimal places, e.g. `"5.00"`.
    pub fn to_currency_string(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_currency_string())
    }
}

/// PayPal's `{ currency_code, value }` amount object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency_code: String,
    pub value: String,
}

impl CurrencyAmount {
    pub fn new(currency_code: &str, amount: Money) -> Self {
        Self {
            currency_code: currency_code.to_string(),
            value: amount.to_currency_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_arithmetic() {
        let base = Money::new(dec!(49.99));
        let shipping = Money::new(dec!(5));
        assert_eq!(base + shipping, Money::new(dec!(54.99)));
    }

    #[test]
    fn test_money_formatting_pads_and_rounds() {
        assert_eq!(Money::new(dec!(5)).to_currency_string(), "5.00");
        assert_eq!(Money::new(dec!(0.1)).to_currency_string(), "0.10");
        assert_eq!(Money::new(dec!(1.005)).to_currency_string(), "1.01");
        assert_eq!(Money::new(dec!(2.994)).to_currency_string(), "2.99");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_money_sum_is_not_string_concatenation() {
        let mut total = Money::new(dec!(0.1));
        total += Money::new(dec!(0.2));
        assert_eq!(total.to_currency_string(), "0.30");
    }
}
