use super::money::{CurrencyAmount, Money};
use super::shipping::DecoratedShippingOption;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const AMOUNT_PATH: &str = "/purchase_units/@reference_id=='default'/amount";
pub const SHIPPING_OPTIONS_PATH: &str =
    "/purchase_units/@reference_id=='default'/shipping/options";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Replace,
    Add,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub item_total: CurrencyAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<CurrencyAmount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountWithBreakdown {
    pub currency_code: String,
    pub value: String,
    pub breakdown: Breakdown,
}

impl AmountWithBreakdown {
    /// Sum of the breakdown fields; equals `value` for every patch built here.
    pub fn breakdown_total(&self) -> Option<Decimal> {
        let item_total = Decimal::from_str(&self.breakdown.item_total.value).ok()?;
        let shipping = match &self.breakdown.shipping {
            Some(shipping) => Decimal::from_str(&shipping.value).ok()?,
            None => Decimal::ZERO,
        };
        Some(item_total + shipping)
    }

    pub fn is_consistent(&self) -> bool {
        match (Decimal::from_str(&self.value), self.breakdown_total()) {
            (Ok(value), Some(total)) => value == total,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchValue {
    Amount(AmountWithBreakdown),
    ShippingOptions(Vec<DecoratedShippingOption>),
}

/// A JSON-Patch style instruction for the PayPal order-update API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    pub value: PatchValue,
}

impl PatchOperation {
    pub fn amount(&self) -> Option<&AmountWithBreakdown> {
        match &self.value {
            PatchValue::Amount(amount) => Some(amount),
            PatchValue::ShippingOptions(_) => None,
        }
    }

    pub fn shipping_options(&self) -> Option<&[DecoratedShippingOption]> {
        match &self.value {
            PatchValue::ShippingOptions(options) => Some(options),
            PatchValue::Amount(_) => None,
        }
    }
}

/// Replaces the purchase-unit amount with `base + shipping`.
///
/// `shipping` is `None` when the cart does not ship; the breakdown then
/// carries no shipping key at all.
pub fn build_amount_patch(
    currency_code: &str,
    base_amount: Money,
    shipping_amount: Option<Money>,
) -> PatchOperation {
    let total = base_amount + shipping_amount.unwrap_or(Money::ZERO);

    let amount = AmountWithBreakdown {
        currency_code: currency_code.to_string(),
        value: total.to_currency_string(),
        breakdown: Breakdown {
            item_total: CurrencyAmount::new(currency_code, base_amount),
            shipping: shipping_amount.map(|shipping| CurrencyAmount::new(currency_code, shipping)),
        },
    };
    debug_assert!(amount.is_consistent());

    PatchOperation {
        op: PatchOp::Replace,
        path: AMOUNT_PATH.to_string(),
        value: PatchValue::Amount(amount),
    }
}

/// Attaches the decorated option list so the widget can render it.
pub fn build_shipping_options_patch(options: Vec<DecoratedShippingOption>) -> PatchOperation {
    PatchOperation {
        op: PatchOp::Add,
        path: SHIPPING_OPTIONS_PATH.to_string(),
        value: PatchValue::ShippingOptions(options),
    }
}
