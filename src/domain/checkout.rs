use super::address::Address;
use super::cart::{Cart, LineItem};
use super::shipping::ShippingOption;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    pub id: String,
    pub cart: Cart,
}

/// Body of a consignment create / shipping-option quote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsignmentRequest {
    pub shipping_address: Address,
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consignment {
    pub id: String,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub available_shipping_options: Vec<ShippingOption>,
    #[serde(default)]
    pub selected_shipping_option_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutWithConsignments {
    pub id: String,
    #[serde(default)]
    pub consignments: Vec<Consignment>,
}

impl CheckoutWithConsignments {
    /// Shipping options quoted on the first consignment; the button flow only
    /// ever ships to a single address.
    pub fn available_shipping_options(&self) -> &[ShippingOption] {
        self.consignments
            .first()
            .map(|consignment| consignment.available_shipping_options.as_slice())
            .unwrap_or_default()
    }

    pub fn consignment_id(&self) -> Option<&str> {
        self.consignments
            .first()
            .map(|consignment| consignment.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutWithBillingAddress {
    pub id: String,
    #[serde(default)]
    pub billing_address: Option<Address>,
}
