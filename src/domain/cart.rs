use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
}

/// Cart items grouped by fulfilment type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemMap {
    #[serde(default)]
    pub digital_items: Vec<CartLineItem>,
    #[serde(default)]
    pub physical_items: Vec<CartLineItem>,
}

/// The `{ itemId, quantity }` pair consignment calls expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    pub currency: Currency,
    /// Item total before shipping.
    pub base_amount: Decimal,
    #[serde(default)]
    pub line_items: LineItemMap,
}

impl Cart {
    /// A cart needs shipping as soon as it holds one physical item.
    pub fn requires_shipping(&self) -> bool {
        !self.line_items.physical_items.is_empty()
    }
}

/// Flattens the cart's digital and physical items, digital first, each group
/// in source order.
pub fn collect_line_items(line_items: &LineItemMap) -> Vec<LineItem> {
    line_items
        .digital_items
        .iter()
        .chain(line_items.physical_items.iter())
        .map(|item| LineItem {
            item_id: item.id.clone(),
            quantity: item.quantity,
        })
        .collect()
}
