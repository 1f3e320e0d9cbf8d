use serde::{Deserialize, Serialize};

/// Routes the submitted order to the payment method that approved it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRouting {
    pub method_id: String,
    pub gateway_id: Option<String>,
}

/// Order submission body: the cart as it stands, minus payment details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub cart_id: String,
    pub payment: PaymentRouting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedOrder {
    pub order_id: u64,
}

/// Body of the create-order call made when the shopper opens the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub cart_id: String,
    pub is_credit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProviderOrderStatus {
    Created,
    Completed,
    Authorized,
}
