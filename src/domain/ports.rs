use super::address::{Address, CountryTable};
use super::checkout::{
    Checkout, CheckoutWithBillingAddress, CheckoutWithConsignments, ConsignmentRequest,
};
use super::order::{CreateOrderRequest, OrderRequest, ProviderOrderStatus, SubmittedOrder};
use crate::config::{ButtonInitializeOptions, SdkParams};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Loads the storefront checkout the button is mounted for.
#[async_trait]
pub trait CheckoutLoader: Send + Sync {
    async fn load_default_checkout(&self) -> Result<Checkout>;
}

/// Storefront consignment and checkout endpoints.
#[async_trait]
pub trait ConsignmentGateway: Send + Sync {
    /// Quotes shipping options for the given address without persisting it.
    async fn get_shipping_options(
        &self,
        cart_id: &str,
        consignments: &[ConsignmentRequest],
    ) -> Result<CheckoutWithConsignments>;
    async fn create_consignments(
        &self,
        cart_id: &str,
        consignments: &[ConsignmentRequest],
    ) -> Result<CheckoutWithConsignments>;
    async fn update_consignment(
        &self,
        cart_id: &str,
        consignment_id: &str,
        shipping_option_id: &str,
    ) -> Result<()>;
    async fn get_billing_address(
        &self,
        cart_id: &str,
        address: &Address,
    ) -> Result<CheckoutWithBillingAddress>;
    async fn delete_cart(&self, cart_id: &str) -> Result<()>;
    async fn get_store_countries(&self) -> Result<CountryTable>;
}

/// The PayPal order behind the button.
#[async_trait]
pub trait ProviderOrderApi: Send + Sync {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<String>;
    async fn capture(&self, order_id: &str) -> Result<ProviderOrderStatus>;
    async fn authorize(&self, order_id: &str) -> Result<ProviderOrderStatus>;
}

#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    async fn submit_order(&self, request: OrderRequest) -> Result<SubmittedOrder>;
}

/// Page navigation: plain redirects and classic form posts.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn redirect(&self, url: &str) -> Result<()>;
    async fn post_form(&self, url: &str, fields: BTreeMap<String, String>) -> Result<()>;
}

/// Loads the PayPal SDK and mounts or removes the button container.
#[async_trait]
pub trait WidgetHost: Send + Sync {
    async fn load_sdk(&self, params: &SdkParams) -> Result<()>;
    async fn render_button(&self, container_id: &str) -> Result<()>;
    async fn remove_container(&self, container_id: &str) -> Result<()>;
}

/// Capability every checkout button exposes to the mounting host.
#[async_trait]
pub trait CheckoutButtonStrategy: Send {
    async fn initialize(&mut self, options: ButtonInitializeOptions) -> Result<()>;
    async fn deinitialize(&mut self) -> Result<()>;
}

pub type CheckoutLoaderBox = Box<dyn CheckoutLoader>;
pub type ConsignmentGatewayBox = Box<dyn ConsignmentGateway>;
pub type ProviderOrderApiBox = Box<dyn ProviderOrderApi>;
pub type OrderSubmitterBox = Box<dyn OrderSubmitter>;
pub type NavigatorBox = Box<dyn Navigator>;
pub type WidgetHostBox = Box<dyn WidgetHost>;
