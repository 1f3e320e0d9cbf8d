use crate::config::SdkParams;
use crate::domain::address::{Address, CountryTable};
use crate::domain::checkout::{
    Checkout, CheckoutWithBillingAddress, CheckoutWithConsignments, Consignment,
    ConsignmentRequest,
};
use crate::domain::order::{
    CreateOrderRequest, OrderRequest, ProviderOrderStatus, SubmittedOrder,
};
use crate::domain::ports::{
    CheckoutLoader, ConsignmentGateway, Navigator, OrderSubmitter, ProviderOrderApi, WidgetHost,
};
use crate::domain::shipping::ShippingOption;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockWriteGuard};

/// Storefront endpoints the in-memory collaborators record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorefrontCall {
    LoadCheckout,
    GetShippingOptions,
    CreateConsignments,
    UpdateConsignment,
    GetBillingAddress,
    DeleteCart,
    GetStoreCountries,
    SubmitOrder,
}

/// Seed data for an [`InMemoryStorefront`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontFixture {
    pub checkout: Checkout,
    #[serde(default)]
    pub countries: CountryTable,
    #[serde(default)]
    pub shipping_options: Vec<ShippingOption>,
    /// Countries the store quotes no shipping options for.
    #[serde(default)]
    pub unserviceable_countries: Vec<String>,
}

#[derive(Debug)]
struct StorefrontState {
    fixture: StorefrontFixture,
    consignments: Vec<Consignment>,
    next_consignment: u32,
    submitted_orders: Vec<OrderRequest>,
    deleted_carts: Vec<String>,
    calls: Vec<StorefrontCall>,
    failing: HashSet<StorefrontCall>,
}

/// A thread-safe in-memory storefront.
///
/// Implements the checkout loader, consignment gateway and order submitter.
/// `Clone` shares the underlying state, so tests keep a handle to inspect
/// the calls a controller made through its boxed copy.
#[derive(Debug, Clone)]
pub struct InMemoryStorefront {
    state: Arc<RwLock<StorefrontState>>,
}

impl InMemoryStorefront {
    pub fn new(fixture: StorefrontFixture) -> Self {
        Self {
            state: Arc::new(RwLock::new(StorefrontState {
                fixture,
                consignments: Vec::new(),
                next_consignment: 1,
                submitted_orders: Vec::new(),
                deleted_carts: Vec::new(),
                calls: Vec::new(),
                failing: HashSet::new(),
            })),
        }
    }

    /// Makes every later call of this kind fail with a gateway error.
    pub async fn fail_on(&self, call: StorefrontCall) {
        self.state.write().await.failing.insert(call);
    }

    pub async fn set_shipping_options(&self, options: Vec<ShippingOption>) {
        self.state.write().await.fixture.shipping_options = options;
    }

    pub async fn calls(&self) -> Vec<StorefrontCall> {
        self.state.read().await.calls.clone()
    }

    pub async fn call_count(&self, call: StorefrontCall) -> usize {
        self.state
            .read()
            .await
            .calls
            .iter()
            .filter(|recorded| **recorded == call)
            .count()
    }

    pub async fn consignments(&self) -> Vec<Consignment> {
        self.state.read().await.consignments.clone()
    }

    pub async fn submitted_orders(&self) -> Vec<OrderRequest> {
        self.state.read().await.submitted_orders.clone()
    }

    pub async fn deleted_carts(&self) -> Vec<String> {
        self.state.read().await.deleted_carts.clone()
    }

    async fn record(&self, call: StorefrontCall) -> Result<RwLockWriteGuard<'_, StorefrontState>> {
        let mut state = self.state.write().await;
        state.calls.push(call);
        if state.failing.contains(&call) {
            return Err(CheckoutError::Gateway(format!("{call:?} failed")));
        }
        Ok(state)
    }
}

impl StorefrontState {
    fn ensure_cart(&self, cart_id: &str) -> Result<()> {
        if self.fixture.checkout.cart.id == cart_id {
            Ok(())
        } else {
            Err(CheckoutError::Gateway(format!("unknown cart `{cart_id}`")))
        }
    }

    fn quote(&self, request: &ConsignmentRequest) -> Vec<ShippingOption> {
        let country = &request.shipping_address.country_code;
        let unserviceable = self
            .fixture
            .unserviceable_countries
            .iter()
            .any(|code| code.eq_ignore_ascii_case(country));
        if unserviceable {
            Vec::new()
        } else {
            self.fixture.shipping_options.clone()
        }
    }

    fn consignment(&mut self, request: &ConsignmentRequest) -> Consignment {
        let id = format!("consignment-{}", self.next_consignment);
        self.next_consignment += 1;
        Consignment {
            id,
            shipping_address: Some(request.shipping_address.clone()),
            available_shipping_options: self.quote(request),
            selected_shipping_option_id: None,
        }
    }

    fn snapshot(&self) -> CheckoutWithConsignments {
        CheckoutWithConsignments {
            id: self.fixture.checkout.id.clone(),
            consignments: self.consignments.clone(),
        }
    }
}

#[async_trait]
impl CheckoutLoader for InMemoryStorefront {
    async fn load_default_checkout(&self) -> Result<Checkout> {
        let state = self.record(StorefrontCall::LoadCheckout).await?;
        Ok(state.fixture.checkout.clone())
    }
}

#[async_trait]
impl ConsignmentGateway for InMemoryStorefront {
    async fn get_shipping_options(
        &self,
        cart_id: &str,
        consignments: &[ConsignmentRequest],
    ) -> Result<CheckoutWithConsignments> {
        let mut state = self.record(StorefrontCall::GetShippingOptions).await?;
        state.ensure_cart(cart_id)?;

        // Quotes reuse the existing consignment, the way the storefront
        // updates an address in place.
        let existing_ids: Vec<String> = state
            .consignments
            .iter()
            .map(|consignment| consignment.id.clone())
            .collect();
        let mut quoted = Vec::with_capacity(consignments.len());
        for (index, request) in consignments.iter().enumerate() {
            let mut consignment = state.consignment(request);
            if let Some(id) = existing_ids.get(index) {
                consignment.id = id.clone();
            }
            quoted.push(consignment);
        }
        state.consignments = quoted;
        Ok(state.snapshot())
    }

    async fn create_consignments(
        &self,
        cart_id: &str,
        consignments: &[ConsignmentRequest],
    ) -> Result<CheckoutWithConsignments> {
        let mut state = self.record(StorefrontCall::CreateConsignments).await?;
        state.ensure_cart(cart_id)?;

        let created: Vec<Consignment> = consignments
            .iter()
            .map(|request| state.consignment(request))
            .collect();
        state.consignments = created;
        Ok(state.snapshot())
    }

    async fn update_consignment(
        &self,
        cart_id: &str,
        consignment_id: &str,
        shipping_option_id: &str,
    ) -> Result<()> {
        let mut state = self.record(StorefrontCall::UpdateConsignment).await?;
        state.ensure_cart(cart_id)?;

        let consignment = state
            .consignments
            .iter_mut()
            .find(|consignment| consignment.id == consignment_id)
            .ok_or_else(|| {
                CheckoutError::Gateway(format!("unknown consignment `{consignment_id}`"))
            })?;
        if !consignment
            .available_shipping_options
            .iter()
            .any(|option| option.id == shipping_option_id)
        {
            return Err(CheckoutError::Gateway(format!(
                "shipping option `{shipping_option_id}` is not available"
            )));
        }
        consignment.selected_shipping_option_id = Some(shipping_option_id.to_string());
        Ok(())
    }

    async fn get_billing_address(
        &self,
        cart_id: &str,
        address: &Address,
    ) -> Result<CheckoutWithBillingAddress> {
        let state = self.record(StorefrontCall::GetBillingAddress).await?;
        state.ensure_cart(cart_id)?;
        Ok(CheckoutWithBillingAddress {
            id: state.fixture.checkout.id.clone(),
            billing_address: Some(address.clone()),
        })
    }

    async fn delete_cart(&self, cart_id: &str) -> Result<()> {
        let mut state = self.record(StorefrontCall::DeleteCart).await?;
        state.ensure_cart(cart_id)?;
        state.deleted_carts.push(cart_id.to_string());
        Ok(())
    }

    async fn get_store_countries(&self) -> Result<CountryTable> {
        let state = self.record(StorefrontCall::GetStoreCountries).await?;
        Ok(state.fixture.countries.clone())
    }
}

#[async_trait]
impl OrderSubmitter for InMemoryStorefront {
    async fn submit_order(&self, request: OrderRequest) -> Result<SubmittedOrder> {
        let mut state = self.record(StorefrontCall::SubmitOrder).await?;
        state.ensure_cart(&request.cart_id)?;
        state.submitted_orders.push(request);
        Ok(SubmittedOrder {
            order_id: 100 + state.submitted_orders.len() as u64,
        })
    }
}

/// PayPal-side calls the in-memory provider records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaypalCall {
    CreateOrder,
    Capture,
    Authorize,
    LoadSdk,
    RenderButton,
    RemoveContainer,
}

#[derive(Debug, Default)]
struct PaypalState {
    orders: HashMap<String, ProviderOrderStatus>,
    created: Vec<CreateOrderRequest>,
    sdk_params: Option<SdkParams>,
    mounted: Vec<String>,
    calls: Vec<PaypalCall>,
    failing: HashSet<PaypalCall>,
}

/// An in-memory stand-in for the PayPal order API and the button widget host.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPaypal {
    state: Arc<RwLock<PaypalState>>,
}

impl InMemoryPaypal {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_on(&self, call: PaypalCall) {
        self.state.write().await.failing.insert(call);
    }

    pub async fn calls(&self) -> Vec<PaypalCall> {
        self.state.read().await.calls.clone()
    }

    pub async fn order_status(&self, order_id: &str) -> Option<ProviderOrderStatus> {
        self.state.read().await.orders.get(order_id).cloned()
    }

    pub async fn created_orders(&self) -> Vec<CreateOrderRequest> {
        self.state.read().await.created.clone()
    }

    pub async fn sdk_params(&self) -> Option<SdkParams> {
        self.state.read().await.sdk_params.clone()
    }

    pub async fn mounted_containers(&self) -> Vec<String> {
        self.state.read().await.mounted.clone()
    }

    async fn record(&self, call: PaypalCall) -> Result<RwLockWriteGuard<'_, PaypalState>> {
        let mut state = self.state.write().await;
        state.calls.push(call);
        if state.failing.contains(&call) {
            return Err(CheckoutError::Gateway(format!("{call:?} failed")));
        }
        Ok(state)
    }

    async fn settle(
        &self,
        call: PaypalCall,
        order_id: &str,
        status: ProviderOrderStatus,
    ) -> Result<ProviderOrderStatus> {
        let mut state = self.record(call).await?;
        let settled = matches!(
            state.orders.get(order_id),
            Some(ProviderOrderStatus::Completed | ProviderOrderStatus::Authorized)
        );
        if settled {
            return Err(CheckoutError::Gateway(format!(
                "order `{order_id}` is already settled"
            )));
        }
        state.orders.insert(order_id.to_string(), status.clone());
        Ok(status)
    }
}

#[async_trait]
impl ProviderOrderApi for InMemoryPaypal {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<String> {
        let mut state = self.record(PaypalCall::CreateOrder).await?;
        state.created.push(request);
        let order_id = format!("PAYPAL-ORDER-{}", state.created.len());
        state
            .orders
            .insert(order_id.clone(), ProviderOrderStatus::Created);
        Ok(order_id)
    }

    async fn capture(&self, order_id: &str) -> Result<ProviderOrderStatus> {
        self.settle(PaypalCall::Capture, order_id, ProviderOrderStatus::Completed)
            .await
    }

    async fn authorize(&self, order_id: &str) -> Result<ProviderOrderStatus> {
        self.settle(PaypalCall::Authorize, order_id, ProviderOrderStatus::Authorized)
            .await
    }
}

#[async_trait]
impl WidgetHost for InMemoryPaypal {
    async fn load_sdk(&self, params: &SdkParams) -> Result<()> {
        let mut state = self.record(PaypalCall::LoadSdk).await?;
        state.sdk_params = Some(params.clone());
        Ok(())
    }

    async fn render_button(&self, container_id: &str) -> Result<()> {
        let mut state = self.record(PaypalCall::RenderButton).await?;
        if state.sdk_params.is_none() {
            return Err(CheckoutError::Gateway("PayPal SDK is not loaded".to_string()));
        }
        state.mounted.push(container_id.to_string());
        Ok(())
    }

    async fn remove_container(&self, container_id: &str) -> Result<()> {
        let mut state = self.record(PaypalCall::RemoveContainer).await?;
        state.mounted.retain(|mounted| mounted != container_id);
        Ok(())
    }
}

/// A navigation event captured by [`RecordingNavigator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Navigation {
    Redirect { url: String },
    FormPost { url: String, fields: BTreeMap<String, String> },
}

/// Records redirects and form posts instead of leaving the page.
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    navigations: Arc<RwLock<Vec<Navigation>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn navigations(&self) -> Vec<Navigation> {
        self.navigations.read().await.clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn redirect(&self, url: &str) -> Result<()> {
        self.navigations.write().await.push(Navigation::Redirect {
            url: url.to_string(),
        });
        Ok(())
    }

    async fn post_form(&self, url: &str, fields: BTreeMap<String, String>) -> Result<()> {
        self.navigations.write().await.push(Navigation::FormPost {
            url: url.to_string(),
            fields,
        });
        Ok(())
    }
}
