use crate::config::{ButtonConfig, ButtonInitializeOptions};
use crate::domain::address::{self, ShippingContact};
use crate::domain::cart::collect_line_items;
use crate::domain::checkout::{Checkout, ConsignmentRequest};
use crate::domain::money::Money;
use crate::domain::order::{CreateOrderRequest, OrderRequest, PaymentRouting};
use crate::domain::patch::{PatchOperation, build_amount_patch, build_shipping_options_patch};
use crate::domain::ports::{
    CheckoutLoaderBox, ConsignmentGateway, ConsignmentGatewayBox, NavigatorBox,
    OrderSubmitterBox, ProviderOrderApiBox,
};
use crate::domain::session::{Intent, Session};
use crate::domain::shipping::{ShippingDecision, decide};
use crate::error::{CheckoutError, MissingDataKind, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub const ORDER_CONFIRMATION_URL: &str = "/checkout/order-confirmation";
pub const EXTERNAL_CHECKOUT_URL: &str = "/checkout.php";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Completion {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowState {
    Uninitialized,
    Initialized,
    AwaitingApproval,
    Finalizing,
    Terminal(Completion),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickData {
    #[serde(default)]
    pub funding_source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedShippingOption {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// Payload of PayPal's shipping-change callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingChangeData {
    pub shipping_address: ShippingContact,
    #[serde(default)]
    pub selected_shipping_option: Option<SelectedShippingOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApproveData {
    #[serde(rename = "orderID", default)]
    pub order_id: Option<String>,
    #[serde(rename = "payerID", default)]
    pub payer_id: Option<String>,
}

/// How the widget should answer a shipping change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "patch", rename_all = "camelCase")]
pub enum ShippingChangeOutcome {
    /// The store cannot ship to this address.
    Reject,
    Patch(Vec<PatchOperation>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ApprovalOutcome {
    #[serde(rename_all = "camelCase")]
    OrderSubmitted { order_id: u64, redirect_url: String },
    FormPosted { url: String },
}

/// Collaborators the controller drives.
pub struct Collaborators {
    pub checkout_loader: CheckoutLoaderBox,
    pub consignments: ConsignmentGatewayBox,
    pub orders: ProviderOrderApiBox,
    pub order_submitter: OrderSubmitterBox,
    pub navigator: NavigatorBox,
}

struct FlowContext {
    config: ButtonConfig,
    checkout: Checkout,
    session: Session,
}

/// Drives one PayPal Commerce button from mount to order submission.
///
/// The widget delivers callbacks one at a time, so every handler takes
/// `&mut self` and the session has a single writer.
pub struct ButtonFlowController {
    collaborators: Collaborators,
    state: FlowState,
    context: Option<FlowContext>,
}

impl ButtonFlowController {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            state: FlowState::Uninitialized,
            context: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.context.as_ref().map(|context| &context.session)
    }

    pub fn config(&self) -> Option<&ButtonConfig> {
        self.context.as_ref().map(|context| &context.config)
    }

    pub fn checkout(&self) -> Option<&Checkout> {
        self.context.as_ref().map(|context| &context.checkout)
    }

    /// Validates the options and loads the checkout the button pays for.
    #[instrument(skip_all)]
    pub async fn initialize(&mut self, options: ButtonInitializeOptions) -> Result<()> {
        let config = ButtonConfig::try_from(options)?;
        let checkout = self
            .collaborators
            .checkout_loader
            .load_default_checkout()
            .await?;

        info!(
            method_id = %config.method_id,
            cart_id = %checkout.cart.id,
            hosted = config.is_hosted_checkout,
            "paypal commerce button initialized"
        );
        let session = Session::new(config.intent);
        self.context = Some(FlowContext {
            config,
            checkout,
            session,
        });
        self.transition(FlowState::Initialized);
        Ok(())
    }

    pub fn deinitialize(&mut self) {
        self.context = None;
        self.transition(FlowState::Uninitialized);
    }

    pub fn on_click(&mut self, data: &ClickData) -> Result<()> {
        let context = self.initialized_mut()?;
        let session = std::mem::take(&mut context.session);
        context.session = session.with_funding_source(&data.funding_source);
        debug!(
            funding_source = %data.funding_source,
            credit = context.session.is_credit_selected,
            "funding source selected"
        );
        Ok(())
    }

    /// Creates the PayPal order the widget opens.
    #[instrument(skip(self))]
    pub async fn on_create_order(&mut self) -> Result<String> {
        let context = self.initialized()?;
        let request = CreateOrderRequest {
            cart_id: context.checkout.cart.id.clone(),
            is_credit: context.session.is_credit_selected,
        };
        let order_id = self.collaborators.orders.create_order(request).await?;
        info!(%order_id, "paypal order created");
        Ok(order_id)
    }

    /// Reconciles the shopper's PayPal shipping pick with the storefront.
    ///
    /// The session is only updated when the handler succeeds.
    #[instrument(skip_all, fields(country = %data.shipping_address.country_code))]
    pub async fn on_shipping_change(
        &mut self,
        data: &ShippingChangeData,
    ) -> Result<ShippingChangeOutcome> {
        let context = self.initialized()?;
        let (session, outcome) = context
            .reconcile_shipping(&*self.collaborators.consignments, data)
            .await?;
        self.initialized_mut()?.session = session;
        Ok(outcome)
    }

    /// Finalizes an approved PayPal order.
    #[instrument(skip_all)]
    pub async fn on_approve(&mut self, data: ApproveData) -> Result<ApprovalOutcome> {
        self.initialized()?;
        self.transition(FlowState::AwaitingApproval);

        let result = self.finalize(data).await;
        match &result {
            Ok(_) => self.transition(FlowState::Terminal(Completion::Succeeded)),
            Err(error) => {
                warn!(%error, "order finalization failed");
                self.transition(FlowState::Terminal(Completion::Failed));
            }
        }
        result
    }

    async fn finalize(&mut self, data: ApproveData) -> Result<ApprovalOutcome> {
        let order_id = data
            .order_id
            .filter(|order_id| !order_id.is_empty())
            .ok_or(CheckoutError::MissingData(MissingDataKind::OrderId))?;
        self.transition(FlowState::Finalizing);

        let context = self.context.as_ref().ok_or(CheckoutError::NotInitialized)?;
        if context.config.is_hosted_checkout {
            self.finalize_hosted(context, &order_id)
                .await
                .map_err(CheckoutError::request)
        } else {
            self.post_external_checkout(context, &order_id).await
        }
    }

    /// Settles the PayPal order and submits the storefront order. A recorded
    /// shipping address is persisted as a consignment first.
    async fn finalize_hosted(
        &self,
        context: &FlowContext,
        order_id: &str,
    ) -> Result<ApprovalOutcome> {
        let orders = &self.collaborators.orders;
        let status = match context.session.intent {
            Intent::Capture => orders.capture(order_id).await?,
            Intent::Authorize => orders.authorize(order_id).await?,
        };
        info!(%order_id, ?status, intent = context.session.intent.as_str(), "paypal order settled");

        let cart = &context.checkout.cart;
        let gateway = &self.collaborators.consignments;
        if let Some(address) = &context.session.current_shipping_address {
            let request = [ConsignmentRequest {
                shipping_address: address.clone(),
                line_items: collect_line_items(&cart.line_items),
            }];
            let created = gateway.create_consignments(&cart.id, &request).await?;
            let consignment_id = created
                .consignment_id()
                .ok_or(CheckoutError::MissingData(MissingDataKind::Consignment))?;

            gateway.get_billing_address(&cart.id, address).await?;
            if let Some(option_id) = &context.session.selected_shipping_option_id {
                gateway
                    .update_consignment(&cart.id, consignment_id, option_id)
                    .await?;
            }
            debug!(%consignment_id, "consignment persisted");
        }

        let submitted = self
            .collaborators
            .order_submitter
            .submit_order(OrderRequest {
                cart_id: cart.id.clone(),
                payment: PaymentRouting {
                    method_id: context.config.method_id.clone(),
                    gateway_id: None,
                },
            })
            .await?;
        gateway.delete_cart(&cart.id).await?;
        self.collaborators
            .navigator
            .redirect(ORDER_CONFIRMATION_URL)
            .await?;

        info!(order_id = submitted.order_id, "order submitted");
        Ok(ApprovalOutcome::OrderSubmitted {
            order_id: submitted.order_id,
            redirect_url: ORDER_CONFIRMATION_URL.to_string(),
        })
    }

    async fn post_external_checkout(
        &self,
        context: &FlowContext,
        order_id: &str,
    ) -> Result<ApprovalOutcome> {
        let mut fields = BTreeMap::from([
            ("payment_type".to_string(), "paypal".to_string()),
            ("action".to_string(), "set_external_checkout".to_string()),
            ("provider".to_string(), context.config.method_id.clone()),
            ("order_id".to_string(), order_id.to_string()),
        ]);
        if context.session.is_credit_selected {
            fields.insert("is_credit".to_string(), "true".to_string());
        }

        self.collaborators
            .navigator
            .post_form(EXTERNAL_CHECKOUT_URL, fields)
            .await?;
        info!(%order_id, "handed approval to server-side checkout");
        Ok(ApprovalOutcome::FormPosted {
            url: EXTERNAL_CHECKOUT_URL.to_string(),
        })
    }

    fn initialized(&self) -> Result<&FlowContext> {
        match (&self.state, &self.context) {
            (FlowState::Initialized, Some(context)) => Ok(context),
            _ => Err(CheckoutError::NotInitialized),
        }
    }

    fn initialized_mut(&mut self) -> Result<&mut FlowContext> {
        match (&self.state, &mut self.context) {
            (FlowState::Initialized, Some(context)) => Ok(context),
            _ => Err(CheckoutError::NotInitialized),
        }
    }

    fn transition(&mut self, next: FlowState) {
        debug!(from = ?self.state, to = ?next, "button flow transition");
        self.state = next;
    }
}

impl FlowContext {
    async fn reconcile_shipping(
        &self,
        gateway: &dyn ConsignmentGateway,
        data: &ShippingChangeData,
    ) -> Result<(Session, ShippingChangeOutcome)> {
        let mut session = self.session.clone();
        let countries = match &session.country_cache {
            Some(countries) => Arc::clone(countries),
            None => {
                let countries = Arc::new(gateway.get_store_countries().await?);
                session.country_cache = Some(Arc::clone(&countries));
                countries
            }
        };
        let address = address::translate(&data.shipping_address, &countries)?;

        if let Some(selected) = &data.selected_shipping_option {
            session.selected_shipping_option_id = Some(selected.id.clone());
        }
        let addresses_match = session.selection_holds_for(&address);

        let cart = &self.checkout.cart;
        let currency_code = cart.currency.code.as_str();
        let base_amount = Money::new(cart.base_amount);
        let requires_shipping = cart.requires_shipping();

        let quoted = if requires_shipping {
            let request = [ConsignmentRequest {
                shipping_address: address.clone(),
                line_items: collect_line_items(&cart.line_items),
            }];
            Some(gateway.get_shipping_options(&cart.id, &request).await?)
        } else {
            None
        };
        let options = quoted
            .as_ref()
            .map(|quoted| quoted.available_shipping_options())
            .unwrap_or_default();

        let decision = decide(
            requires_shipping,
            options,
            session.selected_shipping_option_id.as_deref(),
            addresses_match,
            currency_code,
        );

        let outcome = match decision {
            ShippingDecision::Unserviceable => {
                warn!(
                    country = %address.country_code,
                    "no shipping options for address, rejecting"
                );
                // Keep the last serviceable address; only the country cache survives.
                let mut unchanged = self.session.clone();
                unchanged.country_cache = session.country_cache;
                return Ok((unchanged, ShippingChangeOutcome::Reject));
            }
            ShippingDecision::NotRequired => {
                debug!("cart has no physical items, patching total only");
                vec![build_amount_patch(currency_code, base_amount, None)]
            }
            ShippingDecision::Resolved(resolution) => {
                if let (Some(consignment_id), Some(option_id)) = (
                    quoted.as_ref().and_then(|quoted| quoted.consignment_id()),
                    resolution.chosen_option_id.as_deref(),
                ) {
                    gateway
                        .update_consignment(&cart.id, consignment_id, option_id)
                        .await?;
                }
                debug!(
                    chosen = ?resolution.chosen_option_id,
                    shipping = %resolution.shipping_amount,
                    "shipping option resolved"
                );
                session.selected_shipping_option_id = resolution.chosen_option_id;
                vec![
                    build_amount_patch(
                        currency_code,
                        base_amount,
                        Some(resolution.shipping_amount),
                    ),
                    build_shipping_options_patch(resolution.decorated_options),
                ]
            }
        };

        session.current_shipping_address = Some(address.clone());
        session.last_submitted_shipping_address = Some(address);
        Ok((session, ShippingChangeOutcome::Patch(outcome)))
    }
}
