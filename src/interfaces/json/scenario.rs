use crate::application::controller::{
    ApprovalOutcome, ApproveData, ButtonFlowController, ClickData, Collaborators, FlowState,
    ShippingChangeData, ShippingChangeOutcome,
};
use crate::application::strategy::PaypalCommerceButtonStrategy;
use crate::config::ButtonInitializeOptions;
use crate::domain::order::OrderRequest;
use crate::domain::ports::CheckoutButtonStrategy;
use crate::error::Result;
use crate::infrastructure::in_memory::{
    InMemoryPaypal, InMemoryStorefront, Navigation, RecordingNavigator, StorefrontFixture,
};
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::warn;

/// A callback the PayPal widget would deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WidgetEvent {
    Click(ClickData),
    CreateOrder,
    ShippingChange { data: ShippingChangeData },
    Approve { data: ApproveData },
}

/// A recorded button session replayed against in-memory collaborators.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub options: ButtonInitializeOptions,
    pub storefront: StorefrontFixture,
    #[serde(default)]
    pub events: Vec<WidgetEvent>,
}

/// Reads a scenario from any JSON source (file, stdin).
pub fn read_scenario<R: Read>(source: R) -> Result<Scenario> {
    Ok(serde_json::from_reader(source)?)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum EventResult {
    Clicked,
    OrderCreated { order_id: String },
    ShippingChanged(ShippingChangeOutcome),
    Approved(ApprovalOutcome),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub index: usize,
    pub result: EventResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub events: Vec<EventRecord>,
    pub final_state: FlowState,
    pub submitted_orders: Vec<OrderRequest>,
    pub navigations: Vec<Navigation>,
}

/// Mounts the button, plays every event in order and tears the button down.
///
/// Event failures are recorded and the replay moves on, the way the widget
/// keeps delivering callbacks after a rejected promise. Initialization
/// failures abort the run.
pub async fn run_scenario(scenario: Scenario) -> Result<ScenarioReport> {
    let storefront = InMemoryStorefront::new(scenario.storefront);
    let paypal = InMemoryPaypal::new();
    let navigator = RecordingNavigator::new();

    let controller = ButtonFlowController::new(Collaborators {
        checkout_loader: Box::new(storefront.clone()),
        consignments: Box::new(storefront.clone()),
        orders: Box::new(paypal.clone()),
        order_submitter: Box::new(storefront.clone()),
        navigator: Box::new(navigator.clone()),
    });
    let mut strategy = PaypalCommerceButtonStrategy::new(controller, Box::new(paypal));
    strategy.initialize(scenario.options).await?;

    let mut events = Vec::with_capacity(scenario.events.len());
    for (index, event) in scenario.events.into_iter().enumerate() {
        let flow = strategy.controller();
        let outcome = match event {
            WidgetEvent::Click(data) => flow.on_click(&data).map(|_| EventResult::Clicked),
            WidgetEvent::CreateOrder => flow
                .on_create_order()
                .await
                .map(|order_id| EventResult::OrderCreated { order_id }),
            WidgetEvent::ShippingChange { data } => flow
                .on_shipping_change(&data)
                .await
                .map(EventResult::ShippingChanged),
            WidgetEvent::Approve { data } => {
                flow.on_approve(data).await.map(EventResult::Approved)
            }
        };
        let result = outcome.unwrap_or_else(|error| {
            warn!(index, %error, "widget event failed");
            EventResult::Failed {
                error: error.to_string(),
            }
        });
        events.push(EventRecord { index, result });
    }

    let final_state = strategy.controller().state();
    strategy.deinitialize().await?;

    Ok(ScenarioReport {
        events,
        final_state,
        submitted_orders: storefront.submitted_orders().await,
        navigations: navigator.navigations().await,
    })
}
