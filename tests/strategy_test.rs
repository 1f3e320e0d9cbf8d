mod common;

use common::{Harness, options, physical_fixture};
use ppcp_button::application::controller::{ButtonFlowController, Collaborators, FlowState};
use ppcp_button::application::strategy::PaypalCommerceButtonStrategy;
use ppcp_button::config::ButtonInitializeOptions;
use ppcp_button::domain::ports::CheckoutButtonStrategy;
use ppcp_button::domain::session::Intent;
use ppcp_button::error::{CheckoutError, InvalidArgumentKind};
use ppcp_button::infrastructure::in_memory::{
    InMemoryPaypal, InMemoryStorefront, PaypalCall, RecordingNavigator, StorefrontCall,
};

fn strategy(storefront: &InMemoryStorefront, paypal: &InMemoryPaypal) -> PaypalCommerceButtonStrategy {
    let controller = ButtonFlowController::new(Collaborators {
        checkout_loader: Box::new(storefront.clone()),
        consignments: Box::new(storefront.clone()),
        orders: Box::new(paypal.clone()),
        order_submitter: Box::new(storefront.clone()),
        navigator: Box::new(RecordingNavigator::new()),
    });
    PaypalCommerceButtonStrategy::new(controller, Box::new(paypal.clone()))
}

#[tokio::test]
async fn test_initialize_loads_sdk_and_renders() {
    let storefront = InMemoryStorefront::new(physical_fixture());
    let paypal = InMemoryPaypal::new();
    let mut button = strategy(&storefront, &paypal);

    button
        .initialize(options(false, Intent::Authorize))
        .await
        .unwrap();

    let params = paypal.sdk_params().await.unwrap();
    assert_eq!(params.client_id, "client-id");
    assert_eq!(params.currency, "USD");
    assert_eq!(params.intent, Intent::Authorize);
    assert_eq!(paypal.mounted_containers().await, vec!["paypal-button"]);
    assert_eq!(button.controller().state(), FlowState::Initialized);
}

#[tokio::test]
async fn test_deinitialize_removes_button() {
    let storefront = InMemoryStorefront::new(physical_fixture());
    let paypal = InMemoryPaypal::new();
    let mut button = strategy(&storefront, &paypal);
    button
        .initialize(options(false, Intent::Capture))
        .await
        .unwrap();

    button.deinitialize().await.unwrap();

    assert!(paypal.mounted_containers().await.is_empty());
    assert_eq!(button.controller().state(), FlowState::Uninitialized);
    assert_eq!(
        paypal.calls().await,
        vec![
            PaypalCall::LoadSdk,
            PaypalCall::RenderButton,
            PaypalCall::RemoveContainer
        ]
    );
}

#[tokio::test]
async fn test_missing_client_id_fails_before_loading() {
    let storefront = InMemoryStorefront::new(physical_fixture());
    let paypal = InMemoryPaypal::new();
    let mut button = strategy(&storefront, &paypal);
    let mut opts = options(false, Intent::Capture);
    opts.paypal_commerce.as_mut().unwrap().client_id = None;

    let result = button.initialize(opts).await;

    assert!(matches!(
        result,
        Err(CheckoutError::InvalidArgument(
            InvalidArgumentKind::MissingClientId
        ))
    ));
    assert!(storefront.calls().await.is_empty());
    assert!(paypal.calls().await.is_empty());
}

#[tokio::test]
async fn test_empty_options_rejected() {
    let mut harness = Harness::new(physical_fixture());

    let result = harness
        .flow
        .initialize(ButtonInitializeOptions::default())
        .await;

    assert!(matches!(result, Err(CheckoutError::InvalidArgument(_))));
    assert_eq!(
        harness
            .storefront
            .call_count(StorefrontCall::LoadCheckout)
            .await,
        0
    );
}

#[tokio::test]
async fn test_sdk_failure_surfaces() {
    let storefront = InMemoryStorefront::new(physical_fixture());
    let paypal = InMemoryPaypal::new();
    paypal.fail_on(PaypalCall::LoadSdk).await;
    let mut button = strategy(&storefront, &paypal);

    let result = button.initialize(options(false, Intent::Capture)).await;

    assert!(matches!(result, Err(CheckoutError::Gateway(_))));
    assert!(paypal.mounted_containers().await.is_empty());
}
