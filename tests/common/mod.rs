#![allow(dead_code)]

use ppcp_button::application::controller::{
    ButtonFlowController, Collaborators, ShippingChangeData, ShippingChangeOutcome,
};
use ppcp_button::config::{ButtonInitializeOptions, PaypalCommerceButtonOptions};
use ppcp_button::domain::address::{Country, CountryTable, ShippingContact, Subdivision};
use ppcp_button::domain::cart::{Cart, CartLineItem, Currency, LineItemMap};
use ppcp_button::domain::checkout::Checkout;
use ppcp_button::domain::patch::PatchOperation;
use ppcp_button::domain::session::Intent;
use ppcp_button::domain::shipping::ShippingOption;
use ppcp_button::infrastructure::in_memory::{
    InMemoryPaypal, InMemoryStorefront, RecordingNavigator, StorefrontFixture,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub struct Harness {
    pub storefront: InMemoryStorefront,
    pub paypal: InMemoryPaypal,
    pub navigator: RecordingNavigator,
    pub flow: ButtonFlowController,
}

impl Harness {
    pub fn new(fixture: StorefrontFixture) -> Self {
        let storefront = InMemoryStorefront::new(fixture);
        let paypal = InMemoryPaypal::new();
        let navigator = RecordingNavigator::new();
        let flow = ButtonFlowController::new(Collaborators {
            checkout_loader: Box::new(storefront.clone()),
            consignments: Box::new(storefront.clone()),
            orders: Box::new(paypal.clone()),
            order_submitter: Box::new(storefront.clone()),
            navigator: Box::new(navigator.clone()),
        });
        Self {
            storefront,
            paypal,
            navigator,
            flow,
        }
    }

    pub async fn initialized(fixture: StorefrontFixture, options: ButtonInitializeOptions) -> Self {
        let mut harness = Self::new(fixture);
        harness
            .flow
            .initialize(options)
            .await
            .expect("initialize failed");
        harness
    }
}

pub fn item(id: &str, quantity: u32) -> CartLineItem {
    CartLineItem {
        id: id.to_string(),
        name: format!("Item {id}"),
        quantity,
    }
}

pub fn option(id: &str, cost: Decimal, is_recommended: bool) -> ShippingOption {
    ShippingOption {
        id: id.to_string(),
        description: format!("Option {id}"),
        cost,
        is_recommended,
    }
}

pub fn countries() -> CountryTable {
    CountryTable {
        data: vec![
            Country {
                code: "US".to_string(),
                name: Some("United States".to_string()),
                subdivisions: ["CA", "NY", "TX"]
                    .iter()
                    .map(|code| Subdivision {
                        code: code.to_string(),
                        name: None,
                    })
                    .collect(),
            },
            Country {
                code: "AU".to_string(),
                name: Some("Australia".to_string()),
                subdivisions: vec![Subdivision {
                    code: "NSW".to_string(),
                    name: Some("New South Wales".to_string()),
                }],
            },
        ],
    }
}

pub fn fixture(base_amount: Decimal, line_items: LineItemMap) -> StorefrontFixture {
    StorefrontFixture {
        checkout: Checkout {
            id: "checkout-1".to_string(),
            cart: Cart {
                id: "cart-1".to_string(),
                currency: Currency {
                    code: "USD".to_string(),
                },
                base_amount,
                line_items,
            },
        },
        countries: countries(),
        shipping_options: vec![
            option("A", dec!(5.00), true),
            option("B", dec!(12.00), false),
        ],
        unserviceable_countries: vec!["AU".to_string()],
    }
}

pub fn physical_fixture() -> StorefrontFixture {
    fixture(
        dec!(49.99),
        LineItemMap {
            digital_items: vec![],
            physical_items: vec![item("mug", 1)],
        },
    )
}

pub fn digital_fixture() -> StorefrontFixture {
    fixture(
        dec!(19.99),
        LineItemMap {
            digital_items: vec![item("ebook", 1)],
            physical_items: vec![],
        },
    )
}

pub fn options(hosted: bool, intent: Intent) -> ButtonInitializeOptions {
    ButtonInitializeOptions {
        container_id: Some("paypal-button".to_string()),
        method_id: Some("paypalcommerce".to_string()),
        paypal_commerce: Some(PaypalCommerceButtonOptions {
            client_id: Some("client-id".to_string()),
            intent,
            is_hosted_checkout: hosted,
            commit: true,
            enable_credit: false,
        }),
    }
}

pub fn shipping_change(state: &str, country_code: &str) -> ShippingChangeData {
    ShippingChangeData {
        shipping_address: ShippingContact {
            city: "Somewhere".to_string(),
            state: state.to_string(),
            country_code: country_code.to_string(),
            postal_code: "00000".to_string(),
        },
        selected_shipping_option: None,
    }
}

pub fn expect_patch(outcome: ShippingChangeOutcome) -> Vec<PatchOperation> {
    match outcome {
        ShippingChangeOutcome::Patch(patch) => patch,
        ShippingChangeOutcome::Reject => panic!("expected a patch, got a reject"),
    }
}

/// Every amount patch must add up to its own breakdown.
pub fn assert_amounts_consistent(patch: &[PatchOperation]) {
    for operation in patch {
        if let Some(amount) = operation.amount() {
            assert!(
                amount.is_consistent(),
                "amount {} does not match breakdown {:?}",
                amount.value,
                amount.breakdown
            );
        }
    }
}
