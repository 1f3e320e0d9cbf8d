//! Button configuration supplied by the storefront page.

use crate::domain::session::Intent;
use crate::error::{CheckoutError, InvalidArgumentKind, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaypalCommerceButtonOptions {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub intent: Intent,
    /// Finalize the order in the storefront instead of posting back to the
    /// server-side checkout.
    #[serde(default)]
    pub is_hosted_checkout: bool,
    #[serde(default)]
    pub commit: bool,
    #[serde(default)]
    pub enable_credit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonInitializeOptions {
    #[serde(default)]
    pub container_id: Option<String>,
    #[serde(default)]
    pub method_id: Option<String>,
    #[serde(default)]
    pub paypal_commerce: Option<PaypalCommerceButtonOptions>,
}

/// Initialize options after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonConfig {
    pub container_id: String,
    pub method_id: String,
    pub client_id: String,
    pub intent: Intent,
    pub is_hosted_checkout: bool,
    pub commit: bool,
    pub enable_credit: bool,
}

fn required(value: Option<String>, kind: InvalidArgumentKind) -> Result<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or(CheckoutError::InvalidArgument(kind))
}

impl TryFrom<ButtonInitializeOptions> for ButtonConfig {
    type Error = CheckoutError;

    fn try_from(options: ButtonInitializeOptions) -> Result<Self> {
        let method_id = required(options.method_id, InvalidArgumentKind::MissingMethodId)?;
        let container_id =
            required(options.container_id, InvalidArgumentKind::MissingContainerId)?;
        let paypal = options.paypal_commerce.ok_or(CheckoutError::InvalidArgument(
            InvalidArgumentKind::MissingPaypalCommerceOptions,
        ))?;
        let client_id = required(paypal.client_id, InvalidArgumentKind::MissingClientId)?;

        Ok(Self {
            container_id,
            method_id,
            client_id,
            intent: paypal.intent,
            is_hosted_checkout: paypal.is_hosted_checkout,
            commit: paypal.commit,
            enable_credit: paypal.enable_credit,
        })
    }
}

/// Query parameters for the PayPal SDK script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkParams {
    #[serde(rename = "client-id")]
    pub client_id: String,
    pub currency: String,
    pub intent: Intent,
    pub commit: bool,
    pub components: String,
    #[serde(rename = "enable-funding", skip_serializing_if = "Option::is_none")]
    pub enable_funding: Option<String>,
}

impl SdkParams {
    pub fn new(config: &ButtonConfig, currency_code: &str) -> Self {
        Self {
            client_id: config.client_id.clone(),
            currency: currency_code.to_string(),
            intent: config.intent,
            commit: config.commit,
            components: "buttons".to_string(),
            enable_funding: config.enable_credit.then(|| "credit,paylater".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ButtonInitializeOptions {
        ButtonInitializeOptions {
            container_id: Some("checkout-button".to_string()),
            method_id: Some("paypalcommerce".to_string()),
            paypal_commerce: Some(PaypalCommerceButtonOptions {
                client_id: Some("client-123".to_string()),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_valid_options() {
        let config = ButtonConfig::try_from(options()).unwrap();
        assert_eq!(config.client_id, "client-123");
        assert_eq!(config.intent, Intent::Capture);
        assert!(!config.is_hosted_checkout);
    }

    #[test]
    fn test_missing_client_id() {
        let mut opts = options();
        opts.paypal_commerce.as_mut().unwrap().client_id = Some("  ".to_string());
        assert!(matches!(
            ButtonConfig::try_from(opts),
            Err(CheckoutError::InvalidArgument(
                InvalidArgumentKind::MissingClientId
            ))
        ));
    }

    #[test]
    fn test_missing_paypal_options() {
        let mut opts = options();
        opts.paypal_commerce = None;
        assert!(matches!(
            ButtonConfig::try_from(opts),
            Err(CheckoutError::InvalidArgument(
                InvalidArgumentKind::MissingPaypalCommerceOptions
            ))
        ));
    }

    #[test]
    fn test_missing_container_and_method() {
        let mut opts = options();
        opts.container_id = None;
        assert!(matches!(
            ButtonConfig::try_from(opts),
            Err(CheckoutError::InvalidArgument(
                InvalidArgumentKind::MissingContainerId
            ))
        ));

        let mut opts = options();
        opts.method_id = None;
        assert!(matches!(
            ButtonConfig::try_from(opts),
            Err(CheckoutError::InvalidArgument(
                InvalidArgumentKind::MissingMethodId
            ))
        ));
    }

    #[test]
    fn test_options_from_json() {
        let json = r#"{
            "containerId": "btn",
            "methodId": "paypalcommerce",
            "paypalCommerce": { "clientId": "abc", "intent": "authorize", "isHostedCheckout": true }
        }"#;
        let opts: ButtonInitializeOptions = serde_json::from_str(json).unwrap();
        let config = ButtonConfig::try_from(opts).unwrap();
        assert_eq!(config.intent, Intent::Authorize);
        assert!(config.is_hosted_checkout);
    }

    #[test]
    fn test_sdk_params() {
        let mut config = ButtonConfig::try_from(options()).unwrap();
        config.enable_credit = true;
        let params = SdkParams::new(&config, "USD");
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["client-id"], "client-123");
        assert_eq!(json["enable-funding"], "credit,paylater");
        assert_eq!(json["intent"], "capture");
    }
}
