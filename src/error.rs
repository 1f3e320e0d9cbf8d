use thiserror::Error;

/// Caller-supplied configuration that is missing or malformed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidArgumentKind {
    #[error("`containerId` is required to render the button")]
    MissingContainerId,
    #[error("`methodId` is required to initialize the button")]
    MissingMethodId,
    #[error("`paypalCommerce` options are required")]
    MissingPaypalCommerceOptions,
    #[error("PayPal `clientId` is required")]
    MissingClientId,
}

/// Runtime data the flow expected to find but did not.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingDataKind {
    #[error("order id")]
    OrderId,
    #[error("consignment")]
    Consignment,
}

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(InvalidArgumentKind),
    #[error("Missing data: {0}")]
    MissingData(MissingDataKind),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Request failed: {0}")]
    Request(#[source] Box<CheckoutError>),
    #[error("Gateway error: {0}")]
    Gateway(String),
    #[error("Button flow is not initialized")]
    NotInitialized,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CheckoutError {
    /// Wraps a failure raised while finalizing an approved order.
    pub fn request(source: CheckoutError) -> Self {
        match source {
            already @ Self::Request(_) => already,
            other => Self::Request(Box::new(other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
