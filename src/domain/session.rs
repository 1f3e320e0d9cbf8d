use super::address::{Address, CountryTable};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Whether an approved payment is captured now or only authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    #[default]
    Capture,
    Authorize,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Capture => "capture",
            Self::Authorize => "authorize",
        }
    }
}

/// Shipping and funding state for one mounted button.
///
/// Handlers derive the next session from the current one and the controller
/// commits it only once the handler succeeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub is_credit_selected: bool,
    pub intent: Intent,
    pub current_shipping_address: Option<Address>,
    pub last_submitted_shipping_address: Option<Address>,
    pub selected_shipping_option_id: Option<String>,
    /// Write-once per session.
    pub country_cache: Option<Arc<CountryTable>>,
}

impl Session {
    pub fn new(intent: Intent) -> Self {
        Self {
            intent,
            ..Self::default()
        }
    }

    /// True when `address` is the one the last selection was submitted against.
    pub fn matches_last_submitted(&self, address: &Address) -> bool {
        self.last_submitted_shipping_address.as_ref() == Some(address)
    }

    /// True when a recorded shipping pick still holds for `address`: nothing
    /// has been submitted yet, or the address is unchanged.
    pub fn selection_holds_for(&self, address: &Address) -> bool {
        self.last_submitted_shipping_address.is_none() || self.matches_last_submitted(address)
    }

    /// Records a funding-source pick from the widget.
    pub fn with_funding_source(mut self, funding_source: &str) -> Self {
        self.is_credit_selected = is_credit_funding(funding_source);
        self
    }
}

fn is_credit_funding(funding_source: &str) -> bool {
    matches!(
        funding_source.to_ascii_lowercase().as_str(),
        "credit" | "paylater"
    )
}
