//! Application layer orchestrating the PayPal Commerce button.
//!
//! `ButtonFlowController` owns the per-button session and handles the widget
//! callbacks; `PaypalCommerceButtonStrategy` exposes it to the mounting host
//! through the `CheckoutButtonStrategy` capability.

pub mod controller;
pub mod strategy;
