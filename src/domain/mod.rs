//! Domain model: addresses, carts, shipping options, order patches and the
//! ports the button flow talks to.

pub mod address;
pub mod cart;
pub mod checkout;
pub mod money;
pub mod order;
pub mod patch;
pub mod ports;
pub mod session;
pub mod shipping;
