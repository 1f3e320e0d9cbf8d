//! Edges the crate is driven from.

pub mod json;
