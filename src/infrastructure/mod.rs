//! In-memory collaborators for the button flow.

pub mod in_memory;
