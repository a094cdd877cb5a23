//! Command backend: launch settings and the runner port.

pub mod client;
pub mod types;
