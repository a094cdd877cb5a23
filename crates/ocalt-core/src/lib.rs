//! Core domain + application logic for the OCALT Telegram relay.
//!
//! This crate is framework-agnostic. Telegram and the command-line assistant
//! live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod model;
pub mod relay;
pub mod reply;
pub mod security;
pub mod utils;

pub use errors::{Error, Result};
