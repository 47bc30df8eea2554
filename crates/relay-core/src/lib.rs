//! Relay Core Library
//!
//! Shared types, configuration, and the exchange client for the signal relay.

pub mod api;
pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};
