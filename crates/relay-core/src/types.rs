//! Core domain types for the signal relay.

pub mod lenient;
pub mod order;
pub mod signal;
pub mod trading_config;

pub use order::*;
pub use signal::*;
pub use trading_config::*;
