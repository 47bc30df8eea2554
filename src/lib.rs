//! Signal Relay: indicator webhook to Binance futures testnet
//!
//! Root crate giving benchmarks and integration tests one import path.
//! For actual functionality, use the individual crates directly:
//!
//! - `relay-core`: Shared types, configuration, exchange client
//! - `trading-engine`: Signal evaluation, order construction, in-memory store
//! - `api-server`: REST API server

pub use api_server as api;
pub use relay_core as core;
pub use trading_engine as trading;
