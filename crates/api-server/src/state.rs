//! Application state shared across handlers.

use std::sync::Arc;

use relay_core::api::{BinanceFuturesClient, ExchangeClient};
use relay_core::config::{Config, ExecutionConfig};
use trading_engine::{MemoryRelayStore, RelayStore, SignalExecutor};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Live configuration and order history.
    pub store: Arc<dyn RelayStore>,
    /// Signal evaluation and order placement.
    pub executor: Arc<SignalExecutor>,
}

impl AppState {
    /// Build state wired to the Binance futures client and in-memory storage.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let exchange = BinanceFuturesClient::new(config.exchange.clone())?;
        tracing::info!(
            base_url = exchange.base_url(),
            order_quantity = %config.execution.order_quantity,
            "Exchange client initialized"
        );

        Ok(Self::with_parts(
            Arc::new(MemoryRelayStore::new()),
            Arc::new(exchange),
            config.execution.clone(),
        ))
    }

    /// Build state from explicit collaborators.
    pub fn with_parts(
        store: Arc<dyn RelayStore>,
        exchange: Arc<dyn ExchangeClient>,
        execution: ExecutionConfig,
    ) -> Self {
        let executor = Arc::new(SignalExecutor::new(exchange, store.clone(), execution));
        Self { store, executor }
    }
}
