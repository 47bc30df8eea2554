//! Relay state: the live configuration and the order history.

use async_trait::async_trait;
use relay_core::types::{OrderRecord, PartialExecution};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Storage backend for relay state.
///
/// Every method is a single atomic step; callers that need a consistent view
/// across steps take a snapshot (e.g. clone the configuration once).
#[async_trait]
pub trait RelayStore: Send + Sync {
    /// The live configuration exactly as posted. `None` when unset or set to `null`.
    async fn config(&self) -> Option<Value>;

    /// Replace the configuration wholesale.
    async fn set_config(&self, config: Value);

    /// Append an executed order.
    async fn append_order(&self, order: OrderRecord);

    /// Order history, most recent first.
    async fn orders_newest_first(&self) -> Vec<OrderRecord>;

    /// Record a leverage change whose market buy never completed.
    async fn append_partial(&self, partial: PartialExecution);

    /// Partial executions, most recent first.
    async fn partials_newest_first(&self) -> Vec<PartialExecution>;
}

/// In-memory relay state. Lost on restart.
#[derive(Clone, Default)]
pub struct MemoryRelayStore {
    config: Arc<RwLock<Option<Value>>>,
    orders: Arc<RwLock<Vec<OrderRecord>>>,
    partials: Arc<RwLock<Vec<PartialExecution>>>,
}

impl MemoryRelayStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RelayStore for MemoryRelayStore {
    async fn config(&self) -> Option<Value> {
        self.config
            .read()
            .await
            .as_ref()
            .filter(|value| !value.is_null())
            .cloned()
    }

    async fn set_config(&self, config: Value) {
        *self.config.write().await = Some(config);
    }

    async fn append_order(&self, order: OrderRecord) {
        self.orders.write().await.push(order);
    }

    async fn orders_newest_first(&self) -> Vec<OrderRecord> {
        self.orders.read().await.iter().rev().cloned().collect()
    }

    async fn append_partial(&self, partial: PartialExecution) {
        self.partials.write().await.push(partial);
    }

    async fn partials_newest_first(&self) -> Vec<PartialExecution> {
        self.partials.read().await.iter().rev().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use relay_core::types::OrderAction;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn order(symbol: &str) -> OrderRecord {
        OrderRecord {
            symbol: symbol.to_string(),
            action: OrderAction::Buy,
            price_entry: Decimal::ONE_HUNDRED,
            tp_price: "105.00".to_string(),
            sl_price: "98.00".to_string(),
            leverage: "5x".to_string(),
            timeframe: None,
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_config_replaced_wholesale() {
        let store = MemoryRelayStore::new();
        assert_eq!(store.config().await, None);

        store.set_config(json!({"symbol": "BTCUSDT", "leverage": 5})).await;
        store.set_config(json!({"symbol": "ETHUSDT"})).await;

        assert_eq!(store.config().await, Some(json!({"symbol": "ETHUSDT"})));
    }

    #[tokio::test]
    async fn test_null_config_counts_as_unset() {
        let store = MemoryRelayStore::new();
        store.set_config(json!({"symbol": "BTCUSDT"})).await;
        store.set_config(Value::Null).await;
        assert_eq!(store.config().await, None);
    }

    #[tokio::test]
    async fn test_orders_newest_first() {
        let store = MemoryRelayStore::new();
        for symbol in ["A", "B", "C"] {
            store.append_order(order(symbol)).await;
        }

        let symbols: Vec<String> = store
            .orders_newest_first()
            .await
            .into_iter()
            .map(|o| o.symbol)
            .collect();
        assert_eq!(symbols, vec!["C", "B", "A"]);
    }

    #[tokio::test]
    async fn test_partials_kept_apart_from_orders() {
        let store = MemoryRelayStore::new();
        store
            .append_partial(PartialExecution::new("BTCUSDT", 5, Decimal::new(1, 3), "boom", Utc::now()))
            .await;

        assert!(store.orders_newest_first().await.is_empty());
        assert_eq!(store.partials_newest_first().await.len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryRelayStore::new();
        let handle = store.clone();
        handle.append_order(order("A")).await;
        assert_eq!(store.orders_newest_first().await.len(), 1);
    }
}
