//! Exchange collaborator seam.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Acknowledgement of a leverage change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeverageAck {
    pub symbol: String,
    pub leverage: u32,
    #[serde(default)]
    pub max_notional_value: String,
}

/// Result of a market order, trimmed to what the relay reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketFill {
    pub order_id: i64,
    pub symbol: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub client_order_id: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub avg_price: Decimal,
    #[serde(default)]
    pub executed_qty: Decimal,
}

impl MarketFill {
    /// Execution price: the average fill price, or the order price when the
    /// exchange did not report an average. `None` if neither is positive.
    pub fn entry_price(&self) -> Option<Decimal> {
        [self.avg_price, self.price]
            .into_iter()
            .find(|p| *p > Decimal::ZERO)
    }
}

/// Futures order placement used by the executor.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Set the leverage multiplier for a symbol.
    async fn set_leverage(&self, symbol: &str, leverage: u32) -> Result<LeverageAck>;

    /// Submit a market buy for a fixed quantity.
    async fn market_buy(&self, symbol: &str, quantity: Decimal) -> Result<MarketFill>;
}
