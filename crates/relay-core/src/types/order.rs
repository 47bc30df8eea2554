//! Order records kept by the relay.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Direction of an executed order. The relay only ever buys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderAction {
    Buy,
}

/// An executed order, as shown in the history endpoint.
///
/// Take-profit and stop-loss prices are informational; nothing monitors them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderRecord {
    pub symbol: String,
    pub action: OrderAction,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price_entry: Decimal,
    /// Two-decimal string.
    pub tp_price: String,
    /// Two-decimal string.
    pub sl_price: String,
    /// Leverage label such as `"10x"`.
    pub leverage: String,
    pub timeframe: Option<String>,
    /// ISO-8601 UTC with millisecond precision.
    pub timestamp: String,
}

/// Leverage was applied but the market buy that should have followed failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PartialExecution {
    pub symbol: String,
    pub leverage: u32,
    #[schema(value_type = String)]
    pub quantity: Decimal,
    pub error: String,
    pub timestamp: String,
}

impl PartialExecution {
    pub fn new(
        symbol: impl Into<String>,
        leverage: u32,
        quantity: Decimal,
        error: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            leverage,
            quantity,
            error: error.into(),
            timestamp: iso_timestamp(at),
        }
    }
}

/// Render a timestamp the way JavaScript's `toISOString` does.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
