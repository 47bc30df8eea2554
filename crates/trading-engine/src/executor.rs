//! Signal execution: evaluate, place the order, record the result.

use chrono::Utc;
use relay_core::api::ExchangeClient;
use relay_core::config::ExecutionConfig;
use relay_core::types::{OrderRecord, PartialExecution, Signal, TradingConfig};
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::evaluator::evaluate;
use crate::order_builder::{bracket_percentages, build_order};
use crate::store::RelayStore;

/// Message used when the exchange gave nothing readable back.
pub const FALLBACK_EXCHANGE_MESSAGE: &str = "Failed to connect to Binance.";

/// Why a signal could not be turned into an order.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("configuration has not been set")]
    NotConfigured,

    #[error("order error: {0}")]
    Order(String),

    #[error("exchange error: {0}")]
    Exchange(#[from] relay_core::Error),
}

impl ExecutionError {
    /// Best-effort human message for the caller.
    ///
    /// Binance error bodies look like `{"code":-2019,"msg":"Margin is insufficient."}`;
    /// the `msg` is surfaced when present.
    pub fn exchange_message(&self) -> String {
        match self {
            ExecutionError::NotConfigured => self.to_string(),
            ExecutionError::Order(message) => message.clone(),
            ExecutionError::Exchange(relay_core::Error::Auth { message }) => message.clone(),
            ExecutionError::Exchange(e) => e
                .body()
                .and_then(|body| serde_json::from_str::<serde_json::Value>(body).ok())
                .and_then(|v| v.get("msg").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_else(|| FALLBACK_EXCHANGE_MESSAGE.to_string()),
        }
    }
}

/// What happened to an accepted webhook call.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalOutcome {
    /// Thresholds not met; nothing was sent to the exchange.
    Rejected,
    /// Order placed and recorded.
    Executed(OrderRecord),
}

/// Turns signals into market buys.
pub struct SignalExecutor {
    exchange: Arc<dyn ExchangeClient>,
    store: Arc<dyn RelayStore>,
    config: ExecutionConfig,
}

impl SignalExecutor {
    pub fn new(
        exchange: Arc<dyn ExchangeClient>,
        store: Arc<dyn RelayStore>,
        config: ExecutionConfig,
    ) -> Self {
        Self {
            exchange,
            store,
            config,
        }
    }

    /// Handle one webhook signal end to end.
    ///
    /// The configuration is read once, so a concurrent update cannot change
    /// thresholds between evaluation and order construction.
    pub async fn handle_signal(&self, signal: &Signal) -> Result<SignalOutcome, ExecutionError> {
        let raw = self
            .store
            .config()
            .await
            .ok_or(ExecutionError::NotConfigured)?;
        let config = TradingConfig::from_value(&raw);

        if !evaluate(&config, signal) {
            debug!(?signal, "Signal does not meet buy criteria");
            return Ok(SignalOutcome::Rejected);
        }

        info!(
            symbol = config.symbol.as_deref().unwrap_or_default(),
            plus_di = ?signal.plus_di,
            minus_di = ?signal.minus_di,
            adx = ?signal.adx,
            "Buy signal accepted, placing order"
        );

        bracket_percentages(&config)?;

        let entry_price = self.place_order(&config).await?;
        let record = match build_order(&config, entry_price, Utc::now()) {
            Ok(record) => record,
            Err(failure) => {
                // The fill is real; keep a trace of it even without a record.
                let symbol = config.symbol.as_deref().map(str::trim).unwrap_or_default();
                self.record_partial(
                    symbol,
                    config.leverage.unwrap_or_default(),
                    self.config.order_quantity,
                    &failure,
                )
                .await;
                return Err(failure);
            }
        };
        self.store.append_order(record.clone()).await;

        info!(
            symbol = %record.symbol,
            entry = %record.price_entry,
            tp = %record.tp_price,
            sl = %record.sl_price,
            "Order recorded"
        );

        Ok(SignalOutcome::Executed(record))
    }

    /// Set leverage, then market buy the fixed quantity. Returns the entry price.
    ///
    /// The two calls are not atomic. If the buy fails after leverage was
    /// applied, a [`PartialExecution`] is stored; leverage is left as set.
    pub async fn place_order(&self, config: &TradingConfig) -> Result<Decimal, ExecutionError> {
        let symbol = config
            .symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ExecutionError::Order("no symbol configured".to_string()))?;
        let leverage = config
            .leverage
            .ok_or_else(|| ExecutionError::Order("no leverage configured".to_string()))?;
        let quantity = self.config.order_quantity;

        if let Err(e) = self.exchange.set_leverage(symbol, leverage).await {
            error!(symbol = symbol, leverage = leverage, error = %e, "Failed to set leverage");
            return Err(e.into());
        }

        let fill = match self.exchange.market_buy(symbol, quantity).await {
            Ok(fill) => fill,
            Err(e) => {
                let failure = ExecutionError::from(e);
                self.record_partial(symbol, leverage, quantity, &failure).await;
                return Err(failure);
            }
        };

        match fill.entry_price() {
            Some(price) => Ok(price),
            None => {
                let failure = ExecutionError::Order(format!(
                    "order {} reported no execution price",
                    fill.order_id
                ));
                self.record_partial(symbol, leverage, quantity, &failure).await;
                Err(failure)
            }
        }
    }

    async fn record_partial(
        &self,
        symbol: &str,
        leverage: u32,
        quantity: Decimal,
        failure: &ExecutionError,
    ) {
        let message = failure.exchange_message();
        warn!(
            symbol = symbol,
            leverage = leverage,
            quantity = %quantity,
            error = %message,
            "Leverage applied but no order was recorded"
        );
        self.store
            .append_partial(PartialExecution::new(
                symbol,
                leverage,
                quantity,
                message,
                Utc::now(),
            ))
            .await;
    }
}
