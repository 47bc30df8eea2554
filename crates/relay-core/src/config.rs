//! Configuration management for the signal relay.

use crate::{Error, Result};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

/// Application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub exchange: ExchangeConfig,
    pub execution: ExecutionConfig,
}

/// Binance USDⓈ-M futures connection settings.
#[derive(Clone)]
pub struct ExchangeConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    /// `recvWindow` sent with every signed request, in milliseconds.
    pub recv_window_ms: u64,
}

impl ExchangeConfig {
    /// Futures testnet REST endpoint.
    pub const TESTNET_BASE_URL: &'static str = "https://testnet.binancefuture.com";

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.secret_key.is_some()
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: Self::TESTNET_BASE_URL.to_string(),
            api_key: None,
            secret_key: None,
            recv_window_ms: 5000,
        }
    }
}

// Keys stay out of logs.
impl std::fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("recv_window_ms", &self.recv_window_ms)
            .finish()
    }
}

/// Order execution settings.
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Fixed quantity for every market buy.
    pub order_quantity: Decimal,
}

impl ExecutionConfig {
    pub const DEFAULT_ORDER_QUANTITY: Decimal = Decimal::from_parts(1, 0, 0, false, 3);
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            order_quantity: Self::DEFAULT_ORDER_QUANTITY,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let order_quantity = match env::var("ORDER_QUANTITY") {
            Ok(raw) => {
                let quantity = Decimal::from_str(raw.trim()).map_err(|e| Error::Config {
                    message: format!("ORDER_QUANTITY is not a decimal ({}): {}", raw, e),
                })?;
                if quantity <= Decimal::ZERO {
                    return Err(Error::Config {
                        message: "ORDER_QUANTITY must be positive".to_string(),
                    });
                }
                quantity
            }
            Err(_) => ExecutionConfig::DEFAULT_ORDER_QUANTITY,
        };

        Ok(Self {
            exchange: ExchangeConfig {
                base_url: env::var("BINANCE_FUTURES_URL")
                    .unwrap_or_else(|_| ExchangeConfig::TESTNET_BASE_URL.to_string()),
                api_key: non_empty_var("BINANCE_TESTNET_API_KEY"),
                secret_key: non_empty_var("BINANCE_TESTNET_SECRET_KEY"),
                recv_window_ms: env::var("BINANCE_RECV_WINDOW_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5000),
            },
            execution: ExecutionConfig { order_quantity },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
