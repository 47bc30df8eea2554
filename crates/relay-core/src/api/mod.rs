//! API clients for external services.

pub mod binance;
pub mod exchange;

pub use binance::BinanceFuturesClient;
pub use exchange::{ExchangeClient, LeverageAck, MarketFill};

#[cfg(any(test, feature = "mocks"))]
pub use exchange::MockExchangeClient;
