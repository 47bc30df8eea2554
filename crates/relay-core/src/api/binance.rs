//! Binance USDⓈ-M futures REST client.
//!
//! Only the two signed endpoints the relay needs: leverage changes and market
//! orders. Requests are HMAC-SHA256 signed over the query string and sent with
//! the `X-MBX-APIKEY` header.

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use std::time::Duration as StdDuration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::exchange::{ExchangeClient, LeverageAck, MarketFill};
use crate::config::ExchangeConfig;
use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Signed client for the futures testnet (or any compatible base URL).
pub struct BinanceFuturesClient {
    config: ExchangeConfig,
    http_client: reqwest::Client,
}

impl BinanceFuturesClient {
    const LEVERAGE_PATH: &'static str = "/fapi/v1/leverage";
    const ORDER_PATH: &'static str = "/fapi/v1/order";

    pub fn new(config: ExchangeConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(30))
            .connect_timeout(StdDuration::from_secs(10))
            .build()?;

        if !config.has_credentials() {
            warn!("Binance API credentials are not set; order placement will fail");
        }

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Hex HMAC-SHA256 of `payload` keyed by `secret`.
    pub fn sign(secret: &str, payload: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| Error::Auth {
            message: format!("Invalid HMAC key: {}", e),
        })?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        match (&self.config.api_key, &self.config.secret_key) {
            (Some(key), Some(secret)) => Ok((key.as_str(), secret.as_str())),
            _ => Err(Error::Auth {
                message: "Binance API key and secret are not configured".to_string(),
            }),
        }
    }

    /// Build `k=v&...&recvWindow=..&timestamp=..` for a signed request.
    fn signed_query(&self, params: &[(&str, String)], timestamp_ms: i64) -> String {
        let mut pairs: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        pairs.push(format!("recvWindow={}", self.config.recv_window_ms));
        pairs.push(format!("timestamp={}", timestamp_ms));
        pairs.join("&")
    }

    async fn signed_post<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let (api_key, secret) = self.credentials()?;

        let query = self.signed_query(params, Utc::now().timestamp_millis());
        let signature = Self::sign(secret, &query)?;
        let url = format!(
            "{}{}?{}&signature={}",
            self.config.base_url.trim_end_matches('/'),
            path,
            query,
            signature
        );

        debug!(path = path, "Sending signed request to Binance");

        let response = self
            .http_client
            .post(&url)
            .header("X-MBX-APIKEY", api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                path = path,
                status = %status,
                body = %body,
                "Binance rejected signed request"
            );
            return Err(Error::Api {
                message: format!("{} returned {}", path, status),
                status: Some(status.as_u16()),
                body: Some(body),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ExchangeClient for BinanceFuturesClient {
    async fn set_leverage(&self, symbol: &str, leverage: u32) -> Result<LeverageAck> {
        let params = [
            ("symbol", symbol.to_uppercase()),
            ("leverage", leverage.to_string()),
        ];
        let ack: LeverageAck = self.signed_post(Self::LEVERAGE_PATH, &params).await?;

        info!(
            symbol = %ack.symbol,
            leverage = ack.leverage,
            "Leverage set"
        );
        Ok(ack)
    }

    async fn market_buy(&self, symbol: &str, quantity: Decimal) -> Result<MarketFill> {
        let client_order_id = Uuid::new_v4().simple().to_string();
        let params = [
            ("symbol", symbol.to_uppercase()),
            ("side", "BUY".to_string()),
            ("type", "MARKET".to_string()),
            ("quantity", quantity.normalize().to_string()),
            ("newClientOrderId", client_order_id),
            ("newOrderRespType", "RESULT".to_string()),
        ];
        let fill: MarketFill = self.signed_post(Self::ORDER_PATH, &params).await?;

        info!(
            symbol = %fill.symbol,
            order_id = fill.order_id,
            status = %fill.status,
            avg_price = %fill.avg_price,
            "Market buy submitted"
        );
        Ok(fill)
    }
}
