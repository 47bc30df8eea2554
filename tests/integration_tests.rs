//! Integration tests for component interactions.
//!
//! These drive the full router against an in-process exchange double.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

use api_server::{create_router, AppState};
use relay_core::api::{ExchangeClient, LeverageAck, MarketFill};
use relay_core::config::ExecutionConfig;
use relay_core::types::{Signal, TradingConfig};
use trading_engine::{build_order, evaluate, MemoryRelayStore};

/// Exchange double that counts calls and fills at a rising price.
#[derive(Default)]
struct FakeExchange {
    leverage_calls: AtomicUsize,
    buy_calls: AtomicUsize,
    reject_buys: bool,
}

impl FakeExchange {
    fn rejecting() -> Self {
        Self {
            reject_buys: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ExchangeClient for FakeExchange {
    async fn set_leverage(&self, symbol: &str, leverage: u32) -> relay_core::Result<LeverageAck> {
        self.leverage_calls.fetch_add(1, Ordering::SeqCst);
        Ok(LeverageAck {
            symbol: symbol.to_string(),
            leverage,
            max_notional_value: "1000000".to_string(),
        })
    }

    async fn market_buy(&self, symbol: &str, quantity: Decimal) -> relay_core::Result<MarketFill> {
        let n = self.buy_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_buys {
            return Err(relay_core::Error::Api {
                message: "/fapi/v1/order returned 400 Bad Request".to_string(),
                status: Some(400),
                body: Some(r#"{"code":-2019,"msg":"Margin is insufficient."}"#.to_string()),
            });
        }
        Ok(MarketFill {
            order_id: n as i64 + 1,
            symbol: symbol.to_string(),
            status: "FILLED".to_string(),
            client_order_id: format!("fake-{n}"),
            price: Decimal::ZERO,
            avg_price: Decimal::from(100 + n as i64),
            executed_qty: quantity,
        })
    }
}

fn relay(exchange: Arc<FakeExchange>) -> Router {
    let state = AppState::with_parts(
        Arc::new(MemoryRelayStore::new()),
        exchange,
        ExecutionConfig::default(),
    );
    create_router(Arc::new(state))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn btc_config() -> Value {
    json!({
        "symbol": "BTCUSDT",
        "leverage": 10,
        "takeProfit": 5,
        "stopLoss": 2,
        "timeframe": "1h",
        "diPlusThreshold": 25,
        "diMinusThreshold": 20,
        "adxMinimum": 20
    })
}

fn buy_signal() -> Value {
    json!({"plusDI": 30, "minusDI": 10, "adx": 25})
}

#[tokio::test]
async fn test_orders_are_listed_newest_first() {
    let exchange = Arc::new(FakeExchange::default());
    let app = relay(exchange.clone());
    send(&app, post_json("/config", btc_config())).await;

    for _ in 0..3 {
        let (status, _) = send(&app, post_json("/webhook", buy_signal())).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(&app, get("/orders")).await;
    let orders: Value = serde_json::from_str(&body).unwrap();
    let prices: Vec<f64> = orders
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["price_entry"].as_f64().unwrap())
        .collect();

    assert_eq!(prices, vec![102.0, 101.0, 100.0]);
    assert_eq!(exchange.leverage_calls.load(Ordering::SeqCst), 3);
    assert_eq!(exchange.buy_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_no_exchange_call_without_config() {
    let exchange = Arc::new(FakeExchange::default());
    let app = relay(exchange.clone());

    let (status, body) = send(&app, post_json("/webhook", buy_signal())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Error: configuration has not been set.");
    assert_eq!(exchange.leverage_calls.load(Ordering::SeqCst), 0);
    assert_eq!(exchange.buy_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_null_config_counts_as_unset() {
    let exchange = Arc::new(FakeExchange::default());
    let app = relay(exchange.clone());
    send(&app, post_json("/config", Value::Null)).await;

    let (status, _) = send(&app, post_json("/webhook", buy_signal())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rejected_signal_leaves_history_untouched() {
    let exchange = Arc::new(FakeExchange::default());
    let app = relay(exchange.clone());
    send(&app, post_json("/config", btc_config())).await;

    // Equal to the threshold is not above it
    let (status, body) = send(
        &app,
        post_json("/webhook", json!({"plusDI": 25, "minusDI": 10, "adx": 25})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Signal received, criteria not met.");
    assert_eq!(exchange.leverage_calls.load(Ordering::SeqCst), 0);
    assert_eq!(send(&app, get("/orders")).await.1, "[]");
}

#[tokio::test]
async fn test_failed_buy_is_recorded_as_partial() {
    let exchange = Arc::new(FakeExchange::rejecting());
    let app = relay(exchange.clone());
    send(&app, post_json("/config", btc_config())).await;

    let (status, body) = send(&app, post_json("/webhook", buy_signal())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Failed to execute order: Margin is insufficient.");

    assert_eq!(send(&app, get("/orders")).await.1, "[]");

    let (status, body) = send(&app, get("/orders/partial")).await;
    assert_eq!(status, StatusCode::OK);
    let partials: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(partials.as_array().unwrap().len(), 1);
    assert_eq!(partials[0]["symbol"], "BTCUSDT");
    assert_eq!(partials[0]["leverage"], 10);
    assert_eq!(partials[0]["error"], "Margin is insufficient.");
}

#[tokio::test]
async fn test_config_replacement_applies_to_next_signal() {
    let exchange = Arc::new(FakeExchange::default());
    let app = relay(exchange.clone());
    send(&app, post_json("/config", btc_config())).await;

    let mut stricter = btc_config();
    stricter["adxMinimum"] = json!(50);
    send(&app, post_json("/config", stricter)).await;

    let (_, body) = send(&app, post_json("/webhook", buy_signal())).await;
    assert_eq!(body, "Signal received, criteria not met.");
    assert_eq!(exchange.buy_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_evaluate_requires_all_three_thresholds() {
    let config = TradingConfig::from_value(&btc_config());

    assert!(evaluate(&config, &Signal::new(30.0, 10.0, 25.0)));
    assert!(!evaluate(&config, &Signal::new(30.0, 20.0, 25.0)));
    assert!(!evaluate(&config, &Signal::new(30.0, 10.0, 20.0)));
    assert!(!evaluate(&TradingConfig::default(), &Signal::new(30.0, 10.0, 25.0)));
}

#[test]
fn test_build_order_brackets_entry_price() {
    let config = TradingConfig::from_value(&btc_config());
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    let order = build_order(&config, Decimal::from_str("64250.5").unwrap(), at).unwrap();

    assert_eq!(order.tp_price, "67463.03");
    assert_eq!(order.sl_price, "62965.49");
    assert_eq!(order.leverage, "10x");
    assert_eq!(order.timeframe.as_deref(), Some("1h"));
    assert_eq!(order.timestamp, "2024-03-01T12:00:00.000Z");
}

#[tokio::test]
async fn test_non_object_config_never_reaches_exchange() {
    let exchange = Arc::new(FakeExchange::default());
    let app = relay(exchange.clone());

    for config in [
        json!(["BTCUSDT", 10, 5, 2, "1h", 25, 20, 20]),
        json!("BTCUSDT"),
        json!(42),
    ] {
        send(&app, post_json("/config", config)).await;
        let (status, body) = send(&app, post_json("/webhook", buy_signal())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Signal received, criteria not met.");
    }

    assert_eq!(exchange.leverage_calls.load(Ordering::SeqCst), 0);
    assert_eq!(exchange.buy_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_build_order_never_panics_on_numeric_percentages() {
    let entry = Decimal::from_str("64250.5").unwrap();
    for pct in [0.0, -100.0, 1e10, 1e27, -1e27, 7.9e28, 1e300, f64::MIN, f64::NAN] {
        let config = TradingConfig {
            take_profit: Some(pct),
            stop_loss: Some(pct),
            ..TradingConfig::from_value(&btc_config())
        };
        let _ = build_order(&config, entry, Utc::now());
    }
}
