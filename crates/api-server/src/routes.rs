//! API route definitions.

use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::handlers::{config, health, orders, webhook};
use crate::state::AppState;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Signal Relay API",
        version = "1.0.0",
        description = "Indicator webhook relay for Binance futures testnet orders"
    ),
    paths(
        health::alive,
        health::health_check,
        config::save_config,
        config::get_config,
        orders::list_orders,
        orders::list_partial_executions,
        webhook::receive_signal,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::handlers::MessageResponse,
            health::HealthResponse,
            relay_core::types::TradingConfig,
            relay_core::types::Signal,
            relay_core::types::OrderRecord,
            relay_core::types::OrderAction,
            relay_core::types::PartialExecution,
        )
    ),
    tags(
        (name = "health", description = "Liveness endpoints"),
        (name = "config", description = "Trading configuration"),
        (name = "orders", description = "Order history"),
        (name = "webhook", description = "Indicator signal intake"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Create the main router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness
        .route("/", get(health::alive))
        .route("/health", get(health::health_check))

        // Configuration
        .route("/config", get(config::get_config).post(config::save_config))

        // Order history
        .route("/orders", get(orders::list_orders))
        .route("/orders/partial", get(orders::list_partial_executions))

        // Signal intake
        .route("/webhook", post(webhook::receive_signal))

        // OpenAPI document
        .route("/api-docs/openapi.json", get(openapi_json))

        .with_state(state)
}
