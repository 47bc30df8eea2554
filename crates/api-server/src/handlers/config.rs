//! Trading configuration handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use std::sync::Arc;

use super::MessageResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub const CONFIG_SAVED_MESSAGE: &str = "Configuration saved";

/// Store a configuration, replacing the previous one. The body is kept verbatim.
#[utoipa::path(
    post,
    path = "/config",
    tag = "config",
    request_body = relay_core::types::TradingConfig,
    responses(
        (status = 200, description = "Configuration stored", body = MessageResponse),
        (status = 400, description = "Body is not valid JSON", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_config(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(config) = payload?;

    let symbol = config
        .get("symbol")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    tracing::info!(symbol = symbol, "Trading configuration replaced");
    state.store.set_config(config).await;

    Ok(Json(MessageResponse::new(CONFIG_SAVED_MESSAGE)))
}

/// Return the stored configuration, or `null` when none was posted.
#[utoipa::path(
    get,
    path = "/config",
    tag = "config",
    responses(
        (status = 200, description = "Stored configuration or null", body = relay_core::types::TradingConfig)
    )
)]
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(state.store.config().await.unwrap_or(Value::Null))
}
