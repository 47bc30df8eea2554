//! Indicator webhook.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relay_core::types::Signal;
use serde_json::{Map, Value};
use std::sync::Arc;
use trading_engine::{ExecutionError, SignalOutcome};

use super::MessageResponse;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const CRITERIA_NOT_MET_MESSAGE: &str = "Signal received, criteria not met.";
pub const ORDER_EXECUTED_MESSAGE: &str = "Order executed successfully!";

/// Evaluate a signal and place a market buy when it clears the thresholds.
///
/// A body sent without a JSON content type reads as `{}`; a body that is not
/// a JSON object carries no readings.
#[utoipa::path(
    post,
    path = "/webhook",
    tag = "webhook",
    request_body = Signal,
    responses(
        (status = 200, description = "Order executed (JSON message), or criteria not met (plain text)", body = MessageResponse),
        (status = 400, description = "No configuration stored", body = String, content_type = "text/plain"),
        (status = 500, description = "Exchange call failed", body = String, content_type = "text/plain")
    )
)]
pub async fn receive_signal(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Response> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => Value::Object(Map::new()),
        Err(rejection) => return Err(rejection.into()),
    };
    let signal = Signal::from_value(&body);

    match state.executor.handle_signal(&signal).await {
        Ok(SignalOutcome::Rejected) => Ok(CRITERIA_NOT_MET_MESSAGE.into_response()),
        Ok(SignalOutcome::Executed(_)) => {
            Ok(Json(MessageResponse::new(ORDER_EXECUTED_MESSAGE)).into_response())
        }
        Err(ExecutionError::NotConfigured) => {
            tracing::warn!("Webhook received before any configuration was stored");
            Err(ApiError::NotConfigured)
        }
        Err(e) => Err(ApiError::Execution(e.exchange_message())),
    }
}
