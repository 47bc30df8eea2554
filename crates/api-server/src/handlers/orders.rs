//! Order history handlers.

use axum::extract::State;
use axum::Json;
use relay_core::types::{OrderRecord, PartialExecution};
use std::sync::Arc;

use crate::state::AppState;

/// Executed orders, most recent first.
#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    responses(
        (status = 200, description = "Order history", body = [OrderRecord])
    )
)]
pub async fn list_orders(State(state): State<Arc<AppState>>) -> Json<Vec<OrderRecord>> {
    Json(state.store.orders_newest_first().await)
}

/// Leverage changes whose market buy failed, most recent first.
#[utoipa::path(
    get,
    path = "/orders/partial",
    tag = "orders",
    responses(
        (status = 200, description = "Partial executions", body = [PartialExecution])
    )
)]
pub async fn list_partial_executions(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<PartialExecution>> {
    Json(state.store.partials_newest_first().await)
}
