//! Order history route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use pneushop_core::{Order, OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Status update request.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// All locally known orders, oldest first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<Order>> {
    let session = state.session().await;
    Json(session.orders().all_orders().to_vec())
}

/// The order placed most recently by this process.
#[instrument(skip(state))]
pub async fn current(State(state): State<AppState>) -> Result<Json<Order>> {
    let session = state.session().await;
    session
        .orders()
        .current_order()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("no order placed yet".to_string()))
}

/// Order detail.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Order>> {
    let session = state.session().await;
    let order_id = OrderId::new(id);
    session
        .orders()
        .get_order(&order_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))
}

/// Update an order's status locally.
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let mut session = state.session().await;
    let order_id = OrderId::new(id);

    if !session
        .orders_mut()
        .update_order_status(&order_id, request.status)
    {
        return Err(AppError::NotFound(format!("order {order_id}")));
    }

    session
        .orders()
        .get_order(&order_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::Internal(format!("order {order_id} vanished after update")))
}

/// Account order history: backend orders plus local-only ones.
#[instrument(skip(state))]
pub async fn account(State(state): State<AppState>) -> Json<Vec<Order>> {
    let session = state.session().await;
    Json(session.account_orders().await)
}
