//! Checkout route handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::checkout::{CheckoutForm, CheckoutSummary};
use crate::error::{Result, add_breadcrumb};
use crate::orders::OrderReceipt;
use crate::state::AppState;

/// Price breakdown for the current cart.
///
/// Answers 400 for an empty cart and 401 without a stored token, the same
/// gate `POST /checkout` applies.
#[instrument(skip(state))]
pub async fn summary(State(state): State<AppState>) -> Result<Json<CheckoutSummary>> {
    let session = state.session().await;
    Ok(Json(session.begin_checkout()?))
}

/// Place the order for the whole cart.
#[instrument(skip_all)]
pub async fn place(
    State(state): State<AppState>,
    Json(form): Json<CheckoutForm>,
) -> Result<(StatusCode, Json<OrderReceipt>)> {
    let mut session = state.session().await;
    let receipt = session.place_order(form).await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", receipt.order_id.as_str())]),
    );

    Ok((StatusCode::CREATED, Json(receipt)))
}
