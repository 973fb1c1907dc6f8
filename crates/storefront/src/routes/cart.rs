//! Cart route handlers.
//!
//! Every mutation answers with the updated cart so the client never has to
//! re-fetch it.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pneushop_core::{CartLine, CurrencyCode, Price, ProductId, round_currency};

use crate::cart::CartStore;
use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub brand: String,
    pub specification: String,
    pub quantity: u32,
    pub stock: u32,
    pub at_stock_limit: bool,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub discount_percentage: Option<Decimal>,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total_items: u32,
    pub total_price: Decimal,
    /// `total_price` formatted for display, e.g. `510.97 DT`.
    pub subtotal: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.clone(),
            name: line.product.name.clone(),
            brand: line.product.brand.clone(),
            specification: line.product.specification_label(),
            quantity: line.quantity,
            stock: line.product.stock,
            at_stock_limit: line.at_stock_limit(),
            unit_price: round_currency(line.product.price),
            line_total: round_currency(line.line_total()),
            discount_percentage: line.product.discount_percentage(),
        }
    }
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        let total_price = round_currency(cart.total_price());
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total_items: cart.total_items(),
            total_price,
            subtotal: Price::new(total_price, CurrencyCode::TND).display(),
        }
    }
}

/// Result of a quantity-changing operation.
#[derive(Debug, Serialize)]
pub struct CartUpdate {
    /// Quantity now held for the product; `None` when no line remains.
    pub quantity: Option<u32>,
    pub cart: CartView,
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update quantity request. Zero or negative removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: String,
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let session = state.session().await;
    Json(CartView::from(session.cart()))
}

/// Add a product, fetching its current snapshot from the backend.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartUpdate>> {
    let product_id = ProductId::new(request.product_id);
    let mut session = state.session().await;
    let quantity = session
        .add_product(&product_id, request.quantity.unwrap_or(1))
        .await?;

    add_breadcrumb("cart", "Added product", Some(&[("product_id", product_id.as_str())]));

    Ok(Json(CartUpdate {
        quantity,
        cart: CartView::from(session.cart()),
    }))
}

/// Set a line's quantity.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateCartRequest>,
) -> Json<CartUpdate> {
    let quantity = u32::try_from(request.quantity.max(0)).unwrap_or(u32::MAX);
    let mut session = state.session().await;
    let quantity = session
        .cart_mut()
        .update_quantity(&ProductId::new(request.product_id), quantity);

    Json(CartUpdate {
        quantity,
        cart: CartView::from(session.cart()),
    })
}

/// Remove a line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<RemoveFromCartRequest>,
) -> Json<CartView> {
    let mut session = state.session().await;
    session
        .cart_mut()
        .remove_from_cart(&ProductId::new(request.product_id));
    Json(CartView::from(session.cart()))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    let mut session = state.session().await;
    session.cart_mut().clear_cart();
    Json(CartView::from(session.cart()))
}
