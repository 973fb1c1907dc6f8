//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! pneushop cart show
//! pneushop cart add 17 --quantity 4
//! pneushop cart update 17 2
//! pneushop cart remove 17
//! pneushop cart clear
//! ```

use pneushop_core::ProductId;
use pneushop_storefront::routes::cart::{CartUpdate, CartView};

use super::{CliError, open_session, print_json};

/// Print the cart with its totals.
pub fn show() -> Result<(), CliError> {
    let session = open_session()?;
    print_json(&CartView::from(session.cart()))
}

/// Fetch a product from the backend and add it.
pub async fn add(product_id: &str, quantity: u32) -> Result<(), CliError> {
    let mut session = open_session()?;
    let quantity = session
        .add_product(&ProductId::new(product_id), quantity)
        .await?;

    if quantity.is_none() {
        tracing::warn!(product_id, "Product is out of stock, nothing added");
    }
    print_json(&CartUpdate {
        quantity,
        cart: CartView::from(session.cart()),
    })
}

/// Set a line's quantity. Zero or negative removes it.
pub fn update(product_id: &str, quantity: i64) -> Result<(), CliError> {
    let mut session = open_session()?;
    let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
    let quantity = session
        .cart_mut()
        .update_quantity(&ProductId::new(product_id), quantity);

    print_json(&CartUpdate {
        quantity,
        cart: CartView::from(session.cart()),
    })
}

pub fn remove(product_id: &str) -> Result<(), CliError> {
    let mut session = open_session()?;
    session
        .cart_mut()
        .remove_from_cart(&ProductId::new(product_id));
    print_json(&CartView::from(session.cart()))
}

pub fn clear() -> Result<(), CliError> {
    let mut session = open_session()?;
    session.cart_mut().clear_cart();
    print_json(&CartView::from(session.cart()))
}
