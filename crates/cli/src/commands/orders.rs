//! Order history commands.
//!
//! # Usage
//!
//! ```bash
//! pneushop orders list
//! pneushop orders show ORD-1760000000000-k3j9x0a1b
//! pneushop orders status 1042 shipped
//! pneushop orders account
//! ```

use pneushop_core::{OrderId, OrderStatus};

use super::{CliError, open_session, print_json};

/// Print every locally known order.
pub fn list() -> Result<(), CliError> {
    let session = open_session()?;
    print_json(&session.orders().all_orders())
}

pub fn show(order_id: &str) -> Result<(), CliError> {
    let session = open_session()?;
    let order = session
        .orders()
        .get_order(&OrderId::new(order_id))
        .ok_or_else(|| CliError::OrderNotFound(order_id.to_string()))?;
    print_json(order)
}

/// Update an order's status locally. Nothing is sent to the backend.
pub fn set_status(order_id: &str, status: OrderStatus) -> Result<(), CliError> {
    let mut session = open_session()?;
    let id = OrderId::new(order_id);

    if !session.orders_mut().update_order_status(&id, status) {
        return Err(CliError::OrderNotFound(order_id.to_string()));
    }
    let order = session
        .orders()
        .get_order(&id)
        .ok_or_else(|| CliError::OrderNotFound(order_id.to_string()))?;
    print_json(order)
}

/// Print backend orders merged with local-only ones.
pub async fn account() -> Result<(), CliError> {
    let session = open_session()?;
    print_json(&session.account_orders().await)
}
