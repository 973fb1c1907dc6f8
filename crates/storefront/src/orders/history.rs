//! Local order history.
//!
//! Mirrors every order created through the pipeline, remote or local, and
//! persists the whole list under [`keys::ORDERS`] after each mutation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use pneushop_core::{Order, OrderId, OrderStatus};

use crate::storage::{Storage, keys};

/// Orders known to this session, in creation order.
#[derive(Debug)]
pub struct OrderHistory {
    orders: Vec<Order>,
    current: Option<OrderId>,
    storage: Arc<dyn Storage>,
}

impl OrderHistory {
    /// Restore the history from storage. Unreadable records yield an empty
    /// history.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let orders = match storage.read(keys::ORDERS) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<Order>>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding unreadable order history");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read order history");
                Vec::new()
            }
        };

        debug!(orders = orders.len(), "Order history restored");
        Self {
            orders,
            current: None,
            storage,
        }
    }

    #[must_use]
    pub fn get_order(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == order_id)
    }

    #[must_use]
    pub fn all_orders(&self) -> &[Order] {
        &self.orders
    }

    /// The order most recently created in this session.
    #[must_use]
    pub fn current_order(&self) -> Option<&Order> {
        self.current.as_ref().and_then(|id| self.get_order(id))
    }

    /// Set an order's status locally and bump `updated_at`.
    ///
    /// Statuses are applied as supplied; a move the lifecycle does not allow
    /// is only logged. Returns `false` when no order has this id.
    pub fn update_order_status(&mut self, order_id: &OrderId, status: OrderStatus) -> bool {
        let Some(order) = self.orders.iter_mut().find(|order| &order.id == order_id) else {
            return false;
        };

        if !order.status.can_transition_to(status) {
            warn!(
                order_id = %order_id,
                from = %order.status,
                to = %status,
                "Order status change outside the lifecycle"
            );
        }

        order.status = status;
        order.updated_at = Utc::now().max(order.updated_at);
        self.persist();
        true
    }

    /// Append a newly created order and make it current.
    pub(crate) fn record(&mut self, order: Order) {
        self.current = Some(order.id.clone());
        self.orders.push(order);
        self.persist();
    }

    fn persist(&self) {
        match serde_json::to_string(&self.orders) {
            Ok(raw) => {
                if let Err(e) = self.storage.write(keys::ORDERS, &raw) {
                    warn!(error = %e, "Failed to persist order history");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize order history"),
        }
    }
}
