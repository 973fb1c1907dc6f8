//! Unified view over backend and locally synthesized orders.
//!
//! Remote orders arrive in the backend's snake_case shape, local orders in
//! the storefront's own. [`OrderRecord::into_order`] is the one place where
//! the two are reconciled.

use tracing::warn;

use pneushop_core::{
    Order, OrderId, OrderLine, OrderSource, OrderStatus, PaymentMethod, PaymentType, ProductId,
    ShippingAddress, WarrantyInfo, round_currency,
};

use crate::backend::types::{RemoteOrder, RemoteOrderItem, id_to_string};

/// An order as read from either side of the pipeline.
#[derive(Debug, Clone)]
pub enum OrderRecord {
    /// Returned by `GET orders/`.
    Remote(RemoteOrder),
    /// Held in the local order history.
    Local(Order),
}

impl OrderRecord {
    #[must_use]
    pub fn id(&self) -> OrderId {
        match self {
            Self::Remote(remote) => OrderId::from_remote(remote.id),
            Self::Local(order) => order.id.clone(),
        }
    }

    /// Normalize into the storefront's order shape.
    #[must_use]
    pub fn into_order(self) -> Order {
        match self {
            Self::Local(order) => order,
            Self::Remote(remote) => convert_remote(remote),
        }
    }
}

fn convert_remote(remote: RemoteOrder) -> Order {
    let status = remote.status.parse::<OrderStatus>().unwrap_or_else(|e| {
        warn!(order_id = remote.id, error = %e, "Unknown remote order status, using pending");
        OrderStatus::Pending
    });

    let payment_kind = remote
        .payment_method
        .as_deref()
        .map(|raw| {
            raw.parse::<PaymentType>().unwrap_or_else(|e| {
                warn!(order_id = remote.id, error = %e, "Unknown remote payment method");
                PaymentType::default()
            })
        })
        .unwrap_or_default();

    let shipping_address = remote
        .shipping_address
        .map(ShippingAddress::from)
        .unwrap_or_default();

    let warranty_info = remote.warranty_accepted.then(|| WarrantyInfo {
        accepted: true,
        client_name: remote.warranty_client_name.unwrap_or_default(),
        vehicle_registration: remote.warranty_vehicle_registration.unwrap_or_default(),
        vehicle_mileage: remote.warranty_vehicle_mileage.unwrap_or_default(),
    });

    Order {
        id: OrderId::from_remote(remote.id),
        items: remote.items.into_iter().map(convert_remote_item).collect(),
        shipping_address,
        payment_method: PaymentMethod::new(payment_kind),
        total_amount: round_currency(remote.total_amount),
        status,
        source: OrderSource::Remote,
        created_at: remote.created_at,
        updated_at: remote.updated_at,
        tracking_number: remote.tracking_number,
        warranty_info,
        notes: remote.notes,
    }
}

fn convert_remote_item(item: RemoteOrderItem) -> OrderLine {
    let specifications = match item.specifications {
        Some(serde_json::Value::String(text)) => text,
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    OrderLine {
        product_id: ProductId::new(id_to_string(&item.product_id)),
        product_name: item.product_name,
        quantity: item.quantity,
        unit_price: round_currency(item.unit_price),
        total_price: round_currency(item.total_price),
        specifications,
    }
}
