//! Wire types for the backend REST API.
//!
//! Field names follow the backend's snake_case JSON. Conversions into
//! storefront types live in `conversions` (products) and `orders::record`
//! (orders).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pneushop_core::{PaymentType, Product, Season};

// =============================================================================
// Order creation
// =============================================================================

/// Body of `POST orders/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderPayload {
    pub items: Vec<OrderItemPayload>,
    pub shipping_address: AddressPayload,
    /// Mirrors `shipping_address`; checkout does not capture a separate one.
    pub billing_address: AddressPayload,
    pub payment_method: PaymentType,
    /// Two decimal places.
    pub total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub warranty_accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty_client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty_vehicle_registration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty_vehicle_mileage: Option<String>,
}

/// One normalized line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItemPayload {
    pub product_id: String,
    pub quantity: u32,
    /// Two decimal places.
    pub unit_price: Decimal,
    /// `quantity × unit_price`, two decimal places.
    pub total_price: Decimal,
    pub product_name: String,
    pub specifications: String,
}

/// Postal address as the backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AddressPayload {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
}

/// Fields read back from a successful `POST orders/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    /// Authoritative order identifier.
    pub id: u64,
    #[serde(default)]
    pub order_number: Option<String>,
}

// =============================================================================
// Order listing
// =============================================================================

/// An order as returned by `GET orders/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteOrder {
    pub id: u64,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub items: Vec<RemoteOrderItem>,
    #[serde(default)]
    pub shipping_address: Option<AddressPayload>,
    #[serde(default)]
    pub payment_method: Option<String>,
    pub total_amount: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub warranty_accepted: bool,
    #[serde(default)]
    pub warranty_client_name: Option<String>,
    #[serde(default)]
    pub warranty_vehicle_registration: Option<String>,
    #[serde(default)]
    pub warranty_vehicle_mileage: Option<String>,
}

/// A line item of a [`RemoteOrder`].
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteOrderItem {
    /// Numeric or string id depending on the backend serializer.
    pub product_id: serde_json::Value,
    #[serde(default)]
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    #[serde(default)]
    pub specifications: Option<serde_json::Value>,
}

/// `GET orders/` answers either a paginated envelope or a bare list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OrderListResponse {
    Paginated { results: Vec<RemoteOrder> },
    Plain(Vec<RemoteOrder>),
}

impl OrderListResponse {
    #[must_use]
    pub fn into_orders(self) -> Vec<RemoteOrder> {
        match self {
            Self::Paginated { results } => results,
            Self::Plain(orders) => orders,
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// A product as returned by `GET products/{id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    pub id: serde_json::Value,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    /// Size designation, used as the model name.
    #[serde(default)]
    pub size: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub old_price: Option<Decimal>,
    /// May be negative when the backend oversold; treated as zero.
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub width: Option<u16>,
    #[serde(default)]
    pub height: Option<u16>,
    #[serde(default)]
    pub diameter: Option<u16>,
    #[serde(default)]
    pub load_index: Option<u16>,
    #[serde(default)]
    pub speed_rating: Option<String>,
}

/// `GET products/` and `GET products/search/` answer either a paginated
/// envelope or a bare list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProductListResponse {
    Paginated {
        results: Vec<ProductPayload>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
    },
    Plain(Vec<ProductPayload>),
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Total matches across all pages.
    pub count: u64,
    /// Backend URL of the next page, if any.
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// Catalog filters, sent as query parameters.
///
/// Also deserializable from the storefront's own query string, with the
/// same camelCase names the backend uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilters {
    pub brand: Option<String>,
    pub category: Option<String>,
    pub season: Option<Season>,
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub diameter: Option<u16>,
    pub in_stock: Option<bool>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl ProductFilters {
    /// Query pairs for the backend. Blank text filters are skipped and a
    /// price bound becomes `priceRange=min,max` with the missing side empty.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        let text = [("brand", &self.brand), ("category", &self.category)];
        for (key, value) in text {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, value.to_string()));
            }
        }
        if let Some(season) = self.season {
            pairs.push(("season", season.as_str().to_string()));
        }
        let dimensions = [
            ("width", self.width),
            ("height", self.height),
            ("diameter", self.diameter),
        ];
        for (key, value) in dimensions {
            if let Some(value) = value {
                pairs.push((key, value.to_string()));
            }
        }
        if let Some(in_stock) = self.in_stock {
            pairs.push(("inStock", in_stock.to_string()));
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            let bound = |b: Option<Decimal>| b.map(|d| d.to_string()).unwrap_or_default();
            pairs.push((
                "priceRange",
                format!("{},{}", bound(self.min_price), bound(self.max_price)),
            ));
        }

        pairs
    }
}

/// Render a JSON id (number or string) as the storefront's string id.
#[must_use]
pub fn id_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
