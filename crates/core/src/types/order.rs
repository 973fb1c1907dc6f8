//! Orders and the value records collected during checkout.
//!
//! An [`Order`] freezes its line items at creation time: later changes to a
//! product's name or price never reach an existing order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartLine;
use super::id::{OrderId, ProductId};
use super::status::{OrderSource, OrderStatus, PaymentType};

/// Default country for shipping addresses.
pub const DEFAULT_COUNTRY: &str = "Tunisie";

/// Delivery address collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Street address.
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

impl ShippingAddress {
    /// `first last`, trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

impl Default for ShippingAddress {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            company: None,
            address: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
            phone: String::new(),
        }
    }
}

/// Payment choice. Card numbers are never retained by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    #[serde(rename = "type")]
    pub kind: PaymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
}

impl PaymentMethod {
    #[must_use]
    pub const fn new(kind: PaymentType) -> Self {
        Self {
            kind,
            holder_name: None,
        }
    }
}

/// Warranty card data attached to an order for post-sale service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyInfo {
    pub accepted: bool,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub vehicle_registration: String,
    #[serde(default)]
    pub vehicle_mileage: String,
}

impl WarrantyInfo {
    /// The shopper declined the warranty card.
    #[must_use]
    pub fn declined() -> Self {
        Self::default()
    }
}

/// A line item frozen at order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    /// Unit price as it was in the cart.
    pub unit_price: Decimal,
    /// `quantity × unit_price`.
    pub total_price: Decimal,
    /// Specification text such as `225/45 R17 91W`.
    #[serde(default)]
    pub specifications: String,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.clone(),
            product_name: line.product.name.clone(),
            quantity: line.quantity,
            unit_price: line.product.price,
            total_price: line.line_total(),
            specifications: line.product.specification_label(),
        }
    }
}

/// A durable record of a purchase attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub source: OrderSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_info: Option<WarrantyInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Order {
    /// Sum of line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Whether the backend issued this order's identifier.
    #[must_use]
    pub const fn is_confirmed_remotely(&self) -> bool {
        matches!(self.source, OrderSource::Remote)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::types::product::Product;

    fn line(price: &str, quantity: u32) -> CartLine {
        CartLine::new(
            Product {
                id: ProductId::new("P1"),
                name: "Pilot Sport 5".to_string(),
                brand: "Michelin".to_string(),
                model: "225/40R18".to_string(),
                price: Decimal::from_str(price).unwrap(),
                old_price: None,
                stock: 10,
                in_stock: true,
                specifications: None,
            },
            quantity,
        )
    }

    #[test]
    fn test_order_line_freezes_cart_prices() {
        let order_line = OrderLine::from(&line("99.995", 3));
        assert_eq!(order_line.unit_price.to_string(), "99.995");
        assert_eq!(order_line.total_price.to_string(), "299.985");
        assert_eq!(order_line.specifications, "225/40R18");
        assert_eq!(order_line.product_name, "Pilot Sport 5");
    }

    #[test]
    fn test_shipping_address_defaults_to_tunisia() {
        let address = ShippingAddress::default();
        assert_eq!(address.country, "Tunisie");
    }

    #[test]
    fn test_full_name_trims() {
        let address = ShippingAddress {
            first_name: " Amine ".to_string(),
            last_name: String::new(),
            ..ShippingAddress::default()
        };
        assert_eq!(address.full_name(), "Amine");
    }

    #[test]
    fn test_payment_method_serializes_type_field() {
        let json = serde_json::to_value(PaymentMethod::new(PaymentType::Paypal)).unwrap();
        assert_eq!(json["type"], "paypal");
    }
}
