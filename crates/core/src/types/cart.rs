//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::Product;

/// One product and quantity pairing in the shopper's cart.
///
/// Invariant maintained by the cart store: `1 <= quantity <= product.stock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Create a line without clamping; callers enforce stock bounds.
    #[must_use]
    pub const fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// `quantity × unit price`, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }

    /// Whether another unit may be added without exceeding stock.
    #[must_use]
    pub const fn at_stock_limit(&self) -> bool {
        self.quantity >= self.product.stock
    }
}
