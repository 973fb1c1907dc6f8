//! Cart store.
//!
//! Holds the single active cart for the current session and keeps every line
//! within `1..=product.stock`. Every mutation is persisted synchronously to
//! durable storage under [`keys::CART`]; construction reads that record once.
//!
//! Cart operations never fail towards the caller. Out-of-range quantities are
//! clamped, unknown product ids are ignored and storage failures are logged.
//!
//! Zero-stock policy: adding a product whose stock is zero never creates a
//! line, and drops any line already held for it.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use pneushop_core::{CartLine, Product, ProductId};

use crate::storage::{Storage, keys};

/// The shopper's in-progress cart.
#[derive(Debug)]
pub struct CartStore {
    lines: Vec<CartLine>,
    storage: Arc<dyn Storage>,
}

impl CartStore {
    /// Restore the cart from storage.
    ///
    /// A missing or unreadable record yields an empty cart. Restored lines
    /// are re-clamped against the stock recorded in their product snapshot.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let lines = match storage.read(keys::CART) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => normalize(lines),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable cart record");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read cart record");
                Vec::new()
            }
        };

        debug!(lines = lines.len(), "Cart restored");
        Self { lines, storage }
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity held for a product, if it has a line.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> Option<u32> {
        self.find(product_id).map(|line| line.quantity)
    }

    /// Add `quantity` units of `product`, clamped to its stock.
    ///
    /// An existing line grows to `min(existing + quantity, stock)` and takes
    /// the newer product snapshot; a new line starts at
    /// `clamp(quantity, 1, stock)`. Returns the resulting line quantity, or
    /// `None` when no line is retained (zero stock).
    pub fn add_to_cart(&mut self, product: Product, quantity: u32) -> Option<u32> {
        let stock = product.stock;
        let position = self.lines.iter().position(|l| l.product.id == product.id);

        let result = match (position, stock) {
            (Some(index), 0) => {
                self.lines.remove(index);
                None
            }
            (None, 0) => None,
            (Some(index), _) => {
                let line = self.lines.get_mut(index)?;
                line.quantity = line.quantity.saturating_add(quantity).min(stock);
                line.product = product;
                Some(line.quantity)
            }
            (None, _) => {
                let clamped = quantity.clamp(1, stock);
                self.lines.push(CartLine::new(product, clamped));
                Some(clamped)
            }
        };

        self.persist();
        result
    }

    /// Remove the line for `product_id`. Absent ids are ignored.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        self.lines.retain(|line| &line.product.id != product_id);
        self.persist();
    }

    /// Set a line's quantity, clamped to stock. Zero removes the line.
    ///
    /// Returns the resulting quantity, or `None` when no line remains.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: u32) -> Option<u32> {
        if quantity == 0 {
            self.remove_from_cart(product_id);
            return None;
        }

        let Some(index) = self.lines.iter().position(|l| &l.product.id == product_id) else {
            return None;
        };

        let result = match self.lines.get_mut(index) {
            Some(line) if line.product.stock > 0 => {
                line.quantity = quantity.min(line.product.stock);
                Some(line.quantity)
            }
            _ => {
                self.lines.remove(index);
                None
            }
        };

        self.persist();
        result
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// `Σ quantity`, recomputed on every call.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// `Σ quantity × price`, recomputed on every call.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    fn find(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product.id == product_id)
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.lines) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart");
                return;
            }
        };
        if let Err(e) = self.storage.write(keys::CART, &raw) {
            warn!(error = %e, "Failed to persist cart");
        }
    }
}

/// Enforce the line invariants on data read back from storage.
fn normalize(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut out: Vec<CartLine> = Vec::with_capacity(lines.len());
    for mut line in lines {
        line.quantity = line.quantity.min(line.product.stock);
        if line.quantity == 0 || out.iter().any(|l| l.product.id == line.product.id) {
            continue;
        }
        out.push(line);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::storage::MemoryStorage;

    fn product(id: &str, price: &str, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Tire {id}"),
            brand: "Bridgestone".to_string(),
            model: "205/55R16".to_string(),
            price: Decimal::from_str(price).unwrap(),
            old_price: None,
            stock,
            in_stock: stock > 0,
            specifications: None,
        }
    }

    fn empty_store() -> (CartStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (CartStore::load(storage.clone()), storage)
    }

    #[test]
    fn test_add_new_line_clamps_to_stock() {
        let (mut cart, _) = empty_store();
        assert_eq!(cart.add_to_cart(product("P1", "100", 3), 10), Some(3));
        assert_eq!(cart.quantity_of(&ProductId::new("P1")), Some(3));
    }

    #[test]
    fn test_add_zero_quantity_creates_single_unit() {
        let (mut cart, _) = empty_store();
        assert_eq!(cart.add_to_cart(product("P1", "100", 3), 0), Some(1));
    }

    #[test]
    fn test_add_existing_line_is_capped_at_stock() {
        let (mut cart, _) = empty_store();
        cart.add_to_cart(product("P1", "80", 5), 4);
        assert_eq!(cart.add_to_cart(product("P1", "80", 5), 3), Some(5));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_add_refreshes_product_snapshot() {
        let (mut cart, _) = empty_store();
        cart.add_to_cart(product("P1", "80", 5), 1);
        cart.add_to_cart(product("P1", "75", 2), 3);
        let line = cart.items().first().unwrap();
        assert_eq!(line.product.price, Decimal::from(75));
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_zero_stock_never_creates_line() {
        let (mut cart, _) = empty_store();
        assert_eq!(cart.add_to_cart(product("P1", "100", 0), 1), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_zero_stock_drops_existing_line() {
        let (mut cart, _) = empty_store();
        cart.add_to_cart(product("P1", "100", 2), 1);
        cart.add_to_cart(product("P2", "50", 2), 1);
        assert_eq!(cart.add_to_cart(product("P1", "100", 0), 1), None);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.quantity_of(&ProductId::new("P1")), None);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut cart, _) = empty_store();
        cart.add_to_cart(product("P1", "100", 2), 1);
        cart.add_to_cart(product("P2", "50", 2), 2);

        cart.remove_from_cart(&ProductId::new("P1"));
        let once = cart.items().to_vec();
        cart.remove_from_cart(&ProductId::new("P1"));
        assert_eq!(cart.items(), once.as_slice());
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let (mut cart, _) = empty_store();
        cart.add_to_cart(product("P1", "100", 4), 2);
        assert_eq!(cart.update_quantity(&ProductId::new("P1"), 0), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_clamps_and_ignores_unknown() {
        let (mut cart, _) = empty_store();
        cart.add_to_cart(product("P1", "100", 4), 1);
        assert_eq!(cart.update_quantity(&ProductId::new("P1"), 9), Some(4));
        assert_eq!(cart.update_quantity(&ProductId::new("nope"), 2), None);
        assert_eq!(cart.total_items(), 4);
    }

    #[test]
    fn test_totals_are_recomputed() {
        let (mut cart, _) = empty_store();
        cart.add_to_cart(product("P1", "120.50", 4), 2);
        cart.add_to_cart(product("P2", "89.99", 10), 3);
        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), Decimal::from_str("510.97").unwrap());

        cart.update_quantity(&ProductId::new("P2"), 1);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Decimal::from_str("330.99").unwrap());
    }

    #[test]
    fn test_reload_restores_identical_lines() {
        let (mut cart, storage) = empty_store();
        cart.add_to_cart(product("P1", "100", 3), 2);
        cart.add_to_cart(product("P2", "60", 8), 5);
        cart.update_quantity(&ProductId::new("P2"), 4);
        cart.remove_from_cart(&ProductId::new("P3"));

        let restored = CartStore::load(storage);
        assert_eq!(restored.items(), cart.items());
    }

    #[test]
    fn test_clear_is_persisted() {
        let (mut cart, storage) = empty_store();
        cart.add_to_cart(product("P1", "100", 3), 2);
        cart.clear_cart();
        assert!(CartStore::load(storage).is_empty());
    }

    #[test]
    fn test_corrupt_record_loads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(keys::CART, "{not json").unwrap();
        assert!(CartStore::load(storage).is_empty());
    }

    #[test]
    fn test_restored_lines_are_normalized() {
        let storage = Arc::new(MemoryStorage::new());
        let lines = vec![
            CartLine::new(product("P1", "100", 2), 7),
            CartLine::new(product("P1", "100", 2), 1),
            CartLine::new(product("P2", "100", 0), 1),
        ];
        storage
            .write(keys::CART, &serde_json::to_string(&lines).unwrap())
            .unwrap();

        let cart = CartStore::load(storage);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.quantity_of(&ProductId::new("P1")), Some(2));
    }
}
