//! Core types for PneuShop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use cart::CartLine;
pub use id::*;
pub use order::{Order, OrderLine, PaymentMethod, ShippingAddress, WarrantyInfo};
pub use price::{CurrencyCode, Price, round_currency};
pub use product::{Product, Season, TireSpecifications};
pub use status::*;
