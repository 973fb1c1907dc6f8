//! PneuShop Core - Shared types library.
//!
//! This crate provides common types used across all PneuShop components:
//! - `storefront` - Cart, checkout and order history for shoppers
//! - `cli` - Command-line access to the same session stores
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Identifiers, money, products, cart lines, orders and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
