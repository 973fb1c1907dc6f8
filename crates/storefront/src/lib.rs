//! PneuShop storefront library.
//!
//! The shopper-side stores (cart, order history, access token), the order
//! submission pipeline with its local fallback, and the JSON HTTP service
//! built on top of them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod backend;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod orders;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;

#[cfg(test)]
mod testing;
