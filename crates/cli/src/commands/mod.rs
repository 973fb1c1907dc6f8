//! Command implementations.
//!
//! Every command opens the session from `PNEUSHOP_DATA_DIR`, so the CLI and
//! the HTTP service share the same durable cart and order records.

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod token;

use serde::Serialize;
use thiserror::Error;

use pneushop_storefront::backend::BackendError;
use pneushop_storefront::checkout::CheckoutError;
use pneushop_storefront::config::{ConfigError, StorefrontConfig};
use pneushop_storefront::session::{Session, SessionError};
use pneushop_storefront::storage::StorageError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),
}

/// Load configuration and open the shopper session.
pub fn open_session() -> Result<Session, CliError> {
    let config = StorefrontConfig::from_env()?;
    tracing::debug!(data_dir = %config.data_dir.display(), "Opening session");
    Ok(Session::open(&config)?)
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{rendered}");
    }
    Ok(())
}
