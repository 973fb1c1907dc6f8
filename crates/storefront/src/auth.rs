//! Access token kept in durable storage.
//!
//! Token issuance and refresh are owned by the backend. The storefront only
//! reads the stored bearer token; its absence means "no remote order", never
//! an error.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::storage::{Storage, StorageError, keys};

/// Reads and writes the backend bearer token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl TokenStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// The stored token, if present and non-blank.
    ///
    /// Read failures are logged and treated as "no token".
    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        match self.storage.read(keys::ACCESS_TOKEN) {
            Ok(Some(raw)) => {
                let token = raw.trim();
                (!token.is_empty()).then(|| SecretString::from(token.to_string()))
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read access token");
                None
            }
        }
    }

    /// Whether a token is currently stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Store a token obtained from the backend login flow.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the token cannot be written.
    pub fn set_access_token(&self, token: &SecretString) -> Result<(), StorageError> {
        self.storage
            .write(keys::ACCESS_TOKEN, token.expose_secret().trim())
    }

    /// Forget the stored token (logout).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be removed.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(keys::ACCESS_TOKEN)
    }
}
