//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::config::StorefrontConfig;
use crate::session::{Session, SessionError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The shopper session sits
/// behind one async mutex, so requests touching it run one at a time.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    session: Mutex<Session>,
}

impl AppState {
    /// Create a new application state, opening the session on the
    /// configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be opened.
    pub fn new(config: StorefrontConfig) -> Result<Self, SessionError> {
        let session = Session::open(&config)?;
        Ok(Self::with_session(config, session))
    }

    /// Create a state around an already opened session.
    #[must_use]
    pub fn with_session(config: StorefrontConfig, session: Session) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                session: Mutex::new(session),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Lock the shopper session for the duration of a request.
    pub async fn session(&self) -> MutexGuard<'_, Session> {
        self.inner.session.lock().await
    }
}
