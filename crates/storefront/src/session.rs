//! Shopper session.
//!
//! A [`Session`] owns every store hydrated from durable storage for one
//! running process: the cart, the order history, the token and the pipeline
//! that turns a cart into an order.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use pneushop_core::{Order, OrderId, ProductId};

use crate::auth::TokenStore;
use crate::backend::{BackendClient, BackendError};
use crate::cart::CartStore;
use crate::checkout::{CheckoutError, CheckoutForm, CheckoutSummary};
use crate::config::StorefrontConfig;
use crate::orders::{OrderHistory, OrderPipeline, OrderReceipt, OrderRecord, OrderRequest};
use crate::storage::{FileStorage, Storage, StorageError};

/// Errors opening a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Backend client error: {0}")]
    Backend(#[from] BackendError),
}

/// The stores backing one shopper.
#[derive(Debug)]
pub struct Session {
    cart: CartStore,
    orders: OrderHistory,
    pipeline: OrderPipeline,
    backend: BackendClient,
    tokens: TokenStore,
}

impl Session {
    /// Open a session on the configured data directory and backend.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the data directory cannot be created or the
    /// HTTP client cannot be built.
    pub fn open(config: &StorefrontConfig) -> Result<Self, SessionError> {
        let storage = Arc::new(FileStorage::open(&config.data_dir)?);
        let backend = BackendClient::new(&config.backend)?;
        Ok(Self::with_storage(storage, backend))
    }

    /// Hydrate a session from `storage`.
    #[must_use]
    pub fn with_storage(storage: Arc<dyn Storage>, backend: BackendClient) -> Self {
        let tokens = TokenStore::new(storage.clone());
        Self {
            cart: CartStore::load(storage.clone()),
            orders: OrderHistory::load(storage),
            pipeline: OrderPipeline::new(backend.clone(), tokens.clone()),
            backend,
            tokens,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn orders(&self) -> &OrderHistory {
        &self.orders
    }

    pub const fn orders_mut(&mut self) -> &mut OrderHistory {
        &mut self.orders
    }

    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Backend client, for catalog browsing.
    #[must_use]
    pub const fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// Fetch a product from the backend and add it to the cart.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the product cannot be fetched; the cart is
    /// left untouched.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Option<u32>, BackendError> {
        let product = self.backend.get_product(product_id).await?;
        Ok(self.cart.add_to_cart(product, quantity))
    }

    /// Price breakdown for the current cart.
    #[must_use]
    pub fn checkout_summary(&self) -> CheckoutSummary {
        CheckoutSummary::from_subtotal(self.cart.total_price())
    }

    /// Check the checkout entry conditions.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` or `LoginRequired`.
    pub fn begin_checkout(&self) -> Result<CheckoutSummary, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if !self.tokens.is_authenticated() {
            return Err(CheckoutError::LoginRequired);
        }
        Ok(self.checkout_summary())
    }

    /// Place an order for the whole cart, then empty the cart.
    ///
    /// Cached product snapshots are dropped afterwards so the next lookup
    /// sees post-purchase stock. The order total is the checkout summary total. Once the entry gate and
    /// field validation pass this always yields a receipt; see
    /// [`OrderPipeline::create_order`].
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if the gate or validation fails. Nothing is
    /// submitted in that case.
    #[instrument(skip_all)]
    pub async fn place_order(&mut self, form: CheckoutForm) -> Result<OrderReceipt, CheckoutError> {
        let summary = self.begin_checkout()?;
        form.validate()?;

        let mut request = OrderRequest::new(
            self.cart.items().to_vec(),
            form.shipping_address,
            form.payment_method,
            summary.total,
        );
        request.warranty = form.warranty;
        request.notes = form.notes;

        let receipt = self.pipeline.create_order(&mut self.orders, request).await;
        self.cart.clear_cart();
        self.backend.invalidate_products();

        info!(order_id = %receipt.order_id, total = %summary.total, "Checkout complete");
        Ok(receipt)
    }

    /// Orders for the account page.
    ///
    /// Remote orders come first when a token is stored and the backend
    /// answers, followed by local orders the backend does not know about.
    /// Without a token, or on backend failure, only the local history is
    /// returned.
    #[instrument(skip(self))]
    pub async fn account_orders(&self) -> Vec<Order> {
        let local = self.orders.all_orders().iter().cloned().map(OrderRecord::Local);

        let Some(token) = self.tokens.access_token() else {
            return local.map(OrderRecord::into_order).collect();
        };

        let remote = match self.backend.list_orders(&token).await {
            Ok(remote) => remote,
            Err(e) => {
                warn!(error = %e, "Failed to fetch remote orders, showing local history");
                return local.map(OrderRecord::into_order).collect();
            }
        };

        let remote: Vec<OrderRecord> = remote.into_iter().map(OrderRecord::Remote).collect();
        let known: HashSet<OrderId> = remote.iter().map(OrderRecord::id).collect();

        remote
            .into_iter()
            .chain(local.filter(|record| !known.contains(&record.id())))
            .map(OrderRecord::into_order)
            .collect()
    }
}
