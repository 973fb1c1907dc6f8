//! Backend REST API client.
//!
//! # Architecture
//!
//! - The backend is the source of truth for products, orders and stock
//! - `reqwest` for HTTP with Bearer authentication
//! - Product snapshots are cached in-memory via `moka` (TTL from config)
//! - No retries and no client-side timeout: a single failed attempt is
//!   reported to the caller, which decides how to degrade
//!
//! # Endpoints
//!
//! - `POST orders/` - create an order
//! - `GET orders/` - list the authenticated customer's orders
//! - `GET products/` - catalog listing, paginated and filtered
//! - `GET products/search/` - catalog search
//! - `GET products/{id}/` - product detail

pub mod conversions;
pub mod types;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use pneushop_core::{Product, ProductId};

use crate::config::BackendConfig;
use types::{
    CreateOrderPayload, CreateOrderResponse, OrderListResponse, ProductFilters,
    ProductListResponse, ProductPage, ProductPayload, RemoteOrder,
};

/// Maximum number of product snapshots kept in memory.
const PRODUCT_CACHE_CAPACITY: u64 = 1000;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection refused, DNS, TLS...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Endpoint URL could not be built.
    #[error("Invalid endpoint: {0}")]
    Url(String),

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BackendError {
    /// HTTP status of an API error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the backend REST API.
///
/// Cheaply cloneable; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, Product>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let products = Cache::builder()
            .max_capacity(PRODUCT_CACHE_CAPACITY)
            .time_to_live(config.product_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.clone(),
                products,
            }),
        })
    }

    /// Base URL all endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, non-2xx status, or a
    /// response without a numeric `id`.
    #[instrument(skip(self, token, payload), fields(items = payload.items.len()))]
    pub async fn create_order(
        &self,
        token: &SecretString,
        payload: &CreateOrderPayload,
    ) -> Result<CreateOrderResponse, BackendError> {
        let url = self.endpoint(&["orders"])?;
        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(payload)
            .send()
            .await?;

        let created: CreateOrderResponse = read_json(response).await?;
        debug!(order_id = created.id, "Backend accepted order");
        Ok(created)
    }

    /// List the authenticated customer's orders.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, non-2xx status, or an
    /// unexpected body.
    #[instrument(skip(self, token))]
    pub async fn list_orders(&self, token: &SecretString) -> Result<Vec<RemoteOrder>, BackendError> {
        let url = self.endpoint(&["orders"])?;
        let response = self
            .inner
            .client
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        let list: OrderListResponse = read_json(response).await?;
        Ok(list.into_orders())
    }

    /// Fetch a product snapshot, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the product cannot be fetched.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, BackendError> {
        if let Some(product) = self.inner.products.get(id).await {
            debug!("Product cache hit");
            return Ok(product);
        }

        let url = self.endpoint(&["products", id.as_str()])?;
        let response = self.inner.client.get(url).send().await?;
        let payload: ProductPayload = read_json(response).await?;
        let product = conversions::convert_product(payload);

        self.inner
            .products
            .insert(id.clone(), product.clone())
            .await;
        Ok(product)
    }

    /// List one catalog page (1-based) matching `filters`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the listing cannot be fetched.
    #[instrument(skip(self, filters))]
    pub async fn list_products(
        &self,
        page: u32,
        filters: &ProductFilters,
    ) -> Result<ProductPage, BackendError> {
        let mut url = self.endpoint(&["products"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.max(1).to_string())
            .extend_pairs(filters.query_pairs());
        self.fetch_products(url).await
    }

    /// Full-text catalog search.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the search fails.
    #[instrument(skip(self, filters))]
    pub async fn search_products(
        &self,
        query: &str,
        filters: &ProductFilters,
    ) -> Result<ProductPage, BackendError> {
        let mut url = self.endpoint(&["products", "search"])?;
        url.query_pairs_mut()
            .append_pair("q", query.trim())
            .extend_pairs(filters.query_pairs());
        self.fetch_products(url).await
    }

    /// Fetch a listing and refresh the cached snapshot of every product in it.
    async fn fetch_products(&self, url: Url) -> Result<ProductPage, BackendError> {
        let response = self.inner.client.get(url).send().await?;
        let listing: ProductListResponse = read_json(response).await?;
        let page = conversions::convert_product_page(listing);

        for product in &page.products {
            self.inner
                .products
                .insert(product.id.clone(), product.clone())
                .await;
        }
        debug!(count = page.products.len(), total = page.count, "Fetched catalog page");
        Ok(page)
    }

    /// Drop every cached product snapshot.
    pub fn invalidate_products(&self) {
        self.inner.products.invalidate_all();
    }

    /// Resolve `segments` beneath the base URL, with a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::Url(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }
}

/// Check the status and decode a JSON body, keeping the raw text for logs.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Backend returned non-success status"
        );
        return Err(BackendError::Api {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse backend response"
        );
        BackendError::Parse(e)
    })
}
