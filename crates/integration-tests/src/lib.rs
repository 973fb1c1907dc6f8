//! Integration tests for PneuShop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pneushop-integration-tests
//! ```
//!
//! Each test starts two servers on ephemeral ports: a [`FakeBackend`]
//! standing in for the REST API, and the real storefront router backed by
//! file storage in a temporary directory ([`TestStorefront`]). Nothing
//! outside the test process is needed.

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path as UrlPath, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};
use tempfile::TempDir;

use pneushop_storefront::auth::TokenStore;
use pneushop_storefront::config::{BackendConfig, StorefrontConfig};
use pneushop_storefront::routes;
use pneushop_storefront::state::AppState;
use pneushop_storefront::storage::FileStorage;

/// Timestamp reported for every order the fake backend stores.
const FIXED_TIMESTAMP: &str = "2026-03-01T10:00:00Z";

#[derive(Default)]
struct FakeState {
    products: HashMap<String, Value>,
    orders: Mutex<Vec<Value>>,
    next_id: AtomicU64,
    reject_orders: bool,
}

/// In-process stand-in for the backend REST API.
pub struct FakeBackend {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeBackend {
    /// Serve `products` and accept orders.
    pub async fn start(products: Vec<Value>) -> Self {
        Self::spawn(products, false).await
    }

    /// Serve `products` but answer 503 to every order submission.
    pub async fn rejecting_orders(products: Vec<Value>) -> Self {
        Self::spawn(products, true).await
    }

    async fn spawn(products: Vec<Value>, reject_orders: bool) -> Self {
        let state = Arc::new(FakeState {
            products: products
                .into_iter()
                .map(|p| (p["id"].to_string().trim_matches('"').to_string(), p))
                .collect(),
            next_id: AtomicU64::new(1000),
            reject_orders,
            ..FakeState::default()
        });

        let router = Router::new()
            .route("/api/products/", get(list_products))
            .route("/api/products/{id}/", get(product))
            .route("/api/orders/", get(list_orders).post(create_order))
            .with_state(state.clone());

        let addr = serve(router).await;
        Self {
            base_url: format!("http://{addr}/api/"),
            state,
        }
    }

    /// Order bodies received so far, as submitted.
    #[must_use]
    pub fn received_orders(&self) -> Vec<Value> {
        self.state.orders.lock().unwrap().clone()
    }
}

/// Catalog listing, sorted by id, optionally narrowed by `brand` and
/// `inStock=true`.
async fn list_products(
    State(state): State<Arc<FakeState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut results: Vec<&Value> = state
        .products
        .values()
        .filter(|p| query.get("brand").is_none_or(|brand| p["brand"] == brand.as_str()))
        .filter(|p| query.get("inStock").is_none_or(|_| p["stock"].as_i64() > Some(0)))
        .collect();
    results.sort_by_key(|p| p["id"].as_u64());
    Json(json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results
    }))
}

async fn product(
    State(state): State<Arc<FakeState>>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<Value>, StatusCode> {
    state
        .products
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_order(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    if !headers.contains_key("authorization") {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if state.reject_orders {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    body["id"] = json!(id);
    state.orders.lock().unwrap().push(body);
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn list_orders(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    if !headers.contains_key("authorization") {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let results: Vec<Value> = state
        .orders
        .lock()
        .unwrap()
        .iter()
        .map(|order| {
            let mut remote = order.clone();
            remote["status"] = json!("pending");
            remote["created_at"] = json!(FIXED_TIMESTAMP);
            remote["updated_at"] = json!(FIXED_TIMESTAMP);
            remote
        })
        .collect();
    Ok(Json(json!({ "count": results.len(), "results": results })))
}

/// The storefront router served over real HTTP with file storage.
pub struct TestStorefront {
    pub url: String,
    pub client: reqwest::Client,
    data_dir: TempDir,
}

impl TestStorefront {
    /// Start the storefront against `backend_url` with a fresh data directory.
    pub async fn start(backend_url: &str) -> Self {
        let data_dir = tempfile::tempdir().unwrap();
        let url = Self::serve_on(data_dir.path(), backend_url).await;
        Self {
            url,
            client: reqwest::Client::new(),
            data_dir,
        }
    }

    /// Start a fresh storefront on the same data directory, as a new
    /// process would. The previous server keeps running but is no longer
    /// addressed.
    pub async fn restart(self, backend_url: &str) -> Self {
        let url = Self::serve_on(self.data_dir.path(), backend_url).await;
        Self { url, ..self }
    }

    async fn serve_on(data_dir: &Path, backend_url: &str) -> String {
        let config = StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            data_dir: PathBuf::from(data_dir),
            backend: BackendConfig::new(backend_url, Duration::from_secs(60)).unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config).unwrap();
        let addr = serve(routes::routes().with_state(state)).await;
        format!("http://{addr}")
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// Store an access token as the backend login flow would.
    pub fn log_in(&self, token: &str) {
        let storage = Arc::new(FileStorage::open(self.data_dir()).unwrap());
        TokenStore::new(storage)
            .set_access_token(&SecretString::from(token.to_string()))
            .unwrap();
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self
            .client
            .get(format!("{}{path}", self.url))
            .send()
            .await
            .unwrap();
        decode(response).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let response = self
            .client
            .post(format!("{}{path}", self.url))
            .json(body)
            .send()
            .await
            .unwrap();
        decode(response).await
    }
}

async fn decode(response: reqwest::Response) -> (StatusCode, Value) {
    let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
    let text = response.text().await.unwrap();
    (status, serde_json::from_str(&text).unwrap_or(Value::Null))
}

/// Serve `router` on an ephemeral port.
async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A base URL nothing listens on.
#[must_use]
pub fn unreachable_backend() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/")
}

/// Product payload in the backend's shape.
#[must_use]
pub fn tire(id: u64, price: &str, stock: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Primacy 4 #{id}"),
        "brand": "Michelin",
        "size": "205/55R16",
        "price": price,
        "stock": stock,
        "season": "ete",
        "width": 205,
        "height": 55,
        "diameter": 16,
        "load_index": 91,
        "speed_rating": "V"
    })
}

/// A complete checkout body.
#[must_use]
pub fn checkout_form() -> Value {
    json!({
        "shippingAddress": {
            "firstName": "Leila",
            "lastName": "Ben Salah",
            "address": "4 avenue Habib Bourguiba",
            "city": "Sousse",
            "postalCode": "4000",
            "country": "Tunisie",
            "phone": "+216 73 222 333"
        },
        "paymentMethod": { "type": "cash_on_delivery" },
        "warranty": {
            "accepted": true,
            "clientName": "Leila Ben Salah",
            "vehicleRegistration": "210 TU 1234",
            "vehicleMileage": "48000"
        },
        "notes": "Livrer le matin"
    })
}
