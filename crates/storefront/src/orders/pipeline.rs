//! Order submission pipeline.
//!
//! Tries the backend first and falls back to a locally synthesized order on
//! any failure, so placing an order never fails towards the shopper. Either
//! way the order is mirrored into the [`OrderHistory`] before returning.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument, warn};

use pneushop_core::{
    CartLine, Order, OrderId, OrderLine, OrderSource, OrderStatus, PaymentMethod,
    ShippingAddress, WarrantyInfo, round_currency,
};

use super::history::OrderHistory;
use crate::auth::TokenStore;
use crate::backend::BackendClient;
use crate::backend::conversions::convert_line_item;
use crate::backend::types::{AddressPayload, CreateOrderPayload};

const LOCAL_SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Everything needed to place one order.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub items: Vec<CartLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub total_amount: Decimal,
    pub warranty: Option<WarrantyInfo>,
    pub notes: Option<String>,
}

impl OrderRequest {
    #[must_use]
    pub const fn new(
        items: Vec<CartLine>,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
        total_amount: Decimal,
    ) -> Self {
        Self {
            items,
            shipping_address,
            payment_method,
            total_amount,
            warranty: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn with_warranty(mut self, warranty: WarrantyInfo) -> Self {
        self.warranty = Some(warranty);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Outcome of [`OrderPipeline::create_order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub source: OrderSource,
}

/// Submits orders to the backend with a local fallback.
#[derive(Debug, Clone)]
pub struct OrderPipeline {
    backend: BackendClient,
    tokens: TokenStore,
}

impl OrderPipeline {
    #[must_use]
    pub const fn new(backend: BackendClient, tokens: TokenStore) -> Self {
        Self { backend, tokens }
    }

    /// Place an order and record it in `history`.
    ///
    /// Submits to the backend when an access token is stored. Without a
    /// token, or when the backend call fails for any reason, the order gets
    /// a local `ORD-` id instead. The returned receipt says which path was
    /// taken.
    #[instrument(skip_all, fields(items = request.items.len()))]
    pub async fn create_order(
        &self,
        history: &mut OrderHistory,
        request: OrderRequest,
    ) -> OrderReceipt {
        let remote_id = match self.tokens.access_token() {
            Some(token) => {
                let payload = build_payload(&request);
                match self.backend.create_order(&token, &payload).await {
                    Ok(created) => Some(created.id),
                    Err(e) => {
                        warn!(error = %e, "Remote order submission failed, keeping order locally");
                        None
                    }
                }
            }
            None => {
                info!("No access token, keeping order locally");
                None
            }
        };

        let now = Utc::now();
        let (order_id, source) = remote_id.map_or_else(
            || (local_order_id(now), OrderSource::LocalFallback),
            |id| (OrderId::from_remote(id), OrderSource::Remote),
        );

        let order = Order {
            id: order_id.clone(),
            items: request.items.iter().map(OrderLine::from).collect(),
            shipping_address: request.shipping_address,
            payment_method: request.payment_method,
            total_amount: request.total_amount,
            status: OrderStatus::Pending,
            source,
            created_at: now,
            updated_at: now,
            tracking_number: None,
            warranty_info: request.warranty,
            notes: non_blank(request.notes),
        };
        history.record(order);

        info!(order_id = %order_id, source = ?source, "Order recorded");
        OrderReceipt { order_id, source }
    }
}

/// Body for `POST orders/`. Billing mirrors shipping and every amount is
/// rounded to two decimal places.
fn build_payload(request: &OrderRequest) -> CreateOrderPayload {
    let address = AddressPayload::from(&request.shipping_address);
    let warranty = request.warranty.as_ref().filter(|w| w.accepted);

    CreateOrderPayload {
        items: request.items.iter().map(convert_line_item).collect(),
        shipping_address: address.clone(),
        billing_address: address,
        payment_method: request.payment_method.kind,
        total_amount: round_currency(request.total_amount),
        notes: non_blank(request.notes.clone()),
        warranty_accepted: warranty.is_some(),
        warranty_client_name: warranty.map(|w| w.client_name.clone()),
        warranty_vehicle_registration: warranty.map(|w| w.vehicle_registration.clone()),
        warranty_vehicle_mileage: warranty.map(|w| w.vehicle_mileage.clone()),
    }
}

/// `ORD-<unix millis>-<9 base36 chars>`.
fn local_order_id(now: DateTime<Utc>) -> OrderId {
    let mut rng = rand::rng();
    let suffix: String = (0..LOCAL_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect();
    OrderId::local(now.timestamp_millis(), &suffix)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use pneushop_core::PaymentType;
    use serde_json::{Value, json};

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing;

    #[derive(Clone, Default)]
    struct Captured {
        body: Arc<Mutex<Option<Value>>>,
        auth: Arc<Mutex<Option<String>>>,
    }

    async fn accept_order(
        State(captured): State<Captured>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        *captured.body.lock().unwrap() = Some(body);
        *captured.auth.lock().unwrap() = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        (
            StatusCode::CREATED,
            Json(json!({ "id": 981, "order_number": "PS-000981" })),
        )
    }

    fn request(total: &str) -> OrderRequest {
        OrderRequest::new(
            vec![
                CartLine::new(testing::product("P1", "120.005", 8), 1),
                CartLine::new(testing::product("P2", "39.5", 8), 2),
            ],
            testing::address(),
            PaymentMethod::new(PaymentType::CashOnDelivery),
            total.parse().unwrap(),
        )
    }

    fn setup(base_url: &str, token: Option<&str>) -> (OrderPipeline, OrderHistory) {
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = OrderPipeline::new(
            testing::backend(base_url),
            testing::tokens(&storage, token),
        );
        (pipeline, OrderHistory::load(storage))
    }

    #[tokio::test]
    async fn test_remote_success_uses_backend_id() {
        let captured = Captured::default();
        let base = testing::spawn_backend(
            Router::new()
                .route("/api/orders/", post(accept_order))
                .with_state(captured.clone()),
        )
        .await;
        let (pipeline, mut history) = setup(&base, Some("secret-token"));

        let receipt = pipeline
            .create_order(
                &mut history,
                request("199.0049").with_warranty(WarrantyInfo {
                    accepted: true,
                    client_name: "Leila Ben Salah".to_string(),
                    vehicle_registration: "210 TU 1234".to_string(),
                    vehicle_mileage: "48000".to_string(),
                }),
            )
            .await;

        assert_eq!(receipt.source, OrderSource::Remote);
        assert_eq!(receipt.order_id.as_str(), "981");

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["total_amount"], "199.00");
        assert_eq!(body["items"][0]["unit_price"], "120.01");
        assert_eq!(body["items"][1]["total_price"], "79.00");
        assert_eq!(body["billing_address"], body["shipping_address"]);
        assert_eq!(body["payment_method"], "cash_on_delivery");
        assert_eq!(body["warranty_accepted"], true);
        assert_eq!(body["warranty_vehicle_mileage"], "48000");
        assert_eq!(
            captured.auth.lock().unwrap().as_deref(),
            Some("Bearer secret-token")
        );

        let mirrored = history.get_order(&receipt.order_id).unwrap();
        assert_eq!(mirrored.status, OrderStatus::Pending);
        assert!(mirrored.is_confirmed_remotely());
        assert_eq!(history.current_order().unwrap().id, receipt.order_id);
    }

    #[tokio::test]
    async fn test_guest_checkout_records_local_order() {
        let (pipeline, mut history) = setup(&testing::unreachable_base_url(), None);

        let receipt = pipeline.create_order(&mut history, request("200")).await;

        assert_eq!(receipt.source, OrderSource::LocalFallback);
        assert!(receipt.order_id.as_str().starts_with("ORD-"));
        let order = history.get_order(&receipt.order_id).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, Decimal::from(200));
    }

    #[tokio::test]
    async fn test_unreachable_backend_falls_back() {
        let (pipeline, mut history) = setup(&testing::unreachable_base_url(), Some("tok"));

        let input = request("279.01");
        let receipt = pipeline.create_order(&mut history, input.clone()).await;

        assert_eq!(receipt.source, OrderSource::LocalFallback);
        assert!(!receipt.order_id.as_str().is_empty());
        let order = history.get_order(&receipt.order_id).unwrap();
        assert_eq!(order.items.len(), input.items.len());
        assert_eq!(order.items[1].quantity, 2);
        assert_eq!(order.shipping_address, input.shipping_address);
        assert_eq!(order.total_amount.to_string(), "279.01");
    }

    #[tokio::test]
    async fn test_local_order_keeps_unrounded_input() {
        let storage = Arc::new(MemoryStorage::new());
        let pipeline = OrderPipeline::new(
            testing::backend(&testing::unreachable_base_url()),
            testing::tokens(&storage, None),
        );
        let mut history = OrderHistory::load(storage.clone());

        let input = request("199.0049");
        let receipt = pipeline.create_order(&mut history, input.clone()).await;

        let order = history.get_order(&receipt.order_id).unwrap();
        assert_eq!(order.total_amount, input.total_amount);
        assert_eq!(order.total_amount.to_string(), "199.0049");
        assert_eq!(order.items[0].unit_price.to_string(), "120.005");
        assert_eq!(order.items[0].total_price, input.items[0].line_total());
        assert_eq!(order.items[1].total_price.to_string(), "79.0");
        assert_eq!(order.shipping_address, input.shipping_address);

        let reloaded = OrderHistory::load(storage);
        assert_eq!(
            reloaded.get_order(&receipt.order_id).unwrap().total_amount,
            input.total_amount
        );
    }

    #[tokio::test]
    async fn test_backend_error_status_falls_back() {
        let base = testing::spawn_backend(Router::new().route(
            "/api/orders/",
            post(|| async { (StatusCode::BAD_REQUEST, "{\"items\":[\"invalid\"]}") }),
        ))
        .await;
        let (pipeline, mut history) = setup(&base, Some("tok"));

        let receipt = pipeline.create_order(&mut history, request("100")).await;
        assert_eq!(receipt.source, OrderSource::LocalFallback);
        assert_eq!(history.all_orders().len(), 1);
    }

    #[tokio::test]
    async fn test_response_without_id_falls_back() {
        let base = testing::spawn_backend(Router::new().route(
            "/api/orders/",
            post(|| async { Json(json!({ "status": "ok" })) }),
        ))
        .await;
        let (pipeline, mut history) = setup(&base, Some("tok"));

        let receipt = pipeline.create_order(&mut history, request("100")).await;
        assert!(receipt.order_id.is_local());
    }

    #[test]
    fn test_local_order_id_shape() {
        let now = Utc::now();
        let id = local_order_id(now);
        let rest = id.as_str().strip_prefix("ORD-").unwrap();
        let (millis, suffix) = rest.split_once('-').unwrap();
        assert_eq!(millis, now.timestamp_millis().to_string());
        assert_eq!(suffix.len(), LOCAL_SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_declined_warranty_is_not_sent() {
        let payload = build_payload(
            &request("10").with_warranty(WarrantyInfo::declined()).with_notes("  "),
        );
        assert!(!payload.warranty_accepted);
        assert!(payload.warranty_client_name.is_none());
        assert!(payload.notes.is_none());
    }
}
