//! End-to-end checkout through the storefront HTTP service.
//!
//! Covers the remote path, the local fallback when the backend refuses the
//! order, and the gate for shoppers without a token.

use axum::http::StatusCode;
use pneushop_integration_tests::{
    FakeBackend, TestStorefront, checkout_form, tire, unreachable_backend,
};
use serde_json::json;

#[tokio::test]
async fn test_remote_checkout_uses_backend_id() {
    let backend = FakeBackend::start(vec![tire(17, "245.500", 6), tire(18, "99.90", 2)]).await;
    let storefront = TestStorefront::start(&backend.base_url).await;
    storefront.log_in("eyJ.integration");

    let (status, added) = storefront
        .post("/cart/add", &json!({ "product_id": "17", "quantity": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["quantity"], 2);
    assert_eq!(added["cart"]["items"][0]["specification"], "205/55 R16 91V");

    let (_, added) = storefront
        .post("/cart/add", &json!({ "product_id": "18", "quantity": 5 }))
        .await;
    assert_eq!(added["quantity"], 2);

    let (status, summary) = storefront.get("/checkout/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["subtotal"], "690.80");
    assert_eq!(summary["shipping"], "0.00");
    assert_eq!(summary["tax"], "131.25");
    assert_eq!(summary["total"], "822.05");

    let (status, receipt) = storefront.post("/checkout", &checkout_form()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["source"], "remote");
    assert_eq!(receipt["orderId"], "1000");

    let submitted = backend.received_orders();
    assert_eq!(submitted.len(), 1);
    let body = &submitted[0];
    assert_eq!(body["total_amount"], "822.05");
    assert_eq!(body["items"][0]["unit_price"], "245.50");
    assert_eq!(body["items"][0]["total_price"], "491.00");
    assert_eq!(body["billing_address"], body["shipping_address"]);
    assert_eq!(body["shipping_address"]["postal_code"], "4000");
    assert_eq!(body["warranty_accepted"], true);
    assert_eq!(body["warranty_vehicle_registration"], "210 TU 1234");
    assert_eq!(body["notes"], "Livrer le matin");

    let (_, cart) = storefront.get("/cart").await;
    assert_eq!(cart["totalItems"], 0);

    let (status, order) = storefront.get("/orders/1000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["source"], "remote");
}

#[tokio::test]
async fn test_rejected_order_falls_back_locally() {
    let backend = FakeBackend::rejecting_orders(vec![tire(17, "100", 4)]).await;
    let storefront = TestStorefront::start(&backend.base_url).await;
    storefront.log_in("eyJ.integration");

    storefront
        .post("/cart/add", &json!({ "product_id": "17", "quantity": 2 }))
        .await;

    let (status, receipt) = storefront.post("/checkout", &checkout_form()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["source"], "local_fallback");
    let order_id = receipt["orderId"].as_str().unwrap().to_string();
    assert!(order_id.starts_with("ORD-"));

    let (_, cart) = storefront.get("/cart").await;
    assert_eq!(cart["totalItems"], 0);

    let (_, order) = storefront.get(&format!("/orders/{order_id}")).await;
    assert_eq!(order["items"][0]["quantity"], 2);
    assert_eq!(order["shippingAddress"]["city"], "Sousse");
    assert_eq!(order["totalAmount"], "238.00");
    assert!(backend.received_orders().is_empty());
}

#[tokio::test]
async fn test_checkout_requires_token() {
    let backend = FakeBackend::start(vec![tire(17, "100", 4)]).await;
    let storefront = TestStorefront::start(&backend.base_url).await;

    let (status, _) = storefront.get("/checkout/summary").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    storefront
        .post("/cart/add", &json!({ "product_id": "17" }))
        .await;
    let (status, body) = storefront.post("/checkout", &checkout_form()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please log in to place an order");

    let (_, cart) = storefront.get("/cart").await;
    assert_eq!(cart["totalItems"], 1);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let backend = FakeBackend::start(Vec::new()).await;
    let storefront = TestStorefront::start(&backend.base_url).await;

    let (status, _) = storefront
        .post("/cart/add", &json!({ "product_id": "404" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unreachable_backend_still_places_order() {
    let backend = FakeBackend::start(vec![tire(17, "60", 4)]).await;
    let storefront = TestStorefront::start(&backend.base_url).await;
    storefront.log_in("eyJ.integration");
    storefront
        .post("/cart/add", &json!({ "product_id": "17", "quantity": 1 }))
        .await;

    // Same data directory, backend gone.
    let offline = storefront.restart(&unreachable_backend()).await;

    let (status, receipt) = offline.post("/checkout", &checkout_form()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["source"], "local_fallback");

    let (_, account) = offline.get("/account/orders").await;
    assert_eq!(account.as_array().unwrap().len(), 1);
}
