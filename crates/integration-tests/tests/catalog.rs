//! Catalog browsing through the storefront HTTP service.

use axum::http::StatusCode;
use pneushop_integration_tests::{FakeBackend, TestStorefront, tire};
use serde_json::json;

#[tokio::test]
async fn test_browse_then_add_from_listing() {
    let backend = FakeBackend::start(vec![tire(21, "175.00", 3), tire(20, "132.40", 0)]).await;
    let storefront = TestStorefront::start(&backend.base_url).await;

    let (status, page) = storefront.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 2);
    assert_eq!(page["products"][0]["id"], "20");
    assert_eq!(page["products"][0]["inStock"], false);

    let (_, page) = storefront.get("/products?inStock=true&brand=Michelin").await;
    assert_eq!(page["count"], 1);
    let id = page["products"][0]["id"].as_str().unwrap().to_string();

    let (status, added) = storefront
        .post("/cart/add", &json!({ "product_id": id, "quantity": 5 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["quantity"], 3);
    assert_eq!(added["cart"]["totalPrice"], "525.00");
}

#[tokio::test]
async fn test_unknown_season_filter_is_rejected() {
    let backend = FakeBackend::start(Vec::new()).await;
    let storefront = TestStorefront::start(&backend.base_url).await;

    let (status, _) = storefront.get("/products?season=printemps").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
