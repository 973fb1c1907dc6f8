//! Fixtures shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use rust_decimal::Decimal;
use secrecy::SecretString;

use pneushop_core::{Product, ProductId, ShippingAddress};

use crate::auth::TokenStore;
use crate::backend::BackendClient;
use crate::config::BackendConfig;
use crate::storage::MemoryStorage;

/// Serve `router` on an ephemeral port and return the `/api/` base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api/")
}

/// A base URL nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/")
}

pub fn backend(base_url: &str) -> BackendClient {
    BackendClient::new(&BackendConfig::new(base_url, Duration::from_secs(60)).unwrap()).unwrap()
}

/// Token store holding `token`, or empty for guests.
pub fn tokens(storage: &Arc<MemoryStorage>, token: Option<&str>) -> TokenStore {
    let tokens = TokenStore::new(storage.clone());
    if let Some(token) = token {
        tokens
            .set_access_token(&SecretString::from(token.to_string()))
            .unwrap();
    }
    tokens
}

pub fn product(id: &str, price: &str, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Primacy 4 {id}"),
        brand: "Michelin".to_string(),
        model: "205/55R16".to_string(),
        price: Decimal::from_str(price).unwrap(),
        old_price: None,
        stock,
        in_stock: stock > 0,
        specifications: None,
    }
}

pub fn address() -> ShippingAddress {
    ShippingAddress {
        first_name: "Leila".to_string(),
        last_name: "Ben Salah".to_string(),
        company: None,
        address: "4 avenue Habib Bourguiba".to_string(),
        city: "Sousse".to_string(),
        postal_code: "4000".to_string(),
        country: "Tunisie".to_string(),
        phone: "+216 73 222 333".to_string(),
    }
}
