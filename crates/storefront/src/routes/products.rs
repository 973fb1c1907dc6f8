//! Catalog route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::backend::types::{ProductFilters, ProductPage};
use crate::error::Result;
use crate::state::AppState;

/// Paging and search text; filters are read from the same query string.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub page: Option<u32>,
    pub q: Option<String>,
}

/// Browse the catalog, or search it when `q` is non-blank.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
    Query(filters): Query<ProductFilters>,
) -> Result<Json<ProductPage>> {
    // Release the session before the network call.
    let backend = state.session().await.backend().clone();

    let page = match params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => backend.search_products(query, &filters).await?,
        None => backend.list_products(params.page.unwrap_or(1), &filters).await?,
    };
    Ok(Json(page))
}
