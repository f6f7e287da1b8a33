//! Catalog route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::Product;
use crate::state::AppState;

/// Catalog listing response.
#[derive(Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

/// `GET /products` - the full catalog, enriched with synthetic variants.
///
/// A remote failure yields an empty list rather than an error; the reader
/// logs the condition.
#[instrument(skip_all)]
pub async fn list(State(state): State<AppState>) -> Json<ProductsResponse> {
    let products = state.catalog().fetch_all().await;
    Json(ProductsResponse { products })
}
