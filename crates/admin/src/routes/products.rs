//! Product management route handlers.
//!
//! Every mutation answers with the re-fetched catalog and one notice; the
//! editor never patches a list locally.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use gadget_grove_core::ProductId;
use gadget_grove_remote_store::rows;

use crate::error::Result;
use crate::middleware::auth::RequireAdmin;
use crate::models::Notice;
use crate::state::AppState;
use crate::validation::ProductForm;

#[derive(Serialize)]
pub struct ProductListResponse {
    pub products: Vec<rows::ProductRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Deserialize)]
pub struct DeleteQuery {
    /// The explicit confirmation step; deletes without it are rejected.
    #[serde(default)]
    pub confirm: bool,
}

/// `GET /products` - the full catalog, newest first.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<ProductListResponse>> {
    let token = SecretString::from(admin.access_token);
    let products = state.editor().list(&token).await?;
    Ok(Json(ProductListResponse {
        products,
        notice: None,
    }))
}

/// `GET /products/{id}` - a single row, for pre-populating the edit form.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn get_one(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<rows::ProductRow>> {
    let token = SecretString::from(admin.access_token);
    let product = state.editor().get(&token, &id).await?;
    Ok(Json(product))
}

/// `POST /products` - validated insert, then list re-fetch.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(form): Json<ProductForm>,
) -> Result<Json<ProductListResponse>> {
    let token = SecretString::from(admin.access_token);
    let products = state.editor().create(&token, &form).await?;
    Ok(Json(ProductListResponse {
        products,
        notice: Some(Notice::success("Product added successfully")),
    }))
}

/// `PUT /products/{id}` - validated update, then list re-fetch.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(form): Json<ProductForm>,
) -> Result<Json<ProductListResponse>> {
    let token = SecretString::from(admin.access_token);
    let products = state.editor().update(&token, &id, &form).await?;
    Ok(Json(ProductListResponse {
        products,
        notice: Some(Notice::success("Product updated successfully")),
    }))
}

/// `DELETE /products/{id}?confirm=true` - delete behind explicit
/// confirmation, then list re-fetch.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<ProductListResponse>> {
    let token = SecretString::from(admin.access_token);
    let products = state.editor().delete(&token, &id, query.confirm).await?;
    Ok(Json(ProductListResponse {
        products,
        notice: Some(Notice::success("Product deleted successfully")),
    }))
}
