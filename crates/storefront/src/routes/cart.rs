//! Cart route handlers.
//!
//! Every mutation answers with the refreshed cart view and exactly one
//! transient notice.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use gadget_grove_core::{CartItemId, Price, ProductId};
use gadget_grove_remote_store::{StoreError, rows};

use crate::cart::{CartService, CartTotals, SelectedVariants};
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::models::Notice;
use crate::state::AppState;

/// One cart line as served to clients.
#[derive(Serialize)]
pub struct CartItemView {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: u32,
    /// Denormalized from the product join; absent if the product vanished.
    pub name: Option<String>,
    pub price: Option<Price>,
    pub line_total: Decimal,
    pub image: Option<String>,
}

impl From<&rows::CartItemRow> for CartItemView {
    fn from(row: &rows::CartItemRow) -> Self {
        let product = row.product.as_ref();
        Self {
            id: row.id.clone(),
            product_id: row.product_id.clone(),
            quantity: row.quantity,
            name: product.map(|p| p.name.clone()),
            price: product.map(|p| p.price),
            line_total: product.map_or(Decimal::ZERO, |p| p.price.line_total(row.quantity)),
            image: product.and_then(|p| p.image_url.clone()),
        }
    }
}

/// The cart with its derived totals.
#[derive(Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub totals: CartTotals,
    pub is_loading: bool,
}

impl CartView {
    fn snapshot(cart: &CartService) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            totals: cart.totals(),
            is_loading: cart.is_loading(),
        }
    }
}

/// Mutation response: one notice plus the refreshed cart.
#[derive(Serialize)]
pub struct CartMutationResponse {
    pub notice: Notice,
    pub cart: CartView,
    /// Echo of the client's variant selection; display-only, never stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_variants: Option<SelectedVariants>,
}

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub selected_variants: Option<SelectedVariants>,
}

const fn default_quantity() -> u32 {
    1
}

#[derive(Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

/// `GET /cart` - refresh from the remote store and return the mirror.
#[instrument(skip_all)]
pub async fn get_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartView>> {
    let context = state.context_for(&user).await;
    context.cart.refresh().await?;
    Ok(Json(CartView::snapshot(&context.cart)))
}

/// `POST /cart/items` - add a product to the cart.
#[instrument(skip_all, fields(product_id = %request.product_id))]
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartMutationResponse>> {
    let product = state
        .catalog()
        .fetch_one(&request.product_id)
        .await
        .map_err(|err| match err {
            StoreError::NotFound(_) => {
                AppError::NotFound(format!("product {}", request.product_id))
            }
            other => AppError::Store(other),
        })?;

    let context = state.context_for(&user).await;
    context
        .cart
        .add_to_cart(&product, request.quantity, request.selected_variants.as_ref())
        .await?;

    Ok(Json(CartMutationResponse {
        notice: Notice::success("Added to cart"),
        cart: CartView::snapshot(&context.cart),
        selected_variants: request.selected_variants,
    }))
}

/// `POST /cart/items/{id}/quantity` - set a line's quantity; zero removes.
#[instrument(skip_all, fields(item_id = %item_id))]
pub async fn update_quantity(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(item_id): Path<CartItemId>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartMutationResponse>> {
    let context = state.context_for(&user).await;
    context.cart.update_quantity(&item_id, request.quantity).await?;

    let message = if request.quantity == 0 {
        "Item removed from cart"
    } else {
        "Quantity updated"
    };
    Ok(Json(CartMutationResponse {
        notice: Notice::success(message),
        cart: CartView::snapshot(&context.cart),
        selected_variants: None,
    }))
}

/// `DELETE /cart/items/{id}` - remove a line.
#[instrument(skip_all, fields(item_id = %item_id))]
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(item_id): Path<CartItemId>,
) -> Result<Json<CartMutationResponse>> {
    let context = state.context_for(&user).await;
    context.cart.remove_from_cart(&item_id).await?;

    Ok(Json(CartMutationResponse {
        notice: Notice::success("Item removed from cart"),
        cart: CartView::snapshot(&context.cart),
        selected_variants: None,
    }))
}

/// `POST /checkout` - clear the cart and confirm the order.
///
/// There is no payment or stock verification; checkout is defined as
/// "clear the cart and show a confirmation".
#[instrument(skip_all)]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartMutationResponse>> {
    let context = state.context_for(&user).await;
    context.cart.clear_cart().await?;

    Ok(Json(CartMutationResponse {
        notice: Notice::success("Order placed successfully"),
        cart: CartView::snapshot(&context.cart),
        selected_variants: None,
    }))
}
