//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check
//!
//! # Catalog
//! GET  /products                    - Product listing (with synthetic variants)
//!
//! # Auth
//! POST /auth/register               - Create an account
//! POST /auth/login                  - Sign in
//! POST /auth/logout                 - Sign out (tears down the cart mirror)
//!
//! # Cart (requires auth)
//! GET    /cart                      - Refresh + current cart with totals
//! POST   /cart/items                - Add a product to the cart
//! POST   /cart/items/{id}/quantity  - Update a line's quantity
//! DELETE /cart/items/{id}           - Remove a line
//!
//! # Checkout
//! POST /checkout                    - Clear the cart, confirm the order
//! ```

pub mod auth;
pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the storefront router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/cart", get(cart::get_cart))
        .route("/cart/items", post(cart::add_item))
        .route("/cart/items/{id}/quantity", post(cart::update_quantity))
        .route("/cart/items/{id}", delete(cart::remove_item))
        .route("/checkout", post(cart::checkout))
}
