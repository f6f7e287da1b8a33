//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Health check
//!
//! # Auth
//! POST /auth/login              - Sign in (role-gated; non-admins are signed
//!                                 back out before the error is reported)
//! POST /auth/logout             - Sign out
//!
//! # Products (require the admin gate on every request)
//! GET    /products              - Full catalog, newest first
//! GET    /products/{id}         - Single row (edit pre-population)
//! POST   /products              - Validated insert, then list re-fetch
//! PUT    /products/{id}         - Validated update, then list re-fetch
//! DELETE /products/{id}?confirm=true - Delete behind explicit confirmation
//! ```

pub mod auth;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::get_one)
                .put(products::update)
                .delete(products::delete),
        )
}
