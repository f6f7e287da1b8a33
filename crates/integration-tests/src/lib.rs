//! Integration tests for Gadget Grove.
//!
//! # Running Tests
//!
//! ```bash
//! # Point both servers at a remote store project and start them
//! cargo run -p gadget-grove-storefront &
//! cargo run -p gadget-grove-admin &
//!
//! # Run the ignored integration tests
//! cargo test -p gadget-grove-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart flow over HTTP (register, add, update, checkout)
//! - `admin_products` - Admin gate and catalog CRUD
//!
//! Base URLs default to the local dev ports and can be overridden with
//! `STOREFRONT_BASE_URL` and `ADMIN_BASE_URL`.

use reqwest::Client;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// A client with a cookie store, so the session survives across requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
