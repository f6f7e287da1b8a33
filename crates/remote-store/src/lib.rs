//! Remote store client for Gadget Grove.
//!
//! The hosted backend (managed Postgres + auth behind a REST interface, with
//! row-level security keyed by the authenticated user) is the system of
//! record for all persistent state. This crate is the only place that talks
//! to it. Two clients share the conventions:
//!
//! - [`StoreClient`] - per-table CRUD with equality filters against the data
//!   plane (`/rest/v1/<table>`)
//! - [`AuthClient`] - password sessions against the auth plane (`/auth/v1/*`)
//!
//! Every request carries the project `apikey` header plus a bearer token:
//! the caller's access token when acting as a signed-in user, the anon key
//! otherwise, or the service-role key for operational tools that bypass
//! row-level security.
//!
//! # Example
//!
//! ```rust,ignore
//! use gadget_grove_remote_store::{AuthClient, StoreClient, rows};
//!
//! let store = StoreClient::new("https://project.example.co", anon_key);
//! let products: Vec<rows::ProductRow> = store
//!     .from(rows::PRODUCTS_TABLE)
//!     .select("*")
//!     .fetch(None)
//!     .await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod auth;
mod client;
mod error;
pub mod rows;

pub use auth::{AuthClient, AuthError, AuthUser, Session, SignUp, SignUpProfile};
pub use client::{StoreClient, TableQuery};
pub use error::StoreError;
