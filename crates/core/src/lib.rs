//! Gadget Grove Core - Shared types library.
//!
//! This crate provides common types used across all Gadget Grove components:
//! - `storefront` - Public-facing e-commerce site
//! - `admin` - Product management panel
//! - `cli` - Command-line tools for seeding and account management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no remote
//! store access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
