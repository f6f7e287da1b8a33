//! Row types for the tables this system consumes.
//!
//! These mirror the remote schema exactly; everything the client invents at
//! read time (synthetic variants, totals) lives outside this module so the
//! persisted shape stays obvious.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gadget_grove_core::{CartItemId, Price, ProductId, Role, UserId};

/// Catalog table.
pub const PRODUCTS_TABLE: &str = "products";
/// Cart line-item table, row-level-secured per user.
pub const CART_ITEMS_TABLE: &str = "cart_items";
/// Profile table; consulted solely for the admin role gate.
pub const PROFILES_TABLE: &str = "profiles";

/// A catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: Option<String>,
    pub image_url_2: Option<String>,
    pub image_url_3: Option<String>,
    pub image_url_4: Option<String>,
    pub image_url_5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProductRow {
    /// All image references present on the row, in column order.
    #[must_use]
    pub fn images(&self) -> Vec<&str> {
        [
            &self.image_url,
            &self.image_url_2,
            &self.image_url_3,
            &self.image_url_4,
            &self.image_url_5,
        ]
        .into_iter()
        .filter_map(|url| url.as_deref())
        .collect()
    }
}

/// Insert payload for `products`.
///
/// The id is optional: the admin editor lets the store generate one, the
/// seeding tool pins known ids.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url_3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url_4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url_5: Option<String>,
}

/// Update payload for `products`; the editor always writes the full form.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPatch {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: Option<String>,
}

/// A cart line item, optionally joined with its product.
///
/// The `products` field is populated by the embedded join
/// (`select=*,products(*)`) and is `None` when the referenced product has
/// been removed from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemRow {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default, rename = "products")]
    pub product: Option<ProductRow>,
}

/// Insert payload for `cart_items`; the store generates the row id.
#[derive(Debug, Clone, Serialize)]
pub struct NewCartItem {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Update payload for a cart line's quantity.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemPatch {
    pub quantity: u32,
}

/// A profile row; only the role matters to this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: UserId,
    #[serde(default)]
    pub role: Role,
}

/// Update payload for a profile's role.
#[derive(Debug, Clone, Serialize)]
pub struct RolePatch {
    pub role: Role,
}
