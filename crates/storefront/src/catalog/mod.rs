//! Product catalog reading.
//!
//! One-shot fetch of the catalog with synthetic variant enrichment applied
//! after the rows arrive. On failure the reader exposes an empty list and
//! logs the condition; there is no retry and no partial-result merging.

mod variants;

pub use variants::{VariantGroup, synthetic_variant_groups};

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;

use gadget_grove_core::{Price, ProductId};
use gadget_grove_remote_store::{StoreClient, StoreError, rows};

/// A catalog product as served to clients: the persisted row plus the
/// read-time variant groups.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub images: Vec<String>,
    /// Synthetic; never persisted.
    pub variant_groups: Vec<VariantGroup>,
}

impl From<rows::ProductRow> for Product {
    fn from(row: rows::ProductRow) -> Self {
        let variant_groups = synthetic_variant_groups(&row.name);
        Self {
            images: row.images().into_iter().map(str::to_owned).collect(),
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            variant_groups,
        }
    }
}

/// Storage seam for catalog reads.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch every catalog row.
    async fn fetch_products(&self) -> Result<Vec<rows::ProductRow>, StoreError>;

    /// Fetch a single catalog row by id.
    async fn fetch_product(&self, id: &ProductId) -> Result<rows::ProductRow, StoreError>;
}

/// Production adapter: catalog rows are publicly readable, so requests go
/// out under the anon key.
#[async_trait]
impl CatalogStore for StoreClient {
    async fn fetch_products(&self) -> Result<Vec<rows::ProductRow>, StoreError> {
        self.from(rows::PRODUCTS_TABLE).select("*").fetch(None).await
    }

    async fn fetch_product(&self, id: &ProductId) -> Result<rows::ProductRow, StoreError> {
        self.from(rows::PRODUCTS_TABLE)
            .select("*")
            .eq("id", id)
            .fetch_one(None)
            .await
    }
}

/// Reader over the catalog table.
#[derive(Clone)]
pub struct CatalogReader {
    store: Arc<dyn CatalogStore>,
}

impl CatalogReader {
    /// Create a reader over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Fetch the full catalog, enriched.
    ///
    /// A remote failure yields an empty list; the condition is logged rather
    /// than surfaced.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Vec<Product> {
        match self.store.fetch_products().await {
            Ok(rows) => rows.into_iter().map(Product::from).collect(),
            Err(err) => {
                tracing::error!(error = %err, "Failed to fetch product catalog");
                Vec::new()
            }
        }
    }

    /// Fetch a single product, enriched.
    ///
    /// # Errors
    ///
    /// Returns the store error, including [`StoreError::NotFound`] for an
    /// unknown id.
    pub async fn fetch_one(&self, id: &ProductId) -> Result<Product, StoreError> {
        self.store.fetch_product(id).await.map(Product::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rust_decimal::Decimal;

    struct FailingCatalog;

    #[async_trait]
    impl CatalogStore for FailingCatalog {
        async fn fetch_products(&self) -> Result<Vec<rows::ProductRow>, StoreError> {
            Err(StoreError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }

        async fn fetch_product(&self, id: &ProductId) -> Result<rows::ProductRow, StoreError> {
            Err(StoreError::NotFound(format!("products id=eq.{id}")))
        }
    }

    struct FixedCatalog(Vec<rows::ProductRow>);

    #[async_trait]
    impl CatalogStore for FixedCatalog {
        async fn fetch_products(&self) -> Result<Vec<rows::ProductRow>, StoreError> {
            Ok(self.0.clone())
        }

        async fn fetch_product(&self, id: &ProductId) -> Result<rows::ProductRow, StoreError> {
            self.0
                .iter()
                .find(|row| &row.id == id)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(format!("products id=eq.{id}")))
        }
    }

    fn laptop_row() -> rows::ProductRow {
        rows::ProductRow {
            id: ProductId::new("p-1"),
            name: "Lenovo ThinkPad X1".to_string(),
            description: "Business laptop.".to_string(),
            price: Price::new(Decimal::new(1799_99, 2)).expect("price"),
            image_url: Some("https://images.example.com/x1.jpg".to_string()),
            image_url_2: None,
            image_url_3: None,
            image_url_4: None,
            image_url_5: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn fetch_all_enriches_every_product() {
        let reader = CatalogReader::new(Arc::new(FixedCatalog(vec![laptop_row()])));
        let products = reader.fetch_all().await;

        assert_eq!(products.len(), 1);
        let product = products.first().expect("product");
        assert_eq!(product.variant_groups, synthetic_variant_groups(&product.name));
    }

    #[tokio::test]
    async fn fetch_all_failure_exposes_an_empty_list() {
        let reader = CatalogReader::new(Arc::new(FailingCatalog));
        assert!(reader.fetch_all().await.is_empty());
    }

    #[tokio::test]
    async fn enrichment_never_touches_persisted_fields() {
        let row = laptop_row();
        let reader = CatalogReader::new(Arc::new(FixedCatalog(vec![row.clone()])));
        let product = reader
            .fetch_one(&ProductId::new("p-1"))
            .await
            .expect("product");

        assert_eq!(product.id, row.id);
        assert_eq!(product.name, row.name);
        assert_eq!(product.price, row.price);
        assert!(!product.variant_groups.is_empty());
    }

    #[tokio::test]
    async fn fetch_one_surfaces_not_found() {
        let reader = CatalogReader::new(Arc::new(FixedCatalog(vec![])));
        let result = reader.fetch_one(&ProductId::new("missing")).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
