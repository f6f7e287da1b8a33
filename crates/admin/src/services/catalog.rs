//! Catalog editing.
//!
//! The editor validates before it mutates and re-fetches the full list after
//! every successful change instead of patching anything locally, so the view
//! it returns always reflects the store.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use tracing::instrument;

use gadget_grove_core::ProductId;
use gadget_grove_remote_store::{StoreClient, StoreError, rows};

use crate::validation::{ProductForm, ValidationError};

/// Errors from editor operations.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Form validation failed; no remote call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Delete was requested without the explicit confirmation step.
    #[error("deletion requires confirmation")]
    ConfirmationRequired,

    /// Remote CRUD failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Port for the `products` table as the editor uses it.
///
/// Every call carries the signed-in admin's access token; write permission
/// is the remote side's row-level security saying so, not anything local.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All catalog rows, newest first.
    async fn list(&self, access_token: &SecretString) -> Result<Vec<rows::ProductRow>, StoreError>;

    /// A single catalog row.
    async fn get(
        &self,
        access_token: &SecretString,
        id: &ProductId,
    ) -> Result<rows::ProductRow, StoreError>;

    /// Insert a row.
    async fn insert(
        &self,
        access_token: &SecretString,
        row: rows::NewProduct,
    ) -> Result<(), StoreError>;

    /// Update a row.
    async fn update(
        &self,
        access_token: &SecretString,
        id: &ProductId,
        patch: rows::ProductPatch,
    ) -> Result<(), StoreError>;

    /// Delete a row.
    async fn delete(&self, access_token: &SecretString, id: &ProductId)
    -> Result<(), StoreError>;
}

/// Production adapter over the remote store's data plane.
pub struct RemoteProductStore {
    store: StoreClient,
}

impl RemoteProductStore {
    #[must_use]
    pub const fn new(store: StoreClient) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProductStore for RemoteProductStore {
    async fn list(&self, access_token: &SecretString) -> Result<Vec<rows::ProductRow>, StoreError> {
        self.store
            .from(rows::PRODUCTS_TABLE)
            .select("*")
            .order_desc("created_at")
            .fetch(Some(access_token))
            .await
    }

    async fn get(
        &self,
        access_token: &SecretString,
        id: &ProductId,
    ) -> Result<rows::ProductRow, StoreError> {
        self.store
            .from(rows::PRODUCTS_TABLE)
            .select("*")
            .eq("id", id)
            .fetch_one(Some(access_token))
            .await
    }

    async fn insert(
        &self,
        access_token: &SecretString,
        row: rows::NewProduct,
    ) -> Result<(), StoreError> {
        self.store
            .from(rows::PRODUCTS_TABLE)
            .insert(&row, Some(access_token))
            .await
    }

    async fn update(
        &self,
        access_token: &SecretString,
        id: &ProductId,
        patch: rows::ProductPatch,
    ) -> Result<(), StoreError> {
        self.store
            .from(rows::PRODUCTS_TABLE)
            .eq("id", id)
            .update(&patch, Some(access_token))
            .await
    }

    async fn delete(
        &self,
        access_token: &SecretString,
        id: &ProductId,
    ) -> Result<(), StoreError> {
        self.store
            .from(rows::PRODUCTS_TABLE)
            .eq("id", id)
            .delete(Some(access_token))
            .await
    }
}

/// The catalog editor.
pub struct CatalogEditor {
    store: Arc<dyn ProductStore>,
}

impl CatalogEditor {
    /// Create an editor over its storage port.
    #[must_use]
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// The full catalog, newest first.
    ///
    /// # Errors
    ///
    /// Returns the store error from the list fetch.
    pub async fn list(
        &self,
        access_token: &SecretString,
    ) -> Result<Vec<rows::ProductRow>, EditorError> {
        Ok(self.store.list(access_token).await?)
    }

    /// A single row, for pre-populating the edit form.
    ///
    /// # Errors
    ///
    /// Returns the store error, including `NotFound` for an unknown id.
    pub async fn get(
        &self,
        access_token: &SecretString,
        id: &ProductId,
    ) -> Result<rows::ProductRow, EditorError> {
        Ok(self.store.get(access_token, id).await?)
    }

    /// Validate and insert a product, then re-fetch the catalog.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before any remote call.
    #[instrument(skip_all)]
    pub async fn create(
        &self,
        access_token: &SecretString,
        form: &ProductForm,
    ) -> Result<Vec<rows::ProductRow>, EditorError> {
        let valid = form.validate()?;

        self.store
            .insert(
                access_token,
                rows::NewProduct {
                    id: None,
                    name: valid.name,
                    description: valid.description,
                    price: valid.price,
                    image_url: Some(valid.image_url),
                    image_url_2: None,
                    image_url_3: None,
                    image_url_4: None,
                    image_url_5: None,
                },
            )
            .await?;

        Ok(self.store.list(access_token).await?)
    }

    /// Validate and update a product, then re-fetch the catalog.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before any remote call.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn update(
        &self,
        access_token: &SecretString,
        id: &ProductId,
        form: &ProductForm,
    ) -> Result<Vec<rows::ProductRow>, EditorError> {
        let valid = form.validate()?;

        self.store
            .update(
                access_token,
                id,
                rows::ProductPatch {
                    name: valid.name,
                    description: valid.description,
                    price: valid.price,
                    image_url: Some(valid.image_url),
                },
            )
            .await?;

        Ok(self.store.list(access_token).await?)
    }

    /// Delete a product behind an explicit confirmation, then re-fetch.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ConfirmationRequired`] (before any remote
    /// call) unless `confirmed` is set.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn delete(
        &self,
        access_token: &SecretString,
        id: &ProductId,
        confirmed: bool,
    ) -> Result<Vec<rows::ProductRow>, EditorError> {
        if !confirmed {
            return Err(EditorError::ConfirmationRequired);
        }

        self.store.delete(access_token, id).await?;
        Ok(self.store.list(access_token).await?)
    }
}
