//! Storage seam for cart persistence.

use async_trait::async_trait;
use secrecy::SecretString;

use gadget_grove_core::{CartItemId, ProductId, UserId};
use gadget_grove_remote_store::{StoreClient, StoreError, rows};

/// Port for the `cart_items` table.
///
/// The production adapter issues remote CRUD under the identity's access
/// token (row-level security scopes every call to that user); the in-memory
/// fixture backs the unit tests.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// All of `user`'s cart rows, joined with their product data.
    async fn fetch_items(&self, user: &UserId) -> Result<Vec<rows::CartItemRow>, StoreError>;

    /// The row for `(user, product)`, if one exists.
    async fn find_item(
        &self,
        user: &UserId,
        product: &ProductId,
    ) -> Result<Option<rows::CartItemRow>, StoreError>;

    /// Insert a new row.
    async fn insert_item(&self, item: rows::NewCartItem) -> Result<(), StoreError>;

    /// Set the quantity of an existing row.
    async fn update_quantity(&self, id: &CartItemId, quantity: u32) -> Result<(), StoreError>;

    /// Delete a row by id.
    async fn delete_item(&self, id: &CartItemId) -> Result<(), StoreError>;

    /// Delete all of `user`'s rows.
    async fn clear_items(&self, user: &UserId) -> Result<(), StoreError>;
}

/// Production adapter over the remote store's data plane.
pub struct RemoteCartStore {
    store: StoreClient,
    access_token: SecretString,
}

impl RemoteCartStore {
    /// Create an adapter acting as the identity behind `access_token`.
    #[must_use]
    pub const fn new(store: StoreClient, access_token: SecretString) -> Self {
        Self {
            store,
            access_token,
        }
    }

    const fn token(&self) -> Option<&SecretString> {
        Some(&self.access_token)
    }
}

#[async_trait]
impl CartStore for RemoteCartStore {
    async fn fetch_items(&self, user: &UserId) -> Result<Vec<rows::CartItemRow>, StoreError> {
        self.store
            .from(rows::CART_ITEMS_TABLE)
            .select("*,products(*)")
            .eq("user_id", user)
            .fetch(self.token())
            .await
    }

    async fn find_item(
        &self,
        user: &UserId,
        product: &ProductId,
    ) -> Result<Option<rows::CartItemRow>, StoreError> {
        let matches: Vec<rows::CartItemRow> = self
            .store
            .from(rows::CART_ITEMS_TABLE)
            .select("*")
            .eq("user_id", user)
            .eq("product_id", product)
            .fetch(self.token())
            .await?;
        Ok(matches.into_iter().next())
    }

    async fn insert_item(&self, item: rows::NewCartItem) -> Result<(), StoreError> {
        self.store
            .from(rows::CART_ITEMS_TABLE)
            .insert(&item, self.token())
            .await
    }

    async fn update_quantity(&self, id: &CartItemId, quantity: u32) -> Result<(), StoreError> {
        self.store
            .from(rows::CART_ITEMS_TABLE)
            .eq("id", id)
            .update(&rows::CartItemPatch { quantity }, self.token())
            .await
    }

    async fn delete_item(&self, id: &CartItemId) -> Result<(), StoreError> {
        self.store
            .from(rows::CART_ITEMS_TABLE)
            .eq("id", id)
            .delete(self.token())
            .await
    }

    async fn clear_items(&self, user: &UserId) -> Result<(), StoreError> {
        self.store
            .from(rows::CART_ITEMS_TABLE)
            .eq("user_id", user)
            .delete(self.token())
            .await
    }
}

/// In-memory cart table for unit tests.
///
/// Records every call so tests can assert that an operation stayed local.
#[cfg(test)]
pub(crate) mod fixture {
    use std::sync::Mutex;

    use super::{CartItemId, CartStore, ProductId, StoreError, UserId, async_trait, rows};

    #[derive(Default)]
    pub struct InMemoryCartStore {
        pub rows: Mutex<Vec<rows::CartItemRow>>,
        pub products: Mutex<Vec<rows::ProductRow>>,
        pub calls: Mutex<Vec<String>>,
        pub fail_next: Mutex<bool>,
        next_id: Mutex<u32>,
    }

    impl InMemoryCartStore {
        pub fn with_products(products: Vec<rows::ProductRow>) -> Self {
            Self {
                products: Mutex::new(products),
                ..Self::default()
            }
        }

        /// Make the next remote operation fail with a store error.
        pub fn fail_next(&self) {
            *self.fail_next.lock().expect("lock") = true;
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().expect("lock").len()
        }

        fn record(&self, call: &str) -> Result<(), StoreError> {
            self.calls.lock().expect("lock").push(call.to_string());
            if std::mem::take(&mut *self.fail_next.lock().expect("lock")) {
                return Err(StoreError::Api {
                    status: 500,
                    message: "injected failure".to_string(),
                });
            }
            Ok(())
        }

        fn join(&self, mut row: rows::CartItemRow) -> rows::CartItemRow {
            row.product = self
                .products
                .lock()
                .expect("lock")
                .iter()
                .find(|p| p.id == row.product_id)
                .cloned();
            row
        }
    }

    #[async_trait]
    impl CartStore for InMemoryCartStore {
        async fn fetch_items(&self, user: &UserId) -> Result<Vec<rows::CartItemRow>, StoreError> {
            self.record("fetch_items")?;
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .iter()
                .filter(|row| &row.user_id == user)
                .cloned()
                .map(|row| self.join(row))
                .collect())
        }

        async fn find_item(
            &self,
            user: &UserId,
            product: &ProductId,
        ) -> Result<Option<rows::CartItemRow>, StoreError> {
            self.record("find_item")?;
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .iter()
                .find(|row| &row.user_id == user && &row.product_id == product)
                .cloned())
        }

        async fn insert_item(&self, item: rows::NewCartItem) -> Result<(), StoreError> {
            self.record("insert_item")?;
            let mut next_id = self.next_id.lock().expect("lock");
            *next_id += 1;
            self.rows.lock().expect("lock").push(rows::CartItemRow {
                id: CartItemId::new(format!("ci-{}", *next_id)),
                user_id: item.user_id,
                product_id: item.product_id,
                quantity: item.quantity,
                product: None,
            });
            Ok(())
        }

        async fn update_quantity(&self, id: &CartItemId, quantity: u32) -> Result<(), StoreError> {
            self.record("update_quantity")?;
            if let Some(row) = self
                .rows
                .lock()
                .expect("lock")
                .iter_mut()
                .find(|row| &row.id == id)
            {
                row.quantity = quantity;
            }
            Ok(())
        }

        async fn delete_item(&self, id: &CartItemId) -> Result<(), StoreError> {
            self.record("delete_item")?;
            self.rows.lock().expect("lock").retain(|row| &row.id != id);
            Ok(())
        }

        async fn clear_items(&self, user: &UserId) -> Result<(), StoreError> {
            self.record("clear_items")?;
            self.rows
                .lock()
                .expect("lock")
                .retain(|row| &row.user_id != user);
            Ok(())
        }
    }
}
