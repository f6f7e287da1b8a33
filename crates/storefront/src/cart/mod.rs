//! Cart synchronization.
//!
//! [`CartService`] owns the in-memory list of cart line items for one
//! identity and mirrors it against the remote `cart_items` table. The remote
//! store is the system of record; the mirror is replaced wholesale by
//! refreshes and is never patched ad hoc.
//!
//! # Mutation discipline
//!
//! Mutations are serialized through a per-cart mutex (one in-flight remote
//! mutation at a time), and every successful mutation ends with an
//! idempotent full refresh under the same lock. A failed remote call leaves
//! the pre-operation mirror untouched.

mod store;

pub use store::{CartStore, RemoteCartStore};

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::instrument;

use gadget_grove_core::{CartItemId, VariantGroupId};
use gadget_grove_remote_store::{StoreError, rows};

use crate::catalog::Product;
use crate::services::auth::AuthStateObserver;

/// Variant selections collected in the client, keyed by variant group.
///
/// Display-only: variant groups have no backing storage, so selections are
/// validated and echoed back but never written to the remote store.
pub type SelectedVariants = HashMap<VariantGroupId, String>;

/// Errors surfaced by cart operations.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// Mutations require a signed-in identity.
    #[error("not signed in")]
    NotAuthenticated,

    /// The item id is not in the current cart.
    #[error("cart item not found: {0}")]
    ItemNotFound(CartItemId),

    /// Quantities start at one; zero is expressed as removal.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// A selection referenced a variant group the product does not have.
    #[error("unknown variant group: {0}")]
    UnknownVariantGroup(VariantGroupId),

    /// A selection chose an option the variant group does not offer.
    #[error("variant group {group} has no option '{option}'")]
    UnknownVariantOption {
        group: VariantGroupId,
        option: String,
    },

    /// Remote CRUD failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Derived cart totals, recomputed from the mirror on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    /// Sum of line quantities.
    pub total_items: u32,
    /// Sum of quantity × price; a missing product join counts as zero.
    pub total_price: Decimal,
}

/// The cart synchronizer for one identity.
pub struct CartService {
    store: Arc<dyn CartStore>,
    auth: AuthStateObserver,
    items: RwLock<Vec<rows::CartItemRow>>,
    loading: AtomicBool,
    // Single-flight: one in-flight remote mutation per cart
    mutation: Mutex<()>,
}

impl CartService {
    /// Create a synchronizer bound to an identity's auth observer.
    #[must_use]
    pub fn new(store: Arc<dyn CartStore>, auth: AuthStateObserver) -> Self {
        Self {
            store,
            auth,
            items: RwLock::new(Vec::new()),
            loading: AtomicBool::new(true),
            mutation: Mutex::new(()),
        }
    }

    /// A snapshot of the current mirror.
    #[must_use]
    pub fn items(&self) -> Vec<rows::CartItemRow> {
        self.items.read().expect("cart mirror lock poisoned").clone()
    }

    /// Whether a refresh is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Recompute totals from the mirror.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let items = self.items.read().expect("cart mirror lock poisoned");
        CartTotals {
            total_items: items.iter().map(|row| row.quantity).sum(),
            total_price: items
                .iter()
                .map(|row| {
                    row.product
                        .as_ref()
                        .map_or(Decimal::ZERO, |p| p.price.line_total(row.quantity))
                })
                .sum(),
        }
    }

    /// Replace the mirror with the remote state.
    ///
    /// Unauthenticated: the mirror is forced empty and the load flag
    /// cleared, with no remote call.
    ///
    /// # Errors
    ///
    /// On a remote failure the previous mirror is left intact and the store
    /// error is returned.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), CartError> {
        let _flight = self.mutation.lock().await;
        self.refresh_locked().await
    }

    /// Add `quantity` of `product`, folding into an existing line if one
    /// exists for the product.
    ///
    /// Selected variants are validated against the product's variant groups
    /// and then dropped from the persistence path by design; see
    /// [`SelectedVariants`].
    ///
    /// # Errors
    ///
    /// [`CartError::NotAuthenticated`] when signed out (no remote call, no
    /// state change), validation errors for bad quantities or selections,
    /// or the store error from the mutation.
    #[instrument(skip(self, product, selected_variants), fields(product_id = %product.id))]
    pub async fn add_to_cart(
        &self,
        product: &Product,
        quantity: u32,
        selected_variants: Option<&SelectedVariants>,
    ) -> Result<(), CartError> {
        let state = self.auth.current();
        let Some(user) = state.user_id().cloned() else {
            return Err(CartError::NotAuthenticated);
        };
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if let Some(selected) = selected_variants {
            validate_selection(product, selected)?;
        }

        let _flight = self.mutation.lock().await;

        // Linear scan; the list is small and order is irrelevant here
        let existing = self
            .items
            .read()
            .expect("cart mirror lock poisoned")
            .iter()
            .find(|row| row.product_id == product.id)
            .map(|row| (row.id.clone(), row.quantity));

        if let Some((id, current)) = existing {
            self.store.update_quantity(&id, current + quantity).await?;
        } else if let Some(row) = self.store.find_item(&user, &product.id).await? {
            // The mirror can lag the store; the (user, product) row stays unique
            self.store
                .update_quantity(&row.id, row.quantity + quantity)
                .await?;
        } else {
            self.store
                .insert_item(rows::NewCartItem {
                    user_id: user,
                    product_id: product.id.clone(),
                    quantity,
                })
                .await?;
        }

        self.refresh_locked().await
    }

    /// Set a line's quantity; zero delegates to removal.
    ///
    /// # Errors
    ///
    /// [`CartError::ItemNotFound`] for an id not in the mirror (no remote
    /// call), or the store error from the mutation.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update_quantity(
        &self,
        item_id: &CartItemId,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove_from_cart(item_id).await;
        }

        let _flight = self.mutation.lock().await;
        self.ensure_present(item_id)?;
        self.store.update_quantity(item_id, quantity).await?;
        self.refresh_locked().await
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// [`CartError::ItemNotFound`] for an id not in the mirror (no remote
    /// call, local state unchanged), or the store error from the mutation.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_from_cart(&self, item_id: &CartItemId) -> Result<(), CartError> {
        let _flight = self.mutation.lock().await;
        self.ensure_present(item_id)?;
        self.store.delete_item(item_id).await?;
        self.refresh_locked().await
    }

    /// Delete every line for the identity.
    ///
    /// Checkout calls this unconditionally; there is no payment or stock
    /// verification anywhere.
    ///
    /// # Errors
    ///
    /// [`CartError::NotAuthenticated`] when signed out (no remote call), or
    /// the store error from the mutation.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), CartError> {
        let state = self.auth.current();
        let Some(user) = state.user_id().cloned() else {
            return Err(CartError::NotAuthenticated);
        };

        let _flight = self.mutation.lock().await;
        self.store.clear_items(&user).await?;
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<(), CartError> {
        let state = self.auth.current();
        let Some(user) = state.user_id().cloned() else {
            self.items
                .write()
                .expect("cart mirror lock poisoned")
                .clear();
            self.loading.store(false, Ordering::Release);
            return Ok(());
        };

        self.loading.store(true, Ordering::Release);
        let result = self.store.fetch_items(&user).await;
        self.loading.store(false, Ordering::Release);

        let fetched = result?;
        *self.items.write().expect("cart mirror lock poisoned") = fetched;
        Ok(())
    }

    fn ensure_present(&self, item_id: &CartItemId) -> Result<(), CartError> {
        let present = self
            .items
            .read()
            .expect("cart mirror lock poisoned")
            .iter()
            .any(|row| &row.id == item_id);
        if present {
            Ok(())
        } else {
            Err(CartError::ItemNotFound(item_id.clone()))
        }
    }
}

fn validate_selection(product: &Product, selected: &SelectedVariants) -> Result<(), CartError> {
    for (group_id, option) in selected {
        let group = product
            .variant_groups
            .iter()
            .find(|g| &g.id == group_id)
            .ok_or_else(|| CartError::UnknownVariantGroup(group_id.clone()))?;
        if !group.options.iter().any(|o| o == option) {
            return Err(CartError::UnknownVariantOption {
                group: group_id.clone(),
                option: option.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::store::fixture::InMemoryCartStore;
    use super::*;

    use rust_decimal::Decimal;
    use secrecy::SecretString;

    use gadget_grove_core::{Email, Price, ProductId, UserId};
    use gadget_grove_remote_store::{AuthClient, AuthUser, Session};

    use crate::catalog::synthetic_variant_groups;
    use crate::services::auth::AuthSession;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn product(id: &str, name: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: format!("{name} description"),
            price: Price::new(dec(price)).expect("price"),
            images: Vec::new(),
            variant_groups: synthetic_variant_groups(name),
        }
    }

    fn product_row(product: &Product) -> rows::ProductRow {
        rows::ProductRow {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image_url: None,
            image_url_2: None,
            image_url_3: None,
            image_url_4: None,
            image_url_5: None,
            created_at: None,
        }
    }

    fn signed_in() -> AuthSession {
        let client = AuthClient::new(
            "http://localhost:54321",
            SecretString::from("test-key".to_string()),
        );
        let session = Session {
            access_token: SecretString::from("token".to_string()),
            user: AuthUser {
                id: UserId::new("u-1"),
                email: Email::parse("shopper@example.com").expect("email"),
            },
        };
        AuthSession::establish(client, &session)
    }

    fn cart_with(products: &[&Product]) -> (AuthSession, Arc<InMemoryCartStore>, CartService) {
        let auth = signed_in();
        let store = Arc::new(InMemoryCartStore::with_products(
            products.iter().map(|p| product_row(p)).collect(),
        ));
        let cart = CartService::new(Arc::clone(&store) as Arc<dyn CartStore>, auth.observe());
        (auth, store, cart)
    }

    #[tokio::test]
    async fn repeated_adds_accumulate_into_one_line() {
        let laptop = product("p-1", "MacBook Pro 16\"", "1999.99");
        let (_auth, _store, cart) = cart_with(&[&laptop]);

        cart.add_to_cart(&laptop, 1, None).await.expect("first add");
        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().expect("line").quantity, 1);
        assert_eq!(cart.totals().total_price, dec("1999.99"));

        cart.add_to_cart(&laptop, 2, None).await.expect("second add");
        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().expect("line").quantity, 3);
        assert_eq!(
            cart.totals(),
            CartTotals {
                total_items: 3,
                total_price: dec("5999.97"),
            }
        );
    }

    #[tokio::test]
    async fn distinct_products_get_distinct_lines() {
        let macbook = product("p-1", "MacBook Pro 16\"", "2499.99");
        let xps = product("p-2", "Dell XPS 15", "1999.99");
        let (_auth, _store, cart) = cart_with(&[&macbook, &xps]);

        cart.add_to_cart(&macbook, 1, None).await.expect("add");
        cart.add_to_cart(&xps, 2, None).await.expect("add");

        assert_eq!(cart.items().len(), 2);
        assert_eq!(
            cart.totals(),
            CartTotals {
                total_items: 3,
                total_price: dec("6499.97"),
            }
        );
    }

    #[tokio::test]
    async fn uniqueness_holds_even_when_the_mirror_lags_the_store() {
        let laptop = product("p-1", "HP Spectre x360", "1599.99");
        let (_auth, store, cart) = cart_with(&[&laptop]);

        // A row exists remotely that the mirror has never seen
        store
            .insert_item(rows::NewCartItem {
                user_id: UserId::new("u-1"),
                product_id: laptop.id.clone(),
                quantity: 1,
            })
            .await
            .expect("seed row");

        cart.add_to_cart(&laptop, 2, None).await.expect("add");

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().expect("line").quantity, 3);
    }

    #[tokio::test]
    async fn zero_quantity_update_is_removal() {
        let laptop = product("p-1", "Lenovo ThinkPad X1", "1799.99");
        let (_auth, _store, cart) = cart_with(&[&laptop]);

        cart.add_to_cart(&laptop, 2, None).await.expect("add");
        let id = cart.items().first().expect("line").id.clone();

        cart.update_quantity(&id, 0).await.expect("update to zero");

        assert!(cart.items().is_empty());
        assert_eq!(cart.totals().total_items, 0);
    }

    #[tokio::test]
    async fn totals_track_every_mutation() {
        let laptop = product("p-1", "ASUS ROG Zephyrus", "2299.99");
        let (_auth, _store, cart) = cart_with(&[&laptop]);

        cart.add_to_cart(&laptop, 1, None).await.expect("add");
        let id = cart.items().first().expect("line").id.clone();

        cart.update_quantity(&id, 4).await.expect("update");
        assert_eq!(cart.totals().total_items, 4);
        assert_eq!(cart.totals().total_price, dec("9199.96"));

        cart.remove_from_cart(&id).await.expect("remove");
        assert_eq!(
            cart.totals(),
            CartTotals {
                total_items: 0,
                total_price: Decimal::ZERO,
            }
        );
    }

    #[tokio::test]
    async fn a_missing_product_join_counts_as_zero() {
        let ghost = product("p-ghost", "Discontinued", "999.99");
        // The fixture has no catalog row for the product, so the join is None
        let (_auth, _store, cart) = cart_with(&[]);

        cart.add_to_cart(&ghost, 2, None).await.expect("add");

        let items = cart.items();
        assert!(items.first().expect("line").product.is_none());
        assert_eq!(
            cart.totals(),
            CartTotals {
                total_items: 2,
                total_price: Decimal::ZERO,
            }
        );
    }

    #[tokio::test]
    async fn clear_then_refresh_yields_an_empty_cart() {
        let laptop = product("p-1", "Dell XPS 15", "1999.99");
        let (_auth, _store, cart) = cart_with(&[&laptop]);

        cart.add_to_cart(&laptop, 3, None).await.expect("add");
        cart.clear_cart().await.expect("clear");
        cart.refresh().await.expect("refresh");

        assert!(cart.items().is_empty());
    }

    #[tokio::test]
    async fn unauthenticated_mutations_stay_local() {
        let laptop = product("p-1", "MacBook Pro 16\"", "2499.99");
        let auth = signed_in();
        auth.mark_signed_out();
        let store = Arc::new(InMemoryCartStore::default());
        let cart = CartService::new(Arc::clone(&store) as Arc<dyn CartStore>, auth.observe());

        assert!(matches!(
            cart.add_to_cart(&laptop, 1, None).await,
            Err(CartError::NotAuthenticated)
        ));
        assert!(matches!(
            cart.clear_cart().await,
            Err(CartError::NotAuthenticated)
        ));
        assert_eq!(store.call_count(), 0);
        assert!(cart.items().is_empty());
    }

    #[tokio::test]
    async fn sign_out_forces_the_mirror_empty_without_a_remote_call() {
        let laptop = product("p-1", "MacBook Pro 16\"", "2499.99");
        let (auth, store, cart) = cart_with(&[&laptop]);

        cart.add_to_cart(&laptop, 1, None).await.expect("add");
        assert_eq!(cart.items().len(), 1);

        auth.mark_signed_out();
        let calls_before = store.call_count();

        cart.refresh().await.expect("refresh");

        assert!(cart.items().is_empty());
        assert!(!cart.is_loading());
        assert_eq!(store.call_count(), calls_before);
    }

    #[tokio::test]
    async fn removing_an_unknown_item_changes_nothing() {
        let laptop = product("p-1", "HP Spectre x360", "1599.99");
        let (_auth, store, cart) = cart_with(&[&laptop]);

        cart.add_to_cart(&laptop, 1, None).await.expect("add");
        let before = cart.items();
        let calls_before = store.call_count();

        let result = cart.remove_from_cart(&CartItemId::new("no-such-item")).await;

        assert!(matches!(result, Err(CartError::ItemNotFound(_))));
        assert_eq!(cart.items(), before);
        assert_eq!(store.call_count(), calls_before);
    }

    #[tokio::test]
    async fn a_failed_mutation_retains_the_previous_mirror() {
        let laptop = product("p-1", "Lenovo ThinkPad X1", "1799.99");
        let (_auth, store, cart) = cart_with(&[&laptop]);

        cart.add_to_cart(&laptop, 2, None).await.expect("add");
        let before = cart.items();

        store.fail_next();
        let id = before.first().expect("line").id.clone();
        let result = cart.update_quantity(&id, 5).await;

        assert!(matches!(result, Err(CartError::Store(_))));
        assert_eq!(cart.items(), before);
    }

    #[tokio::test]
    async fn a_failed_refresh_retains_the_previous_mirror() {
        let laptop = product("p-1", "Dell XPS 15", "1999.99");
        let (_auth, store, cart) = cart_with(&[&laptop]);

        cart.add_to_cart(&laptop, 1, None).await.expect("add");
        let before = cart.items();

        store.fail_next();
        assert!(cart.refresh().await.is_err());
        assert_eq!(cart.items(), before);
    }

    #[tokio::test]
    async fn zero_quantity_adds_are_rejected_before_any_remote_call() {
        let laptop = product("p-1", "MacBook Pro 16\"", "2499.99");
        let (_auth, store, cart) = cart_with(&[&laptop]);

        assert!(matches!(
            cart.add_to_cart(&laptop, 0, None).await,
            Err(CartError::InvalidQuantity)
        ));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn selections_are_validated_but_never_persisted() {
        let laptop = product("p-1", "ASUS ROG Zephyrus", "2299.99");
        let (_auth, store, cart) = cart_with(&[&laptop]);

        let mut selected = SelectedVariants::new();
        selected.insert("ram".into(), "16GB".into());
        selected.insert("storage".into(), "1TB SSD".into());

        cart.add_to_cart(&laptop, 1, Some(&selected))
            .await
            .expect("add with selection");

        // The stored row carries only (user, product, quantity)
        let stored = store.rows.lock().expect("lock");
        let row = stored.first().expect("row");
        assert_eq!(row.quantity, 1);
        assert_eq!(row.product_id, laptop.id);
    }

    #[tokio::test]
    async fn unknown_variant_selections_are_rejected_locally() {
        let laptop = product("p-1", "HP Spectre x360", "1599.99");
        let (_auth, store, cart) = cart_with(&[&laptop]);

        let mut bad_group = SelectedVariants::new();
        bad_group.insert("color".into(), "red".into());
        assert!(matches!(
            cart.add_to_cart(&laptop, 1, Some(&bad_group)).await,
            Err(CartError::UnknownVariantGroup(_))
        ));

        let mut bad_option = SelectedVariants::new();
        bad_option.insert("ram".into(), "64GB".into());
        assert!(matches!(
            cart.add_to_cart(&laptop, 1, Some(&bad_option)).await,
            Err(CartError::UnknownVariantOption { .. })
        ));

        assert_eq!(store.call_count(), 0);
    }
}
