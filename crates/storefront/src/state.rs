//! Application state shared across handlers.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::RwLock;

use gadget_grove_core::UserId;
use gadget_grove_remote_store::{AuthClient, Session, StoreClient};

use crate::cart::{CartService, CartStore, RemoteCartStore};
use crate::catalog::CatalogReader;
use crate::config::StorefrontConfig;
use crate::models::CurrentUser;
use crate::services::auth::AuthSession;

/// Everything that lives and dies with one signed-in identity: its session
/// state and the cart mirror keyed to it.
pub struct UserContext {
    pub auth: AuthSession,
    pub cart: CartService,
}

impl UserContext {
    fn build(store: &StoreClient, auth_client: &AuthClient, session: &Session) -> Arc<Self> {
        let auth = AuthSession::establish(auth_client.clone(), session);
        let cart_store: Arc<dyn CartStore> = Arc::new(RemoteCartStore::new(
            store.clone(),
            session.access_token.clone(),
        ));
        let cart = CartService::new(cart_store, auth.observe());
        Arc::new(Self { auth, cart })
    }

    async fn resume(store: &StoreClient, auth_client: &AuthClient, token: SecretString) -> Arc<Self> {
        let auth = AuthSession::resume(auth_client.clone(), token.clone()).await;
        let cart_store: Arc<dyn CartStore> = Arc::new(RemoteCartStore::new(store.clone(), token));
        let cart = CartService::new(cart_store, auth.observe());
        Arc::new(Self { auth, cart })
    }
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the remote store clients, the catalog
/// reader, and the registry of live per-identity contexts.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: StoreClient,
    auth: AuthClient,
    catalog: CatalogReader,
    contexts: RwLock<HashMap<UserId, Arc<UserContext>>>,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let store = StoreClient::new(
            config.remote_store_url.clone(),
            config.remote_store_anon_key.clone(),
        );
        let auth = AuthClient::new(
            config.remote_store_url.clone(),
            config.remote_store_anon_key.clone(),
        );
        let catalog = CatalogReader::new(Arc::new(store.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                auth,
                catalog,
                contexts: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the auth-plane client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the catalog reader.
    #[must_use]
    pub fn catalog(&self) -> &CatalogReader {
        &self.inner.catalog
    }

    /// Install a context for a freshly issued session (sign-in/sign-up).
    ///
    /// The cart mirror is primed with an initial refresh; a failure there is
    /// logged and left for the next cart read to retry.
    pub async fn install_context(&self, session: &Session) -> Arc<UserContext> {
        let context = UserContext::build(&self.inner.store, &self.inner.auth, session);
        if let Err(err) = context.cart.refresh().await {
            tracing::warn!(error = %err, "Initial cart refresh failed");
        }
        self.inner
            .contexts
            .write()
            .await
            .insert(session.user.id.clone(), Arc::clone(&context));
        context
    }

    /// The live context for a session-carried identity, rebuilt from the
    /// stored access token when the registry has no entry (server restart).
    pub async fn context_for(&self, user: &CurrentUser) -> Arc<UserContext> {
        if let Some(context) = self.inner.contexts.read().await.get(&user.id) {
            return Arc::clone(context);
        }

        let token = SecretString::from(user.access_token.clone());
        let context = UserContext::resume(&self.inner.store, &self.inner.auth, token).await;
        self.inner
            .contexts
            .write()
            .await
            .insert(user.id.clone(), Arc::clone(&context));
        context
    }

    /// Tear down an identity's context; its cart mirror dies with it.
    pub async fn remove_context(&self, user_id: &UserId) {
        self.inner.contexts.write().await.remove(user_id);
    }
}
