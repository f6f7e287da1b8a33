//! Application state shared across handlers.

use std::sync::Arc;

use gadget_grove_remote_store::{AuthClient, StoreClient};

use crate::config::AdminConfig;
use crate::services::auth::{AdminAuthService, RemoteRoleStore};
use crate::services::catalog::{CatalogEditor, RemoteProductStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; wires the role gate and the catalog editor
/// to the remote store clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    gate: AdminAuthService,
    editor: CatalogEditor,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let store = StoreClient::new(
            config.remote_store_url.clone(),
            config.remote_store_anon_key.clone(),
        );
        let auth = AuthClient::new(
            config.remote_store_url.clone(),
            config.remote_store_anon_key.clone(),
        );

        let gate = AdminAuthService::new(
            Arc::new(auth),
            Arc::new(RemoteRoleStore::new(store.clone())),
        );
        let editor = CatalogEditor::new(Arc::new(RemoteProductStore::new(store)));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                gate,
                editor,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the role gate.
    #[must_use]
    pub fn gate(&self) -> &AdminAuthService {
        &self.inner.gate
    }

    /// Get a reference to the catalog editor.
    #[must_use]
    pub fn editor(&self) -> &CatalogEditor {
        &self.inner.editor
    }
}
