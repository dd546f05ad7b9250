//! Application state owning the three stores.
//!
//! Built once at process start and passed by reference to whatever drives
//! the stores. The cart and auth stores share one storage backend.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::{CatalogApi, CatalogStore, HttpCatalogClient};
use crate::config::{AuthConfig, StorefrontConfig};
use crate::error::Result;
use crate::services::auth::AuthStore;
use crate::services::checkout::{self, CheckoutError, CheckoutReceipt};
use crate::storage::{FileStore, KeyValueStore};

/// Catalog, cart and session state.
pub struct AppState<C = HttpCatalogClient> {
    catalog: CatalogStore<C>,
    cart: CartStore,
    auth: AuthStore,
}

impl AppState<HttpCatalogClient> {
    /// Create state backed by the remote catalog and the data directory.
    ///
    /// The catalog is not fetched here; call
    /// [`CatalogStore::load_all`] when items are needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the data
    /// directory cannot be created.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self> {
        let client = HttpCatalogClient::new(&config.catalog)?;
        let storage = Arc::new(FileStore::open(config.data_dir.clone())?);
        Ok(Self::new(client, storage, config.auth))
    }
}

impl<C: CatalogApi> AppState<C> {
    /// Create state from parts.
    #[must_use]
    pub fn new(client: C, storage: Arc<dyn KeyValueStore>, auth: AuthConfig) -> Self {
        Self {
            catalog: CatalogStore::new(client),
            cart: CartStore::new(Arc::clone(&storage)),
            auth: AuthStore::new(storage, auth),
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogStore<C> {
        &self.catalog
    }

    pub const fn catalog_mut(&mut self) -> &mut CatalogStore<C> {
        &mut self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub const fn auth_mut(&mut self) -> &mut AuthStore {
        &mut self.auth
    }

    /// Check out the current cart against the catalog.
    ///
    /// # Errors
    ///
    /// See [`checkout::checkout`].
    pub async fn checkout(&mut self) -> std::result::Result<CheckoutReceipt, CheckoutError> {
        checkout::checkout(&mut self.cart, &mut self.catalog).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use techstore_core::ItemDraft;

    use super::*;
    use crate::catalog::testing::InMemoryCatalog;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_stores_share_storage() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let catalog = InMemoryCatalog::with_items(vec![ItemDraft {
            name: "Monitor".to_string(),
            description: "27 inch monitor".to_string(),
            price: Decimal::from(300),
            category: "monitors".to_string(),
            stock: 2,
            ..ItemDraft::default()
        }]);

        let mut state = AppState::new(catalog, Arc::clone(&storage), AuthConfig::instant());
        state.catalog_mut().load_all().await.unwrap();
        let monitor = state.catalog().items()[0].clone();
        state.cart_mut().add(&monitor);
        state
            .auth_mut()
            .login("demo@demo.com", "demo123")
            .await
            .unwrap();

        let restored = AppState::new(
            InMemoryCatalog::default(),
            storage,
            AuthConfig::instant(),
        );
        assert_eq!(restored.cart().quantity_of(&monitor.id), 1);
        assert!(restored.auth().is_authenticated());
    }

    #[tokio::test]
    async fn test_checkout_through_state() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut state = AppState::new(
            InMemoryCatalog::default(),
            storage,
            AuthConfig::instant(),
        );
        let err = state.checkout().await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }
}
