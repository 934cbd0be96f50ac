//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiError, CatalogClient, ProductSource, StockSource};
use crate::cart::CartStore;
use crate::config::StorefrontConfig;
use crate::listing::ProductListing;
use crate::notify::NoticeQueue;
use crate::storage::{FileStorage, StorageSlot};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// cart store, the product listing, and pending notices.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: CartStore,
    listing: ProductListing,
    notices: Arc<NoticeQueue>,
}

impl AppState {
    /// Create application state backed by the catalog API and the storage file.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let client = Arc::new(CatalogClient::new(&config.catalog)?);
        let storage = Arc::new(FileStorage::new(&config.storage_path));

        Ok(Self::with_sources(config, client.clone(), client, storage))
    }

    /// Create application state from explicit collaborators.
    #[must_use]
    pub fn with_sources(
        config: StorefrontConfig,
        products: Arc<dyn ProductSource>,
        stock: Arc<dyn StockSource>,
        storage: Arc<dyn StorageSlot>,
    ) -> Self {
        let notices = Arc::new(NoticeQueue::new());
        let cart = CartStore::load(products.clone(), stock, storage, notices.clone());
        let listing = ProductListing::new(products, config.currency);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                cart,
                listing,
                notices,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the product listing.
    #[must_use]
    pub fn listing(&self) -> &ProductListing {
        &self.inner.listing
    }

    /// Get a reference to the notices waiting to be displayed.
    #[must_use]
    pub fn notices(&self) -> &NoticeQueue {
        &self.inner.notices
    }
}
