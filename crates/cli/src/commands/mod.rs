//! CLI subcommands.

pub mod cart;
pub mod products;

use std::sync::Arc;

use rocketshoes_storefront::api::CatalogClient;
use rocketshoes_storefront::cart::CartStore;
use rocketshoes_storefront::config::StorefrontConfig;
use rocketshoes_storefront::notify::TracingNotifier;
use rocketshoes_storefront::storage::FileStorage;

/// Errors surfaced by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] rocketshoes_storefront::config::ConfigError),

    #[error("Catalog error: {0}")]
    Api(#[from] rocketshoes_storefront::api::ApiError),

    #[error("Cart operation was not applied: {0}")]
    Rejected(String),
}

/// Load configuration and open the cart stored at `CART_STORAGE_PATH`.
fn open_cart() -> Result<(StorefrontConfig, CartStore), CommandError> {
    let config = StorefrontConfig::from_env()?;
    let client = Arc::new(CatalogClient::new(&config.catalog)?);
    let storage = Arc::new(FileStorage::new(&config.storage_path));

    tracing::debug!(path = %config.storage_path.display(), "Opening cart storage");
    let cart = CartStore::load(client.clone(), client, storage, Arc::new(TracingNotifier));

    Ok((config, cart))
}
