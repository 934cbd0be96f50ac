//! Catalog listing command.
//!
//! # Environment Variables
//!
//! - `CATALOG_API_URL` - Base URL of the catalog API
//! - `STOREFRONT_CURRENCY` - Currency used to format prices (default `BRL`)

use std::sync::Arc;

use rocketshoes_storefront::api::CatalogClient;
use rocketshoes_storefront::config::StorefrontConfig;
use rocketshoes_storefront::listing::ProductListing;

use super::CommandError;

/// Print every catalog product with its formatted price.
pub async fn list() -> Result<(), CommandError> {
    let config = StorefrontConfig::from_env()?;
    let client = Arc::new(CatalogClient::new(&config.catalog)?);
    let listing = ProductListing::new(client, config.currency);

    tracing::info!("Fetching products from {}", config.catalog.base_url);
    let products = listing.products().await?;

    #[allow(clippy::print_stdout)]
    {
        for listed in products {
            println!(
                "{:>5}  {:<40}  {}",
                listed.product.id, listed.product.title, listed.price_formatted
            );
        }
    }

    tracing::info!("{} products", products.len());
    Ok(())
}
