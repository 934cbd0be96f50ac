//! Product listing state.
//!
//! The catalog is fetched the first time the listing is displayed and kept
//! for the lifetime of the process. A failed fetch is not remembered, so the
//! next display tries again.

use std::sync::Arc;

use rocketshoes_core::{CartItem, CartQuantities, CurrencyCode, Product, ProductId};
use tokio::sync::OnceCell;
use tracing::{info, instrument};

use crate::api::{ApiError, ProductSource};

/// A catalog product with its display price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedProduct {
    pub product: Product,
    pub price_formatted: String,
}

/// One rendered row of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price_formatted: String,
    /// Quantity of this product currently in the cart (0 when absent).
    pub cart_quantity: u32,
}

/// Catalog loaded once for the product listing.
pub struct ProductListing {
    source: Arc<dyn ProductSource>,
    currency: CurrencyCode,
    catalog: OnceCell<Vec<ListedProduct>>,
}

impl std::fmt::Debug for ProductListing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductListing")
            .field("currency", &self.currency)
            .field("loaded", &self.catalog.initialized())
            .finish_non_exhaustive()
    }
}

impl ProductListing {
    /// Create an unloaded listing.
    #[must_use]
    pub fn new(source: Arc<dyn ProductSource>, currency: CurrencyCode) -> Self {
        Self {
            source,
            currency,
            catalog: OnceCell::new(),
        }
    }

    /// The catalog, fetched on first call.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the first successful fetch has not happened yet
    /// and this attempt fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<&[ListedProduct], ApiError> {
        let catalog = self
            .catalog
            .get_or_try_init(|| async {
                let products = self.source.products().await?;
                info!(count = products.len(), "Product catalog loaded");

                Ok::<_, ApiError>(
                    products
                        .into_iter()
                        .map(|product| ListedProduct {
                            price_formatted: product.unit_price(self.currency).format(),
                            product,
                        })
                        .collect(),
                )
            })
            .await?;

        Ok(catalog.as_slice())
    }
}

/// Join the catalog with the current cart quantities.
///
/// Quantities are folded from `cart` on every call; nothing is stored.
#[must_use]
pub fn listing_entries(products: &[ListedProduct], cart: &[CartItem]) -> Vec<ListingEntry> {
    let quantities = CartQuantities::from_items(cart);

    products
        .iter()
        .map(|listed| ListingEntry {
            id: listed.product.id,
            title: listed.product.title.clone(),
            image: listed.product.image.clone(),
            price_formatted: listed.price_formatted.clone(),
            cart_quantity: quantities.get(listed.product.id),
        })
        .collect()
}
