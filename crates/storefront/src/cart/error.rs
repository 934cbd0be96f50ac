//! Cart operation errors.
//!
//! These never leave the store: each one is mapped to a
//! [`CartOutcome`](super::CartOutcome) and a notice at the operation boundary.

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Reasons a cart operation did not commit.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity exceeds the stock ceiling.
    #[error("Requested {requested} of product {product_id}, only {available} available")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    /// The product has no line in the cart.
    #[error("Product {0} is not in the cart")]
    NotFound(ProductId),

    /// Catalog or stock lookup failed.
    #[error("Catalog error: {0}")]
    Api(#[from] ApiError),

    /// Persisting the snapshot failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
