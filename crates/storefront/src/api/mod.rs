//! Remote product and stock sources.
//!
//! # Architecture
//!
//! - The cart store and listing depend on the [`ProductSource`] and
//!   [`StockSource`] traits, never on HTTP directly
//! - [`CatalogClient`] implements both against the REST catalog API
//! - Product records are cached in memory via `moka` (5 minute TTL)
//! - Stock is fetched on every call and never cached
//!
//! # Endpoints
//!
//! ```text
//! GET {base}/products        - All products, in catalog order
//! GET {base}/products/{id}   - A single product
//! GET {base}/stock/{id}      - Available quantity for a product
//! ```

mod client;

pub use client::CatalogClient;

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Catalog API returned {status} for {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body was not the expected JSON.
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Source of product display data.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// List the full catalog in its original order.
    async fn products(&self) -> Result<Vec<Product>, ApiError>;

    /// Look up a single product.
    async fn product(&self, id: ProductId) -> Result<Product, ApiError>;
}

/// Source of authoritative stock ceilings.
#[async_trait]
pub trait StockSource: Send + Sync {
    /// Current available quantity for a product.
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError>;
}
