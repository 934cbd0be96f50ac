//! Core types for Rocketshoes.
//!
//! This module provides type-safe wrappers for catalog and cart concepts.

pub mod cart;
pub mod id;
pub mod notice;
pub mod price;
pub mod product;

pub use cart::{CartItem, CartQuantities, CartSummary, LineSummary, UpdateProductAmount};
pub use id::*;
pub use notice::Notice;
pub use price::{CurrencyCode, CurrencyError, Price};
pub use product::{Product, Stock};
