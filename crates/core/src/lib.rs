//! Rocketshoes Core - Shared types library.
//!
//! This crate provides common types used across all Rocketshoes components:
//! - `storefront` - Product listing and cart pages backed by the cart store
//! - `cli` - Command-line front-end over the same cart store
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, catalog records, cart line items and notices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
