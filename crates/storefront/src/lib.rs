//! Rocketshoes Storefront library.
//!
//! This crate provides the cart store, the catalog API client, the storage
//! slot and the storefront routes as a library, allowing them to be tested
//! and reused by the CLI.
//!
//! # Modules
//!
//! - [`cart`] - Cart store: add, remove and update line items
//! - [`api`] - Remote product and stock sources
//! - [`storage`] - Durable key-value slots for the persisted cart
//! - [`notify`] - Sinks for shopper-facing notices
//! - [`listing`] - Product listing state
//! - [`routes`] - HTTP handlers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod listing;
pub mod notify;
pub mod routes;
pub mod state;
pub mod storage;
