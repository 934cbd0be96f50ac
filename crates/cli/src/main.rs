//! Rocketshoes CLI - Catalog and cart tools.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! rs-cli products
//!
//! # Show the persisted cart
//! rs-cli cart show
//!
//! # Add one unit of product 1
//! rs-cli cart add 1
//!
//! # Set product 1 to 3 units
//! rs-cli cart update 1 3
//!
//! # Remove product 1
//! rs-cli cart remove 1
//! ```
//!
//! # Commands
//!
//! - `products` - List the catalog with formatted prices
//! - `cart` - Inspect and modify the cart stored at `CART_STORAGE_PATH`

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "rs-cli")]
#[command(author, version, about = "Rocketshoes CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the product catalog
    Products,
    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product line
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product line
    Update {
        /// Product ID
        product_id: ProductId,

        /// New quantity (must be at least 1)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products => commands::products::list().await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show()?,
            CartAction::Add { product_id } => commands::cart::add(product_id).await?,
            CartAction::Remove { product_id } => commands::cart::remove(product_id)?,
            CartAction::Update { product_id, amount } => {
                commands::cart::update(product_id, amount).await?;
            }
        },
    }
    Ok(())
}
