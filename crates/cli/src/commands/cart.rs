//! Cart management commands.
//!
//! Each command loads the cart from `CART_STORAGE_PATH`, applies one
//! operation and lets the store persist the result. Notices are logged.

use rocketshoes_core::{ProductId, UpdateProductAmount};
use rocketshoes_storefront::cart::CartOutcome;

use super::{CommandError, open_cart};

/// Print the cart lines and total.
pub fn show() -> Result<(), CommandError> {
    let (config, cart) = open_cart()?;
    let summary = cart.summary(config.currency);

    #[allow(clippy::print_stdout)]
    {
        if summary.is_empty() {
            println!("Cart is empty");
        }
        for line in &summary.lines {
            println!(
                "{:>5}  {:<40}  {:>3} x {}  {}",
                line.item.id(),
                line.item.product.title,
                line.item.amount,
                line.unit_price,
                line.subtotal
            );
        }
        println!("Total: {} ({} items)", summary.total, summary.total_quantity);
    }

    Ok(())
}

/// Add one unit of a product.
pub async fn add(product_id: ProductId) -> Result<(), CommandError> {
    let (_, cart) = open_cart()?;
    let outcome = cart.add_product(product_id).await;
    report("add", product_id, outcome)
}

/// Remove a product line.
pub fn remove(product_id: ProductId) -> Result<(), CommandError> {
    let (_, cart) = open_cart()?;
    let outcome = cart.remove_product(product_id);
    report("remove", product_id, outcome)
}

/// Set the quantity of a product line.
pub async fn update(product_id: ProductId, amount: i64) -> Result<(), CommandError> {
    let (_, cart) = open_cart()?;
    let outcome = cart
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await;
    report("update", product_id, outcome)
}

fn report(action: &str, product_id: ProductId, outcome: CartOutcome) -> Result<(), CommandError> {
    match outcome {
        CartOutcome::Committed => {
            tracing::info!("Cart {action} applied to product {product_id}");
            Ok(())
        }
        CartOutcome::Ignored => {
            tracing::info!("Cart {action} ignored for product {product_id}");
            Ok(())
        }
        rejected => Err(CommandError::Rejected(format!("{rejected:?}"))),
    }
}
