//! Cart line items and the views derived from them.
//!
//! The persisted cart is a JSON array of [`CartItem`]s, each one a catalog
//! [`Product`] with an `amount` next to the product fields:
//!
//! ```json
//! [{"id": 1, "title": "Runner", "price": 179.9, "image": "https://...", "amount": 2}]
//! ```

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{CurrencyCode, Price};
use super::product::Product;

/// A single cart entry: one product and the requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    /// Requested quantity, at least 1.
    pub amount: u32,
}

impl CartItem {
    /// Create a line item for a product that was not yet in the cart.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self { product, amount: 1 }
    }

    /// The product this line refers to.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.amount)
    }
}

/// Request to set the quantity of a line item.
///
/// `amount` is signed so that zero and negative requests can be expressed
/// (and ignored) instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Product ID to cart quantity, derived from the cart list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartQuantities(HashMap<ProductId, u32>);

impl CartQuantities {
    /// Fold a cart list into a quantity map.
    #[must_use]
    pub fn from_items(items: &[CartItem]) -> Self {
        items.iter().collect()
    }

    /// Quantity of a product in the cart, 0 when absent.
    #[must_use]
    pub fn get(&self, id: ProductId) -> u32 {
        self.0.get(&id).copied().unwrap_or(0)
    }
}

impl<'a> FromIterator<&'a CartItem> for CartQuantities {
    fn from_iter<I: IntoIterator<Item = &'a CartItem>>(iter: I) -> Self {
        Self(iter.into_iter().map(|item| (item.id(), item.amount)).collect())
    }
}

/// Display totals for a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSummary {
    pub item: CartItem,
    pub unit_price: Price,
    pub subtotal: Price,
}

/// Totals for a whole cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<LineSummary>,
    /// Sum of all line quantities.
    pub total_quantity: u64,
    pub total: Price,
}

impl CartSummary {
    /// Compute line subtotals and the cart total.
    #[must_use]
    pub fn new(items: &[CartItem], currency: CurrencyCode) -> Self {
        let lines: Vec<LineSummary> = items
            .iter()
            .map(|item| LineSummary {
                unit_price: item.product.unit_price(currency),
                subtotal: Price::new(item.subtotal(), currency),
                item: item.clone(),
            })
            .collect();

        let total = items.iter().map(CartItem::subtotal).sum::<Decimal>();
        let total_quantity = items.iter().map(|item| u64::from(item.amount)).sum();

        Self {
            lines,
            total_quantity,
            total: Price::new(total, currency),
        }
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
