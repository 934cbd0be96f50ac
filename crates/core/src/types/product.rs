//! Catalog records served by the remote product and stock sources.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{CurrencyCode, Price};

/// A product as listed by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Unit price in the storefront currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URL.
    pub image: String,
}

impl Product {
    /// Pair the unit price with a currency for display.
    #[must_use]
    pub const fn unit_price(&self, currency: CurrencyCode) -> Price {
        Price::new(self.price, currency)
    }
}

/// Available quantity for a product.
///
/// This is the ceiling for any cart line of the product. It is looked up on
/// every quantity change and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_catalog_json() {
        let json = r#"{
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://example.com/shoe-1.jpg"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Decimal::new(1799, 1));
        assert_eq!(product.unit_price(CurrencyCode::BRL).format(), "R$ 179,90");
    }

    #[test]
    fn test_stock_deserializes() {
        let stock: Stock = serde_json::from_str(r#"{"id": 7, "amount": 5}"#).unwrap();
        assert_eq!(stock.id, ProductId::new(7));
        assert_eq!(stock.amount, 5);
    }

    #[test]
    fn test_stock_rejects_negative_amount() {
        assert!(serde_json::from_str::<Stock>(r#"{"id": 7, "amount": -1}"#).is_err());
    }
}
