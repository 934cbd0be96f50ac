//! The cart store.
//!
//! Owns the in-memory list of line items for the session, checks every
//! quantity change against the stock ceiling, and rewrites the persisted
//! snapshot on every commit.
//!
//! # Commit
//!
//! Each operation works on a copy of the list taken when it starts. A commit
//! serializes the copy, writes it to the storage slot under
//! [`CART_STORAGE_KEY`], and only then replaces the in-memory list. A failed
//! write leaves both untouched.
//!
//! Operations are not serialized against each other. Two concurrent
//! operations on the same product each start from their own copy, and the
//! later commit wins.
//!
//! # Outcomes
//!
//! No operation returns an error. Each resolves to a [`CartOutcome`] and, when
//! it did not commit, emits a [`Notice`] through the configured [`Notifier`].

mod error;

pub use error::CartError;

use std::sync::{Arc, PoisonError, RwLock};

use rocketshoes_core::{
    CartItem, CartQuantities, CartSummary, CurrencyCode, Notice, ProductId, UpdateProductAmount,
};
use tracing::{debug, error, info, instrument, warn};

use crate::api::{ProductSource, StockSource};
use crate::notify::Notifier;
use crate::storage::StorageSlot;

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Result of a cart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOutcome {
    /// The new list was persisted and became the current cart.
    Committed,
    /// The request was a deliberate no-op (non-positive quantity update).
    Ignored,
    /// The requested quantity exceeds the available stock.
    RejectedOutOfStock,
    /// The product has no line in the cart.
    RejectedNotFound,
    /// A catalog, stock, or storage call failed.
    RejectedTransientFailure,
}

impl CartOutcome {
    /// Whether the operation changed the cart.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// Session cart backed by a storage slot.
pub struct CartStore {
    items: RwLock<Vec<CartItem>>,
    products: Arc<dyn ProductSource>,
    stock: Arc<dyn StockSource>,
    storage: Arc<dyn StorageSlot>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.cart().len())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create a store, restoring the cart from the storage slot.
    ///
    /// A missing, unreadable, or malformed snapshot yields an empty cart.
    pub fn load(
        products: Arc<dyn ProductSource>,
        stock: Arc<dyn StockSource>,
        storage: Arc<dyn StorageSlot>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let items = restore(storage.as_ref());
        info!(items = items.len(), "Cart restored");

        Self {
            items: RwLock::new(items),
            products,
            stock,
            storage,
            notifier,
        }
    }

    /// Snapshot of the current line items, in insertion order.
    #[must_use]
    pub fn cart(&self) -> Vec<CartItem> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Per-product quantities of the current cart.
    #[must_use]
    pub fn quantities(&self) -> CartQuantities {
        CartQuantities::from_items(&self.cart())
    }

    /// Line subtotals and total of the current cart.
    #[must_use]
    pub fn summary(&self, currency: CurrencyCode) -> CartSummary {
        CartSummary::new(&self.cart(), currency)
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart has its amount incremented; otherwise
    /// its display data is fetched and a new line with amount 1 is appended.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> CartOutcome {
        match self.try_add_product(product_id).await {
            Ok(()) => {
                info!("Product added to cart");
                CartOutcome::Committed
            }
            Err(e) => self.reject(&e, Notice::AddFailed),
        }
    }

    /// Remove a product's line.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub fn remove_product(&self, product_id: ProductId) -> CartOutcome {
        match self.try_remove_product(product_id) {
            Ok(()) => {
                info!("Product removed from cart");
                CartOutcome::Committed
            }
            Err(e) => self.reject(&e, Notice::RemoveFailed),
        }
    }

    /// Set a line's amount.
    ///
    /// Non-positive amounts are ignored without a notice; removal is the only
    /// way to drop a line.
    #[instrument(skip(self, request), fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> CartOutcome {
        if request.amount <= 0 {
            debug!("Ignoring non-positive amount");
            return CartOutcome::Ignored;
        }

        match self.try_update_product_amount(request).await {
            Ok(()) => {
                info!("Product amount updated");
                CartOutcome::Committed
            }
            Err(e) => self.reject(&e, Notice::UpdateFailed),
        }
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut cart = self.cart();
        let current = cart
            .iter()
            .find(|item| item.id() == product_id)
            .map(|item| item.amount);

        let stock = self.stock.stock(product_id).await?;
        let current = current.unwrap_or(0);

        let Some(requested) = current
            .checked_add(1)
            .filter(|requested| *requested <= stock.amount)
        else {
            return Err(CartError::OutOfStock {
                product_id,
                requested: i64::from(current) + 1,
                available: stock.amount,
            });
        };

        if let Some(item) = cart.iter_mut().find(|item| item.id() == product_id) {
            item.amount = requested;
        } else {
            let product = self.products.product(product_id).await?;
            cart.push(CartItem::new(product));
        }

        self.commit(cart)
    }

    fn try_remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut cart = self.cart();
        let index = cart
            .iter()
            .position(|item| item.id() == product_id)
            .ok_or(CartError::NotFound(product_id))?;

        cart.remove(index);
        self.commit(cart)
    }

    async fn try_update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<(), CartError> {
        let UpdateProductAmount { product_id, amount } = request;
        let mut cart = self.cart();

        let stock = self.stock.stock(product_id).await?;
        let out_of_stock = || CartError::OutOfStock {
            product_id,
            requested: amount,
            available: stock.amount,
        };

        if amount > i64::from(stock.amount) {
            return Err(out_of_stock());
        }
        let amount = u32::try_from(amount).map_err(|_| out_of_stock())?;

        let item = cart
            .iter_mut()
            .find(|item| item.id() == product_id)
            .ok_or(CartError::NotFound(product_id))?;
        item.amount = amount;

        self.commit(cart)
    }

    /// Persist `cart`, then make it the current list.
    fn commit(&self, cart: Vec<CartItem>) -> Result<(), CartError> {
        let snapshot = serde_json::to_string(&cart)?;
        self.storage.set(CART_STORAGE_KEY, &snapshot)?;

        *self.items.write().unwrap_or_else(PoisonError::into_inner) = cart;
        Ok(())
    }

    /// Map a failed operation to its outcome and notify the shopper.
    fn reject(&self, err: &CartError, fault: Notice) -> CartOutcome {
        let (notice, outcome) = match err {
            CartError::OutOfStock { .. } => {
                info!(error = %err, "Cart request exceeds stock");
                (Notice::OutOfStock, CartOutcome::RejectedOutOfStock)
            }
            CartError::NotFound(_) => {
                warn!(error = %err, "Cart line not found");
                (fault, CartOutcome::RejectedNotFound)
            }
            CartError::Api(_) | CartError::Storage(_) | CartError::Serialize(_) => {
                error!(error = %err, "Cart operation failed");
                (fault, CartOutcome::RejectedTransientFailure)
            }
        };

        self.notifier.notify(notice);
        outcome
    }
}

/// Read the persisted cart, falling back to an empty one.
fn restore(storage: &dyn StorageSlot) -> Vec<CartItem> {
    let snapshot = match storage.get(CART_STORAGE_KEY) {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read persisted cart, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartItem>>(&snapshot) {
        Ok(items) => sanitize(items),
        Err(e) => {
            warn!(error = %e, "Persisted cart is malformed, starting empty");
            Vec::new()
        }
    }
}

/// Drop zero-amount lines and repeated product IDs from a restored cart.
fn sanitize(items: Vec<CartItem>) -> Vec<CartItem> {
    let total = items.len();
    let mut seen = std::collections::HashSet::new();
    let items: Vec<CartItem> = items
        .into_iter()
        .filter(|item| item.amount > 0 && seen.insert(item.id()))
        .collect();

    if items.len() != total {
        warn!(
            dropped = total - items.len(),
            "Dropped invalid lines from persisted cart"
        );
    }
    items
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rocketshoes_core::{Product, Stock};

    use super::*;
    use crate::api::ApiError;
    use crate::notify::NoticeQueue;
    use crate::storage::{MemoryStorage, StorageError};

    /// Catalog double with adjustable stock and an outage switch.
    #[derive(Default)]
    struct FakeCatalog {
        products: HashMap<ProductId, Product>,
        stock: Mutex<HashMap<ProductId, u32>>,
        offline: Mutex<bool>,
    }

    impl FakeCatalog {
        fn with_product(mut self, id: i32, price: &str, stock: u32) -> Self {
            let id = ProductId::new(id);
            self.products.insert(
                id,
                Product {
                    id,
                    title: format!("Shoe {id}"),
                    price: price.parse().unwrap(),
                    image: format!("https://example.com/{id}.jpg"),
                },
            );
            self.stock.lock().unwrap().insert(id, stock);
            self
        }

        fn set_stock(&self, id: i32, amount: u32) {
            self.stock
                .lock()
                .unwrap()
                .insert(ProductId::new(id), amount);
        }

        fn go_offline(&self) {
            *self.offline.lock().unwrap() = true;
        }

        fn check_online(&self) -> Result<(), ApiError> {
            if *self.offline.lock().unwrap() {
                Err(ApiError::Status {
                    url: "http://catalog.test/".to_string(),
                    status: 503,
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ProductSource for FakeCatalog {
        async fn products(&self) -> Result<Vec<Product>, ApiError> {
            self.check_online()?;
            Ok(self.products.values().cloned().collect())
        }

        async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
            self.check_online()?;
            self.products
                .get(&id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound(format!("products/{id}")))
        }
    }

    #[async_trait]
    impl StockSource for FakeCatalog {
        async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
            self.check_online()?;
            let amount = self
                .stock
                .lock()
                .unwrap()
                .get(&id)
                .copied()
                .ok_or_else(|| ApiError::NotFound(format!("stock/{id}")))?;
            Ok(Stock { id, amount })
        }
    }

    /// Storage that refuses every write.
    struct ReadOnlyStorage(MemoryStorage);

    impl StorageSlot for ReadOnlyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: "/read-only".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    struct Harness {
        store: CartStore,
        catalog: Arc<FakeCatalog>,
        storage: Arc<MemoryStorage>,
        notices: Arc<NoticeQueue>,
    }

    fn harness(catalog: FakeCatalog) -> Harness {
        harness_with_storage(catalog, MemoryStorage::new())
    }

    fn harness_with_storage(catalog: FakeCatalog, storage: MemoryStorage) -> Harness {
        let catalog = Arc::new(catalog);
        let storage = Arc::new(storage);
        let notices = Arc::new(NoticeQueue::new());
        let store = CartStore::load(
            catalog.clone(),
            catalog.clone(),
            storage.clone(),
            notices.clone(),
        );
        Harness {
            store,
            catalog,
            storage,
            notices,
        }
    }

    fn catalog() -> FakeCatalog {
        FakeCatalog::default()
            .with_product(1, "179.9", 3)
            .with_product(3, "139.9", 4)
            .with_product(7, "219.9", 5)
    }

    fn amount_of(store: &CartStore, id: i32) -> Option<u32> {
        store
            .cart()
            .iter()
            .find(|item| item.id() == ProductId::new(id))
            .map(|item| item.amount)
    }

    fn persisted(storage: &MemoryStorage) -> Vec<CartItem> {
        serde_json::from_str(&storage.get(CART_STORAGE_KEY).unwrap().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_add_new_product_creates_line_with_amount_one() {
        let h = harness(catalog());

        let outcome = h.store.add_product(ProductId::new(1)).await;

        assert_eq!(outcome, CartOutcome::Committed);
        let cart = h.store.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.first().unwrap().amount, 1);
        assert_eq!(cart.first().unwrap().product.title, "Shoe 1");
        assert!(h.notices.is_empty());
    }

    #[tokio::test]
    async fn test_add_existing_product_increments() {
        let h = harness(catalog());
        h.store.add_product(ProductId::new(3)).await;
        h.store.add_product(ProductId::new(1)).await;

        let outcome = h.store.add_product(ProductId::new(3)).await;

        assert!(outcome.is_committed());
        assert_eq!(h.store.cart().len(), 2);
        assert_eq!(amount_of(&h.store, 3), Some(2));
        assert_eq!(amount_of(&h.store, 1), Some(1));
    }

    #[tokio::test]
    async fn test_add_up_to_ceiling_then_reject() {
        let h = harness(catalog());
        let id = ProductId::new(7);

        for _ in 0..5 {
            assert_eq!(h.store.add_product(id).await, CartOutcome::Committed);
        }
        assert_eq!(amount_of(&h.store, 7), Some(5));
        assert!(h.notices.is_empty());

        let outcome = h.store.add_product(id).await;

        assert_eq!(outcome, CartOutcome::RejectedOutOfStock);
        assert_eq!(amount_of(&h.store, 7), Some(5));
        assert_eq!(h.notices.drain(), vec![Notice::OutOfStock]);
        assert_eq!(persisted(&h.storage).first().unwrap().amount, 5);
    }

    #[tokio::test]
    async fn test_add_with_zero_stock_is_rejected() {
        let h = harness(catalog());
        h.catalog.set_stock(1, 0);

        let outcome = h.store.add_product(ProductId::new(1)).await;

        assert_eq!(outcome, CartOutcome::RejectedOutOfStock);
        assert!(h.store.cart().is_empty());
        assert_eq!(h.storage.get(CART_STORAGE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_add_at_max_amount_is_rejected() {
        let snapshot = format!(
            r#"[{{"id": 1, "title": "Shoe 1", "price": 179.9, "image": "a.jpg", "amount": {}}}]"#,
            u32::MAX
        );
        let h = harness_with_storage(
            catalog(),
            MemoryStorage::with_entry(CART_STORAGE_KEY, &snapshot),
        );
        h.catalog.set_stock(1, u32::MAX);

        let outcome = h.store.add_product(ProductId::new(1)).await;

        assert_eq!(outcome, CartOutcome::RejectedOutOfStock);
        assert_eq!(amount_of(&h.store, 1), Some(u32::MAX));
        assert_eq!(h.notices.drain(), vec![Notice::OutOfStock]);
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_transient_failure() {
        let h = harness(catalog());

        let outcome = h.store.add_product(ProductId::new(99)).await;

        assert_eq!(outcome, CartOutcome::RejectedTransientFailure);
        assert!(h.store.cart().is_empty());
        assert_eq!(h.notices.drain(), vec![Notice::AddFailed]);
    }

    #[tokio::test]
    async fn test_add_while_offline_leaves_cart_unchanged() {
        let h = harness(catalog());
        h.store.add_product(ProductId::new(1)).await;
        h.catalog.go_offline();

        let outcome = h.store.add_product(ProductId::new(1)).await;

        assert_eq!(outcome, CartOutcome::RejectedTransientFailure);
        assert_eq!(amount_of(&h.store, 1), Some(1));
        assert_eq!(h.notices.drain(), vec![Notice::AddFailed]);
    }

    #[tokio::test]
    async fn test_remove_present_product() {
        let h = harness(catalog());
        h.store.add_product(ProductId::new(1)).await;
        h.store.add_product(ProductId::new(3)).await;

        let outcome = h.store.remove_product(ProductId::new(1));

        assert_eq!(outcome, CartOutcome::Committed);
        assert_eq!(h.store.cart().len(), 1);
        assert_eq!(amount_of(&h.store, 1), None);
        assert_eq!(persisted(&h.storage).len(), 1);
        assert!(h.notices.is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_product_notifies() {
        let h = harness(catalog());
        h.store.add_product(ProductId::new(3)).await;

        let outcome = h.store.remove_product(ProductId::new(1));

        assert_eq!(outcome, CartOutcome::RejectedNotFound);
        assert_eq!(h.store.cart().len(), 1);
        assert_eq!(h.notices.drain(), vec![Notice::RemoveFailed]);
    }

    #[tokio::test]
    async fn test_update_non_positive_amount_is_ignored() {
        let h = harness(catalog());
        h.store.add_product(ProductId::new(3)).await;
        h.catalog.go_offline();

        for amount in [0, -1, i64::MIN] {
            let outcome = h
                .store
                .update_product_amount(UpdateProductAmount {
                    product_id: ProductId::new(3),
                    amount,
                })
                .await;
            assert_eq!(outcome, CartOutcome::Ignored);
        }

        assert_eq!(amount_of(&h.store, 3), Some(1));
        assert!(h.notices.is_empty());
    }

    #[tokio::test]
    async fn test_update_above_ceiling_is_rejected() {
        let h = harness(catalog());
        h.store.add_product(ProductId::new(3)).await;
        h.store.add_product(ProductId::new(3)).await;

        let outcome = h
            .store
            .update_product_amount(UpdateProductAmount {
                product_id: ProductId::new(3),
                amount: 10,
            })
            .await;

        assert_eq!(outcome, CartOutcome::RejectedOutOfStock);
        assert_eq!(amount_of(&h.store, 3), Some(2));
        assert_eq!(h.notices.drain(), vec![Notice::OutOfStock]);
    }

    #[tokio::test]
    async fn test_update_sets_amount() {
        let h = harness(catalog());
        h.store.add_product(ProductId::new(3)).await;

        let outcome = h
            .store
            .update_product_amount(UpdateProductAmount {
                product_id: ProductId::new(3),
                amount: 4,
            })
            .await;

        assert_eq!(outcome, CartOutcome::Committed);
        assert_eq!(amount_of(&h.store, 3), Some(4));
        assert_eq!(persisted(&h.storage).first().unwrap().amount, 4);
    }

    #[tokio::test]
    async fn test_update_missing_line_notifies() {
        let h = harness(catalog());

        let outcome = h
            .store
            .update_product_amount(UpdateProductAmount {
                product_id: ProductId::new(1),
                amount: 2,
            })
            .await;

        assert_eq!(outcome, CartOutcome::RejectedNotFound);
        assert!(h.store.cart().is_empty());
        assert_eq!(h.notices.drain(), vec![Notice::UpdateFailed]);
    }

    #[tokio::test]
    async fn test_persist_failure_leaves_memory_unchanged() {
        let catalog = Arc::new(catalog());
        let notices = Arc::new(NoticeQueue::new());
        let store = CartStore::load(
            catalog.clone(),
            catalog,
            Arc::new(ReadOnlyStorage(MemoryStorage::new())),
            notices.clone(),
        );

        let outcome = store.add_product(ProductId::new(1)).await;

        assert_eq!(outcome, CartOutcome::RejectedTransientFailure);
        assert!(store.cart().is_empty());
        assert_eq!(notices.drain(), vec![Notice::AddFailed]);
    }

    #[tokio::test]
    async fn test_reload_reproduces_cart() {
        let h = harness(catalog());
        h.store.add_product(ProductId::new(7)).await;
        h.store.add_product(ProductId::new(1)).await;
        h.store.add_product(ProductId::new(7)).await;
        h.store.add_product(ProductId::new(3)).await;

        let reloaded = CartStore::load(
            h.catalog.clone(),
            h.catalog.clone(),
            h.storage.clone(),
            h.notices.clone(),
        );

        assert_eq!(reloaded.cart(), h.store.cart());
        let ids: Vec<i32> = reloaded.cart().iter().map(|i| i.id().as_i32()).collect();
        assert_eq!(ids, vec![7, 1, 3]);
    }

    #[test]
    fn test_malformed_snapshot_starts_empty() {
        let h = harness_with_storage(
            catalog(),
            MemoryStorage::with_entry(CART_STORAGE_KEY, "{\"oops\":"),
        );
        assert!(h.store.cart().is_empty());
    }

    #[test]
    fn test_restore_drops_invalid_lines() {
        let snapshot = r#"[
            {"id": 1, "title": "A", "price": 10.0, "image": "a.jpg", "amount": 2},
            {"id": 1, "title": "A", "price": 10.0, "image": "a.jpg", "amount": 5},
            {"id": 2, "title": "B", "price": 20.0, "image": "b.jpg", "amount": 0}
        ]"#;
        let h = harness_with_storage(
            catalog(),
            MemoryStorage::with_entry(CART_STORAGE_KEY, snapshot),
        );

        let cart = h.store.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.first().unwrap().amount, 2);
    }

    #[tokio::test]
    async fn test_quantities_and_summary_follow_cart() {
        let h = harness(catalog());
        h.store.add_product(ProductId::new(1)).await;
        h.store.add_product(ProductId::new(1)).await;

        let quantities = h.store.quantities();
        assert_eq!(quantities.get(ProductId::new(1)), 2);
        assert_eq!(quantities.get(ProductId::new(3)), 0);

        let summary = h.store.summary(CurrencyCode::BRL);
        assert_eq!(summary.total.format(), "R$ 359,80");
    }
}
