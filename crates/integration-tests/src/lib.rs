//! Integration tests for Rocketshoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! No external services are needed: [`FakeCatalogApi`] serves the catalog
//! endpoints from an in-process axum server on an ephemeral port.
//!
//! # Test Categories
//!
//! - `catalog_client` - REST client against the fake API
//! - `cart_persistence` - Cart store backed by a storage file
//! - `storefront_routes` - Listing and cart pages via `tower::ServiceExt`

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rocketshoes_core::ProductId;
use rocketshoes_storefront::config::CatalogConfig;
use serde_json::{Value, json};
use url::Url;

/// Catalog contents used by every fake API instance.
#[must_use]
pub fn sample_products() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis1.jpg"
        }),
        json!({
            "id": 2,
            "title": "Tênis VR Caminhada Confortável Detalhes Couro Masculino",
            "price": 139.9,
            "image": "https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis2.jpg"
        }),
        json!({
            "id": 3,
            "title": "Tênis Adidas Duramo Lite 2.0",
            "price": 219.9,
            "image": "https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis3.jpg"
        }),
    ]
}

#[derive(Default)]
struct FakeState {
    products: Vec<Value>,
    stock: HashMap<i32, u32>,
    requests: HashMap<String, usize>,
    failing: bool,
}

type Shared = Arc<Mutex<FakeState>>;

/// In-process catalog API serving `/products`, `/products/{id}` and `/stock/{id}`.
pub struct FakeCatalogApi {
    addr: SocketAddr,
    state: Shared,
}

impl FakeCatalogApi {
    /// Start the fake API with [`sample_products`] and the given stock levels.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(stock: &[(i32, u32)]) -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState {
            products: sample_products(),
            stock: stock.iter().copied().collect(),
            ..FakeState::default()
        }));

        let app = Router::new()
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product))
            .route("/stock/{id}", get(get_stock))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake catalog API");
        let addr = listener
            .local_addr()
            .expect("Failed to read fake catalog API address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Base URL of the running API, with a trailing slash.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("Invalid fake catalog URL")
    }

    /// Catalog client settings pointing at this API.
    #[must_use]
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig::new(self.base_url())
    }

    /// Change the available quantity of a product.
    pub fn set_stock(&self, id: ProductId, amount: u32) {
        self.lock().stock.insert(id.as_i32(), amount);
    }

    /// Make every endpoint answer 500 until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Number of requests received for a path such as `/products`.
    #[must_use]
    pub fn request_count(&self, path: &str) -> usize {
        self.lock().requests.get(path).copied().unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Record a request and report whether the API is failing.
fn record(state: &Shared, path: String) -> bool {
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    *state.requests.entry(path).or_insert(0) += 1;
    state.failing
}

fn unavailable() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "catalog unavailable").into_response()
}

async fn list_products(State(state): State<Shared>) -> Response {
    if record(&state, "/products".to_string()) {
        return unavailable();
    }
    let products = state
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .products
        .clone();
    Json(products).into_response()
}

async fn get_product(State(state): State<Shared>, Path(id): Path<i32>) -> Response {
    if record(&state, format!("/products/{id}")) {
        return unavailable();
    }
    let product = state
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .products
        .iter()
        .find(|product| product["id"] == json!(id))
        .cloned();

    product.map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |product| Json(product).into_response(),
    )
}

async fn get_stock(State(state): State<Shared>, Path(id): Path<i32>) -> Response {
    if record(&state, format!("/stock/{id}")) {
        return unavailable();
    }
    let amount = state
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .stock
        .get(&id)
        .copied();

    amount.map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |amount| Json(json!({ "id": id, "amount": amount })).into_response(),
    )
}
