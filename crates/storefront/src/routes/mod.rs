//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Product listing
//! GET  /health                 - Health check
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add one unit (form: product_id), redirects to /
//! POST /cart/update            - Set quantity (form: product_id, amount), redirects to /cart
//! POST /cart/remove            - Remove line (form: product_id), redirects to /cart
//! GET  /cart/count             - Number of distinct products in the cart
//! ```
//!
//! Cart actions never fail at the HTTP level. Rejections are queued as
//! notices and shown on the page the shopper is redirected to.

pub mod cart;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Product listing
        .route("/", get(home::index))
        // Cart routes
        .nest("/cart", cart_routes())
}

/// Build the complete application with state and tracing applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog API.
async fn health() -> &'static str {
    "ok"
}

/// Messages drained from the notice queue for display.
fn take_notices(state: &AppState) -> Vec<String> {
    state
        .notices()
        .drain()
        .into_iter()
        .map(|notice| notice.message().to_string())
        .collect()
}
