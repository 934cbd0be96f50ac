//! Product listing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::listing::{ListingEntry, listing_entries};
use crate::state::AppState;

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Rocketshoes</title>
</head>
<body>
  <header>
    <a href="/">Rocketshoes</a>
    <a href="/cart" data-testid="cart-size">My cart: {{ cart_size }} {% if cart_size == 1 %}item{% else %}items{% endif %}</a>
  </header>
  {% for notice in notices %}
  <div class="toast" role="alert">{{ notice }}</div>
  {% endfor %}
  <ul class="product-list">
    {% for product in products %}
    <li>
      <img src="{{ product.image }}" alt="{{ product.title }}">
      <strong>{{ product.title }}</strong>
      <span>{{ product.price_formatted }}</span>
      <form method="post" action="/cart/add">
        <input type="hidden" name="product_id" value="{{ product.id }}">
        <button type="submit" data-testid="add-product-button">
          <span data-testid="cart-product-quantity">{{ product.cart_quantity }}</span>
          <span>ADD TO CART</span>
        </button>
      </form>
    </li>
    {% endfor %}
  </ul>
</body>
</html>
"#
)]
pub struct ProductListTemplate {
    pub products: Vec<ListingEntry>,
    pub cart_size: usize,
    pub notices: Vec<String>,
}

/// Display the product listing.
///
/// The catalog is loaded on the first visit; cart quantities are derived
/// from the cart on every request.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<ProductListTemplate> {
    let products = state.listing().products().await?;
    let cart = state.cart().cart();

    Ok(ProductListTemplate {
        products: listing_entries(products, &cart),
        cart_size: cart.len(),
        notices: super::take_notices(&state),
    })
}
