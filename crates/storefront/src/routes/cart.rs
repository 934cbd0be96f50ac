//! Cart route handlers.
//!
//! Every mutating handler delegates to the cart store and redirects; the
//! store's notices are shown on the page that follows.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use rocketshoes_core::{CartSummary, ProductId, UpdateProductAmount};
use serde::Deserialize;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub amount: u32,
    /// Quantity submitted by the "-" button.
    pub decrement_amount: i64,
    /// Quantity submitted by the "+" button.
    pub increment_amount: i64,
    pub price: String,
    pub subtotal: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: usize,
    pub total: String,
}

impl From<&CartSummary> for CartView {
    fn from(summary: &CartSummary) -> Self {
        Self {
            lines: summary
                .lines
                .iter()
                .map(|line| CartLineView {
                    id: line.item.id(),
                    title: line.item.product.title.clone(),
                    image: line.item.product.image.clone(),
                    amount: line.item.amount,
                    decrement_amount: i64::from(line.item.amount) - 1,
                    increment_amount: i64::from(line.item.amount) + 1,
                    price: line.unit_price.format(),
                    subtotal: line.subtotal.format(),
                })
                .collect(),
            item_count: summary.item_count(),
            total: summary.total.format(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Cart - Rocketshoes</title>
</head>
<body>
  <header>
    <a href="/">Rocketshoes</a>
    <span data-testid="cart-size">My cart: {{ cart.item_count }}</span>
  </header>
  {% for notice in notices %}
  <div class="toast" role="alert">{{ notice }}</div>
  {% endfor %}
  {% if cart.lines.is_empty() %}
  <p>Your cart is empty.</p>
  {% else %}
  <table class="cart">
    <thead>
      <tr><th></th><th>PRODUCT</th><th>QTY</th><th>SUBTOTAL</th><th></th></tr>
    </thead>
    <tbody>
      {% for line in cart.lines %}
      <tr data-testid="product">
        <td><img src="{{ line.image }}" alt="{{ line.title }}"></td>
        <td><strong>{{ line.title }}</strong><span>{{ line.price }}</span></td>
        <td>
          <form method="post" action="/cart/update">
            <input type="hidden" name="product_id" value="{{ line.id }}">
            <input type="hidden" name="amount" value="{{ line.decrement_amount }}">
            <button type="submit" data-testid="decrement-product"{% if line.amount <= 1 %} disabled{% endif %}>-</button>
          </form>
          <input type="text" data-testid="product-amount" readonly value="{{ line.amount }}">
          <form method="post" action="/cart/update">
            <input type="hidden" name="product_id" value="{{ line.id }}">
            <input type="hidden" name="amount" value="{{ line.increment_amount }}">
            <button type="submit" data-testid="increment-product">+</button>
          </form>
        </td>
        <td><strong>{{ line.subtotal }}</strong></td>
        <td>
          <form method="post" action="/cart/remove">
            <input type="hidden" name="product_id" value="{{ line.id }}">
            <button type="submit" data-testid="remove-product">Remove</button>
          </form>
        </td>
      </tr>
      {% endfor %}
    </tbody>
  </table>
  <footer>
    <span>TOTAL</span>
    <strong data-testid="cart-total">{{ cart.total }}</strong>
  </footer>
  {% endif %}
</body>
</html>
"#
)]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub notices: Vec<String>,
}

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> CartShowTemplate {
    let summary = state.cart().summary(state.config().currency);

    CartShowTemplate {
        cart: CartView::from(&summary),
        notices: super::take_notices(&state),
    }
}

/// Add one unit of a product, then return to the listing.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Redirect {
    add_breadcrumb(
        "cart",
        "Add to cart",
        &[("product_id", form.product_id.to_string())],
    );

    let outcome = state.cart().add_product(form.product_id).await;
    tracing::debug!(?outcome, "Add to cart finished");

    Redirect::to("/")
}

/// Set a line's quantity, then return to the cart.
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Redirect {
    add_breadcrumb(
        "cart",
        "Update quantity",
        &[
            ("product_id", form.product_id.to_string()),
            ("amount", form.amount.to_string()),
        ],
    );

    let outcome = state
        .cart()
        .update_product_amount(UpdateProductAmount {
            product_id: form.product_id,
            amount: form.amount,
        })
        .await;
    tracing::debug!(?outcome, "Update quantity finished");

    Redirect::to("/cart")
}

/// Remove a line, then return to the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Redirect {
    add_breadcrumb(
        "cart",
        "Remove from cart",
        &[("product_id", form.product_id.to_string())],
    );

    let outcome = state.cart().remove_product(form.product_id);
    tracing::debug!(?outcome, "Remove from cart finished");

    Redirect::to("/cart")
}

/// Number of distinct products in the cart (header badge).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    state
        .cart()
        .summary(state.config().currency)
        .item_count()
        .to_string()
}
