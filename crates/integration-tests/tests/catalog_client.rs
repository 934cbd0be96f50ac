//! Integration tests for the catalog REST client.
//!
//! Runs against [`FakeCatalogApi`]; no external services needed.

use rocketshoes_core::{CurrencyCode, ProductId};
use rocketshoes_integration_tests::FakeCatalogApi;
use rocketshoes_storefront::api::{ApiError, CatalogClient, ProductSource, StockSource};

fn client_for(api: &FakeCatalogApi) -> CatalogClient {
    CatalogClient::new(&api.catalog_config()).expect("Failed to build catalog client")
}

#[tokio::test]
async fn test_products_in_catalog_order() {
    let api = FakeCatalogApi::start(&[]).await;
    let client = client_for(&api);

    let products = client.products().await.expect("Failed to list products");

    let ids: Vec<i32> = products.iter().map(|p| p.id.as_i32()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    let first = products.first().expect("catalog is not empty");
    assert_eq!(first.unit_price(CurrencyCode::BRL).format(), "R$ 179,90");
}

#[tokio::test]
async fn test_listing_fills_product_cache() {
    let api = FakeCatalogApi::start(&[]).await;
    let client = client_for(&api);

    client.products().await.expect("Failed to list products");
    let product = client
        .product(ProductId::new(2))
        .await
        .expect("Failed to fetch product");

    assert_eq!(product.title, "Tênis VR Caminhada Confortável Detalhes Couro Masculino");
    assert_eq!(api.request_count("/products/2"), 0);
}

#[tokio::test]
async fn test_single_product_is_cached() {
    let api = FakeCatalogApi::start(&[]).await;
    let client = client_for(&api);

    client.product(ProductId::new(3)).await.expect("first fetch");
    client.product(ProductId::new(3)).await.expect("second fetch");

    assert_eq!(api.request_count("/products/3"), 1);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let api = FakeCatalogApi::start(&[]).await;
    let client = client_for(&api);

    let result = client.product(ProductId::new(99)).await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_stock_is_fetched_every_time() {
    let api = FakeCatalogApi::start(&[(1, 3)]).await;
    let client = client_for(&api);

    let first = client.stock(ProductId::new(1)).await.expect("first stock");
    api.set_stock(ProductId::new(1), 5);
    let second = client.stock(ProductId::new(1)).await.expect("second stock");

    assert_eq!(first.amount, 3);
    assert_eq!(second.amount, 5);
    assert_eq!(api.request_count("/stock/1"), 2);
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let api = FakeCatalogApi::start(&[(1, 3)]).await;
    api.set_failing(true);
    let client = client_for(&api);

    let result = client.stock(ProductId::new(1)).await;

    assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
}
