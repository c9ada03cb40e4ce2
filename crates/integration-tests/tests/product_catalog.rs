//! Product catalog properties: validation, listing order, limits, and
//! the defensive display filter.

use std::sync::Arc;

use chrono::{Duration, Utc};

use terry_store_core::{NewProduct, Product, ProductId, ProductLabel, ProductValidationError};
use terry_store_integration_tests::{admin_ctx, user_ctx};
use terry_store_site::db::MemoryStore;
use terry_store_site::services::{CatalogError, CatalogService};

fn valid_product(n: usize) -> NewProduct {
    NewProduct::parse(
        &format!("Sticker #{n}"),
        &format!("https://store.test/p/{n}"),
        &format!("https://cdn.store.test/{n}.png"),
        "sticker",
        &[],
    )
    .expect("valid product")
}

fn service(store: &Arc<MemoryStore>) -> CatalogService {
    CatalogService::new(Arc::clone(store) as _)
}

#[tokio::test]
async fn test_create_product_assigns_counter_ids() {
    let store = Arc::new(MemoryStore::new());
    let catalog = service(&store);

    let first = catalog
        .create_product(&admin_ctx(), &valid_product(1))
        .await
        .expect("create failed");
    let second = catalog
        .create_product(&admin_ctx(), &valid_product(2))
        .await
        .expect("create failed");

    assert_eq!(first.id.as_i32(), 1);
    assert_eq!(second.id.as_i32(), 2);
}

#[tokio::test]
async fn test_create_product_requires_admin_capability() {
    let store = Arc::new(MemoryStore::new());
    let catalog = service(&store);

    let err = catalog
        .create_product(&user_ctx(), &valid_product(1))
        .await
        .expect_err("non-admin must be rejected");
    assert!(matches!(err, CatalogError::Access(_)));

    // The rejected call must not have burned an id or written anything.
    assert!(catalog.list_products(None).await.is_empty());
    let first = catalog
        .create_product(&admin_ctx(), &valid_product(1))
        .await
        .expect("create failed");
    assert_eq!(first.id.as_i32(), 1);
}

#[tokio::test]
async fn test_listing_is_newest_first_and_respects_limit() {
    let store = Arc::new(MemoryStore::new());
    let catalog = service(&store);

    for n in 1..=4 {
        catalog
            .create_product(&admin_ctx(), &valid_product(n))
            .await
            .expect("create failed");
    }

    let all = catalog.list_products(None).await;
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].title, "Sticker #4");
    assert_eq!(all[3].title, "Sticker #1");

    let limited = catalog.list_products(Some(2)).await;
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].title, "Sticker #4");
    assert_eq!(limited[1].title, "Sticker #3");
}

#[tokio::test]
async fn test_listing_empty_catalog_returns_empty_not_error() {
    let store = Arc::new(MemoryStore::new());
    let catalog = service(&store);

    assert!(catalog.list_products(None).await.is_empty());
    assert!(catalog.list_products(Some(10)).await.is_empty());
}

#[tokio::test]
async fn test_malformed_records_are_treated_as_absent() {
    let store = Arc::new(MemoryStore::new());

    // A record with no image URL, as if written by an older buggy client.
    store.seed_product(Product {
        id: ProductId::new(99),
        title: "Ghost product".to_owned(),
        link: "https://store.test/p/ghost".to_owned(),
        image_url: String::new(),
        label: ProductLabel::Sticker,
        bullets: vec![],
        created_at: Utc::now() + Duration::hours(1),
        updated_at: Utc::now() + Duration::hours(1),
    });

    let catalog = service(&store);
    catalog
        .create_product(&admin_ctx(), &valid_product(1))
        .await
        .expect("create failed");

    let listed = catalog.list_products(None).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Sticker #1");
}

#[test]
fn test_bullet_list_rejects_a_sixth_entry() {
    let bullets: Vec<String> = (0..6).map(|n| format!("bullet {n}")).collect();
    let err = NewProduct::parse(
        "Sticker pack",
        "https://store.test/p/pack",
        "https://cdn.store.test/pack.png",
        "stickers_sheets",
        &bullets,
    )
    .expect_err("sixth bullet must be rejected");
    assert_eq!(err, ProductValidationError::TooManyBullets);

    for n in 0..=5 {
        let bullets: Vec<String> = (0..n).map(|i| format!("bullet {i}")).collect();
        assert!(
            NewProduct::parse(
                "Sticker pack",
                "https://store.test/p/pack",
                "https://cdn.store.test/pack.png",
                "stickers_sheets",
                &bullets,
            )
            .is_ok(),
            "{n} bullets should be accepted"
        );
    }
}
