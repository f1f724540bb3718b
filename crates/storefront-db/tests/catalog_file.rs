//! Tests for creating and opening catalog files on disk.

use storefront_core::Product;
use storefront_db::{
    count_products, create_catalog, health_check, insert_product, open_catalog_read_only,
    random_products, DbError, PoolConfig,
};

fn sample_product() -> Product {
    Product {
        product_id: "873244444".to_string(),
        name: "Widget".to_string(),
        product_type: "HardGood".to_string(),
        price: 1999,
        upc: String::new(),
        description: String::new(),
        brand: "Acme".to_string(),
        model: String::new(),
        url: String::new(),
        image: String::new(),
        category: String::new(),
    }
}

#[tokio::test]
async fn create_catalog_refuses_existing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("products.db");
    std::fs::write(&path, b"not a database").expect("write");

    let err = create_catalog(&path).await.expect_err("must refuse");
    assert!(
        matches!(err, DbError::AlreadyExists(ref p) if *p == path),
        "expected AlreadyExists, got: {err:?}"
    );
    assert_eq!(std::fs::read(&path).expect("read"), b"not a database");
}

#[tokio::test]
async fn created_catalog_is_served_read_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("products.db");

    let writer = create_catalog(&path).await.expect("create");
    insert_product(&writer, &sample_product())
        .await
        .expect("insert");
    writer.close().await;

    let reader = open_catalog_read_only(&path, PoolConfig::default())
        .await
        .expect("open read-only");
    health_check(&reader).await.expect("healthy");
    assert_eq!(count_products(&reader).await.expect("count"), 1);
    assert_eq!(
        random_products(&reader, 10).await.expect("sample"),
        vec![sample_product()]
    );

    let write_attempt = insert_product(&reader, &sample_product()).await;
    assert!(
        write_attempt.is_err(),
        "read-only catalog must reject writes"
    );
}

#[tokio::test]
async fn open_read_only_fails_for_missing_catalog() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing.db");

    let result = open_catalog_read_only(&path, PoolConfig::default()).await;
    assert!(result.is_err());
    assert!(!path.exists(), "opening must not create the file");
}
