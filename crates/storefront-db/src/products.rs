//! Database operations for the `products` catalog table.

use sqlx::{Executor, Sqlite, SqlitePool};
use storefront_core::Product;

use crate::DbError;

/// A row from the `products` table.
///
/// Column names are the catalog's PascalCase schema; see
/// `migrations/20261016000100_create_products.sql`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    #[sqlx(rename = "ProductID")]
    pub product_id: String,
    #[sqlx(rename = "Name")]
    pub name: String,
    #[sqlx(rename = "Type")]
    pub product_type: String,
    #[sqlx(rename = "Price")]
    pub price: i64,
    #[sqlx(rename = "Upc")]
    pub upc: String,
    #[sqlx(rename = "Description")]
    pub description: String,
    #[sqlx(rename = "Brand")]
    pub brand: String,
    #[sqlx(rename = "Model")]
    pub model: String,
    #[sqlx(rename = "URL")]
    pub url: String,
    #[sqlx(rename = "Image")]
    pub image: String,
    #[sqlx(rename = "Category")]
    pub category: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            product_id: row.product_id,
            name: row.name,
            product_type: row.product_type,
            price: row.price,
            upc: row.upc,
            description: row.description,
            brand: row.brand,
            model: row.model,
            url: row.url,
            image: row.image,
            category: row.category,
        }
    }
}

/// Inserts a product, replacing any existing row with the same `ProductID`.
///
/// Product IDs are 32-bit hashes of the feed SKU, so two SKUs can collide;
/// the later record wins.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_product<'e, E>(executor: E, product: &Product) -> Result<(), DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT OR REPLACE INTO products \
             (ProductID, Name, Type, Price, Upc, Description, \
              Brand, Model, URL, Image, Category) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .bind(&product.product_id)
    .bind(&product.name)
    .bind(&product.product_type)
    .bind(product.price)
    .bind(&product.upc)
    .bind(&product.description)
    .bind(&product.brand)
    .bind(&product.model)
    .bind(&product.url)
    .bind(&product.image)
    .bind(&product.category)
    .execute(executor)
    .await?;

    Ok(())
}

/// Returns up to `limit` products sampled uniformly at random.
///
/// Every call draws a fresh sample; consecutive calls may overlap.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query or row decoding fails.
pub async fn random_products(pool: &SqlitePool, limit: i64) -> Result<Vec<Product>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT ProductID, Name, Type, Price, Upc, Description, \
                Brand, Model, URL, Image, Category \
         FROM products \
         ORDER BY RANDOM() \
         LIMIT ?1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Product::from).collect())
}

/// Returns the number of products in the catalog.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_products(pool: &SqlitePool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
