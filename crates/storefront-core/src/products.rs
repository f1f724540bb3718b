use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CoreError;

const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// A catalog product as stored in the catalog database and served by the
/// product API.
///
/// The serialized field names are the product API wire format; `product_id`
/// travels as `sku` and `product_type` as `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Decimal FNV-1a hash of the feed SKU, see [`product_id_for_sku`].
    #[serde(rename = "sku")]
    pub product_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    /// Price in integer cents.
    pub price: i64,
    pub upc: String,
    pub description: String,
    pub brand: String,
    pub model: String,
    pub url: String,
    pub image: String,
    /// Name of the first category listed in the feed, or empty.
    pub category: String,
}

/// One element of the product feed, as published by the upstream retailer.
///
/// String fields absent from the feed decode as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProduct {
    pub sku: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub price: Decimal,
    pub upc: String,
    pub description: String,
    pub manufacturer: String,
    pub model: String,
    pub url: String,
    #[serde(rename = "category")]
    pub categories: Vec<RawCategory>,
    pub image: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCategory {
    pub id: String,
    pub name: String,
}

/// Converts a raw feed record into a catalog [`Product`].
///
/// # Errors
///
/// Returns [`CoreError::PriceOutOfRange`] if the price in cents does not fit
/// in an `i64`.
pub fn normalize_product(raw: RawProduct) -> Result<Product, CoreError> {
    let price = price_to_cents(raw.price).ok_or(CoreError::PriceOutOfRange {
        sku: raw.sku,
        price: raw.price,
    })?;

    let category = raw
        .categories
        .into_iter()
        .next()
        .map(|c| c.name)
        .unwrap_or_default();

    Ok(Product {
        product_id: product_id_for_sku(raw.sku),
        name: raw.name,
        product_type: raw.product_type,
        price,
        upc: raw.upc,
        description: raw.description,
        brand: raw.manufacturer,
        model: raw.model,
        url: raw.url,
        image: raw.image,
        category,
    })
}

/// Derives the catalog product ID from a feed SKU.
///
/// The decimal rendering of the SKU is hashed with 32-bit FNV-1a and the hash
/// is returned as a decimal string. Collisions are not detected.
#[must_use]
pub fn product_id_for_sku(sku: i64) -> String {
    let hash = sku
        .to_string()
        .bytes()
        .fold(FNV32_OFFSET_BASIS, |hash, byte| {
            (hash ^ u32::from(byte)).wrapping_mul(FNV32_PRIME)
        });
    hash.to_string()
}

/// Converts a price in currency units to integer cents, truncating any
/// fraction of a cent.
///
/// Returns `None` if the result does not fit in an `i64`.
#[must_use]
pub fn price_to_cents(price: Decimal) -> Option<i64> {
    price.checked_mul(Decimal::ONE_HUNDRED)?.trunc().to_i64()
}

#[cfg(test)]
#[path = "products_test.rs"]
mod tests;
