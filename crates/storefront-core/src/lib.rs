pub mod app_config;
pub mod config;
pub mod products;

pub use app_config::{FrontendConfig, ProductApiAuth, ProductApiConfig};
pub use config::{
    load_frontend_config, load_frontend_config_from_env, load_product_api_config,
    load_product_api_config_from_env,
};
pub use products::{
    normalize_product, price_to_cents, product_id_for_sku, Product, RawCategory, RawProduct,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("price {price} for sku {sku} does not fit in integer cents")]
    PriceOutOfRange {
        sku: i64,
        price: rust_decimal::Decimal,
    },
}
