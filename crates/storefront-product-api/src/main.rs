mod api;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, RouterOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storefront_core::load_product_api_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = storefront_db::PoolConfig::from_app_config(&config);
    let pool = storefront_db::open_catalog_read_only(&config.catalog_path, pool_config).await?;
    let products = storefront_db::count_products(&pool).await?;
    tracing::info!(
        catalog = %config.catalog_path.display(),
        products,
        "opened product catalog"
    );

    let app = build_app(AppState { pool }, RouterOptions::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "product API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(storefront_server::shutdown_signal())
        .await?;
    Ok(())
}
