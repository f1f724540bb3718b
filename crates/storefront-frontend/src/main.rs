mod api;
mod render;

use std::sync::Arc;

use storefront_client::{
    resolve_product_api_credentials, CloudContext, CloudOverrides, Credentials, MetadataClient,
    ProductApiClient, ServiceLocator,
};
use storefront_core::FrontendConfig;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, RouterOptions, SelfDeleteTarget};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storefront_core::load_frontend_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let metadata = MetadataClient::new(&config.metadata_host, config.http_timeout_secs)?;
    let credentials = resolve_product_api_credentials(config.product_api_auth, &metadata).await;
    let anonymous = matches!(credentials, Credentials::Anonymous);
    let products = ProductApiClient::new(
        &config.product_api_url,
        config.http_timeout_secs,
        Arc::new(credentials),
    )?;
    tracing::info!(
        product_api = %products.base_url(),
        auth = %config.product_api_auth,
        anonymous,
        "configured product API client"
    );

    let self_delete = if config.self_delete_route {
        self_delete_target(&config, &metadata).await
    } else {
        None
    };

    let app = build_app(
        AppState {
            products,
            self_delete,
        },
        RouterOptions::from_config(&config),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "frontend listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(storefront_server::shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves what `POST /admin/delete-self` would delete.
///
/// Returns `None` when the deployment name or cloud context is unavailable;
/// the route then answers `409 Conflict`.
async fn self_delete_target(
    config: &FrontendConfig,
    metadata: &MetadataClient,
) -> Option<Arc<SelfDeleteTarget>> {
    let Some(service_name) = config.service_name.clone() else {
        tracing::warn!("K_SERVICE is not set; self-deletion unavailable");
        return None;
    };

    let overrides = CloudOverrides {
        project_id: config.project_id.clone(),
        region: config.region.clone(),
    };
    let context = match CloudContext::resolve(&overrides, metadata).await {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!(error = %e, "cloud context unavailable; self-deletion unavailable");
            return None;
        }
    };

    match context.service_account(metadata).await {
        Ok(account) => tracing::info!(service_account = %account, "self-deletion runs as"),
        Err(e) => tracing::debug!(error = %e, "service account unknown"),
    }

    let credentials = Arc::new(Credentials::discover(metadata).await);
    let locator =
        match ServiceLocator::new(&context.project_id, credentials, config.http_timeout_secs) {
            Ok(locator) => locator,
            Err(e) => {
                tracing::warn!(error = %e, "failed to build service locator");
                return None;
            }
        };

    tracing::info!(
        project = %locator.project_id(),
        region = %context.region,
        service = %service_name,
        "self-deletion available"
    );
    Some(Arc::new(SelfDeleteTarget {
        locator: Arc::new(locator),
        region: context.region,
        service_name,
    }))
}
