mod admin;
mod index;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use storefront_client::ProductApiClient;
use storefront_core::FrontendConfig;
use storefront_server::request_id;
use tower_http::trace::TraceLayer;

pub use admin::SelfDeleteTarget;

#[derive(Clone)]
pub struct AppState {
    pub products: ProductApiClient,
    /// `None` when the deployment identity or region could not be determined.
    pub self_delete: Option<Arc<SelfDeleteTarget>>,
}

/// Router toggles taken from [`FrontendConfig`].
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    pub request_tracing: bool,
    pub self_delete_route: bool,
}

impl RouterOptions {
    #[must_use]
    pub fn from_config(config: &FrontendConfig) -> Self {
        Self {
            request_tracing: config.request_tracing,
            self_delete_route: config.self_delete_route,
        }
    }
}

pub fn build_app(state: AppState, options: RouterOptions) -> Router {
    let mut router = Router::new()
        .route("/", get(index::index))
        .route("/healthz", get(health));

    if options.self_delete_route {
        router = router.route("/admin/delete-self", post(admin::delete_self));
    }

    router = router.layer(axum::middleware::from_fn(request_id));
    if options.request_tracing {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
