mod products;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use storefront_core::ProductApiConfig;
use storefront_server::request_id;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

/// Router toggles taken from [`ProductApiConfig`].
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    pub redirect_root: bool,
    pub request_tracing: bool,
}

impl RouterOptions {
    #[must_use]
    pub fn from_config(config: &ProductApiConfig) -> Self {
        Self {
            redirect_root: config.redirect_root,
            request_tracing: config.request_tracing,
        }
    }
}

pub fn build_app(state: AppState, options: RouterOptions) -> Router {
    let mut router = Router::new()
        .route("/random/", get(products::random_products))
        .route("/random", get(products::random_products))
        .route("/healthz", get(health));

    if options.redirect_root {
        router = router.route("/", get(|| async { Redirect::temporary("/random/") }));
    }

    router = router.layer(axum::middleware::from_fn(request_id));
    if options.request_tracing {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match storefront_db::health_check(&state.pool).await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!(error = %e, "health check: catalog unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, "catalog unavailable")
        }
    }
}
