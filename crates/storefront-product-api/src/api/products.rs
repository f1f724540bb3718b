use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use storefront_server::RequestId;

use super::AppState;

/// Number of products returned by one `/random/` call.
pub(super) const SAMPLE_SIZE: i64 = 10;

pub(super) const RETRIEVAL_ERROR: &str = "Error retrieving products";

pub(super) async fn random_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Response {
    match storefront_db::random_products(&state.pool, SAMPLE_SIZE).await {
        Ok(products) => {
            for product in &products {
                tracing::debug!(
                    product_id = %product.product_id,
                    brand = %product.brand,
                    "serving product"
                );
            }
            Json(products).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "failed to sample products");
            (StatusCode::INTERNAL_SERVER_ERROR, RETRIEVAL_ERROR).into_response()
        }
    }
}
