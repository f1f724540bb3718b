use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Extension,
};
use storefront_server::RequestId;

use super::AppState;
use crate::render::render_index;

pub(super) const RETRIEVAL_ERROR: &str = "Error retrieving products";

pub(super) async fn index(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Response {
    match state.products.get_products().await {
        Ok(products) => Html(render_index(&products)).into_response(),
        Err(e) => {
            tracing::error!(
                request_id = %req_id.0,
                upstream = %state.products.random_url(),
                error = %e,
                "failed to fetch products"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, RETRIEVAL_ERROR).into_response()
        }
    }
}
