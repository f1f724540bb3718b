use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use storefront_client::ServiceLocator;
use tokio::task::JoinHandle;

use super::AppState;

/// The deployment this frontend runs as, and how to reach its admin API.
pub struct SelfDeleteTarget {
    pub locator: Arc<ServiceLocator>,
    pub region: String,
    pub service_name: String,
}

impl SelfDeleteTarget {
    /// Deletes this deployment on a background task.
    ///
    /// Failures are logged as warnings; nothing is reported to the caller.
    pub fn spawn(&self) -> JoinHandle<()> {
        let locator = Arc::clone(&self.locator);
        let region = self.region.clone();
        let name = self.service_name.clone();

        tokio::spawn(async move {
            match locator.delete_service(&region, &name).await {
                Ok(()) => tracing::info!(region = %region, service = %name, "self-deletion requested"),
                Err(e) => tracing::warn!(
                    region = %region,
                    service = %name,
                    error = %e,
                    "self-deletion failed"
                ),
            }
        })
    }
}

pub(super) async fn delete_self(State(state): State<AppState>) -> impl IntoResponse {
    let Some(target) = state.self_delete.as_deref() else {
        tracing::warn!("self-deletion requested but deployment identity or region is unknown");
        return (
            StatusCode::CONFLICT,
            "deployment identity or region unknown",
        );
    };

    target.spawn();
    (StatusCode::ACCEPTED, "deletion requested")
}
