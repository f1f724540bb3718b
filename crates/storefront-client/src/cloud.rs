//! Project and region the process runs in, resolved once at startup.

use crate::credentials::gcloud;
use crate::error::ClientError;
use crate::metadata::MetadataClient;

/// Values supplied by configuration that take precedence over discovery.
#[derive(Debug, Clone, Default)]
pub struct CloudOverrides {
    pub project_id: Option<String>,
    pub region: Option<String>,
}

/// Google Cloud project and region of this deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudContext {
    pub project_id: String,
    pub region: String,
}

impl CloudContext {
    /// Resolves the context from `overrides`, then the metadata server when it
    /// is reachable, then the local `gcloud` configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if a value is neither overridden nor
    /// discoverable.
    pub async fn resolve(
        overrides: &CloudOverrides,
        metadata: &MetadataClient,
    ) -> Result<Self, ClientError> {
        let on_gcp = if overrides.project_id.is_some() && overrides.region.is_some() {
            false
        } else {
            metadata.is_available().await
        };

        let project_id = match &overrides.project_id {
            Some(p) => p.clone(),
            None if on_gcp => metadata.project_id().await?,
            None => gcloud(&["config", "get-value", "project"]).await?,
        };

        let region = match &overrides.region {
            Some(r) => r.clone(),
            None if on_gcp => metadata.region().await?,
            None => gcloud(&["config", "get-value", "run/region"]).await?,
        };

        tracing::info!(project_id = %project_id, region = %region, "resolved cloud context");
        Ok(Self { project_id, region })
    }

    /// Returns the service account the deployment runs as.
    ///
    /// Off Google Cloud this assumes the Compute Engine default service
    /// account of the project.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if neither the metadata server nor `gcloud`
    /// can provide it.
    pub async fn service_account(&self, metadata: &MetadataClient) -> Result<String, ClientError> {
        if metadata.is_available().await {
            return metadata.service_account_email().await;
        }
        let project_number = gcloud(&[
            "projects",
            "describe",
            &self.project_id,
            "--format",
            "value(projectNumber)",
        ])
        .await?;
        Ok(format!("{project_number}-compute@developer.gserviceaccount.com"))
    }
}
