//! Client for the Google Cloud instance metadata server.
//!
//! Every request carries `Metadata-Flavor: Google`; the server rejects
//! requests without it.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::ClientError;

const METADATA_FLAVOR: &str = "Metadata-Flavor";
const GOOGLE: &str = "Google";
const AVAILABILITY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

/// Reads project, location and service-account credentials from the
/// metadata server.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    client: Client,
    base_url: String,
}

impl MetadataClient {
    /// Creates a client for the metadata server at `host` (usually
    /// `metadata.google.internal`, or the value of `GCE_METADATA_HOST`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn new(host: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        Self::with_base_url(
            &format!("http://{}/computeMetadata/v1", host.trim_end_matches('/')),
            timeout_secs,
        )
    }

    /// Creates a client rooted at an explicit base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Returns `true` when a metadata server answers, i.e. the process runs on
    /// Google Cloud.
    pub async fn is_available(&self) -> bool {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .header(METADATA_FLAVOR, GOOGLE)
            .timeout(AVAILABILITY_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(resp) => {
                resp.status().is_success()
                    && resp
                        .headers()
                        .get(METADATA_FLAVOR)
                        .and_then(|v| v.to_str().ok())
                        == Some(GOOGLE)
            }
            Err(e) => {
                tracing::debug!(error = %e, "metadata server not reachable");
                false
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the metadata request fails.
    pub async fn project_id(&self) -> Result<String, ClientError> {
        self.get_text("project/project-id", &[]).await
    }

    /// Returns the zone name, e.g. `europe-west1-1`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the metadata request fails.
    pub async fn zone(&self) -> Result<String, ClientError> {
        let raw = self.get_text("instance/zone", &[]).await?;
        // Reported as `projects/<number>/zones/<zone>`.
        Ok(raw.rsplit('/').next().unwrap_or(&raw).to_owned())
    }

    /// Returns the region this instance runs in, derived from its zone.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the metadata request fails.
    pub async fn region(&self) -> Result<String, ClientError> {
        let zone = self.zone().await?;
        Ok(region_from_zone(&zone).to_owned())
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the metadata request fails.
    pub async fn service_account_email(&self) -> Result<String, ClientError> {
        self.get_text("instance/service-accounts/default/email", &[])
            .await
    }

    /// Fetches an OAuth access token for the default service account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the metadata request fails or the response
    /// does not contain a token.
    pub async fn access_token(&self) -> Result<String, ClientError> {
        let body = self
            .get_text("instance/service-accounts/default/token", &[])
            .await?;
        let token: AccessTokenResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: "metadata access token".to_owned(),
                source: e,
            })?;
        Ok(token.access_token)
    }

    /// Fetches an identity token whose audience is `audience`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the metadata request fails.
    pub async fn identity_token(&self, audience: &str) -> Result<String, ClientError> {
        self.get_text(
            "instance/service-accounts/default/identity",
            &[("audience", audience), ("format", "full")],
        )
        .await
    }

    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ClientError> {
        let url = format!("{}/{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(METADATA_FLAVOR, GOOGLE)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.text().await?.trim().to_owned())
    }
}

/// Derives a region from a zone name.
///
/// Zones are the region plus a two-character suffix: `europe-west1-b` on
/// Compute Engine, `europe-west1-1` on Cloud Run.
#[must_use]
pub fn region_from_zone(zone: &str) -> &str {
    zone.len()
        .checked_sub(2)
        .and_then(|end| zone.get(..end))
        .unwrap_or(zone)
}
