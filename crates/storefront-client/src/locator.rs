//! Looks up and deletes Cloud Run services through the Cloud Run admin API.
//!
//! Service URLs are assigned at first deploy and never change afterwards, so
//! resolved URLs are memoized per `(region, name)` for the lifetime of the
//! locator.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;

use crate::credentials::Credentials;
use crate::error::ClientError;

/// Where admin API requests are sent.
#[derive(Debug, Clone)]
pub enum RunEndpoint {
    /// `https://{region}-run.googleapis.com`, one endpoint per region.
    Regional,
    /// A single base URL for every region (for testing with wiremock).
    Fixed(String),
}

impl RunEndpoint {
    fn base_url(&self, region: &str) -> String {
        match self {
            RunEndpoint::Regional => format!("https://{region}-run.googleapis.com"),
            RunEndpoint::Fixed(base) => base.trim_end_matches('/').to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ServiceKey {
    region: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ServiceItem {
    status: Option<ServiceStatus>,
}

#[derive(Debug, Deserialize)]
struct ServiceStatus {
    url: Option<String>,
}

/// Resolves Cloud Run service names to URLs within one project.
pub struct ServiceLocator {
    client: Client,
    credentials: Arc<Credentials>,
    project_id: String,
    endpoint: RunEndpoint,
    cache: RwLock<HashMap<ServiceKey, String>>,
}

impl ServiceLocator {
    /// Creates a locator for `project_id` talking to the regional admin API.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        project_id: &str,
        credentials: Arc<Credentials>,
        timeout_secs: u64,
    ) -> Result<Self, ClientError> {
        Self::with_endpoint(project_id, credentials, timeout_secs, RunEndpoint::Regional)
    }

    /// Creates a locator with an explicit admin API endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn with_endpoint(
        project_id: &str,
        credentials: Arc<Credentials>,
        timeout_secs: u64,
        endpoint: RunEndpoint,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            credentials,
            project_id: project_id.to_owned(),
            endpoint,
            cache: RwLock::new(HashMap::new()),
        })
    }

    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Admin API URL of service `name` in `region`.
    #[must_use]
    pub fn service_url(&self, region: &str, name: &str) -> String {
        format!(
            "{}/apis/serving.knative.dev/v1/namespaces/{}/services/{name}",
            self.endpoint.base_url(region),
            self.project_id,
        )
    }

    /// Returns the cached URL for `(region, name)` without any network call.
    #[must_use]
    pub fn cached_url(&self, region: &str, name: &str) -> Option<String> {
        let key = ServiceKey {
            region: region.to_owned(),
            name: name.to_owned(),
        };
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    /// Returns the public URL of service `name` in `region`.
    ///
    /// Served from the cache when the pair was resolved before. Concurrent
    /// first lookups of the same pair may each call the admin API.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] if the service does not exist.
    /// - [`ClientError::Api`] on any other non-success status.
    /// - [`ClientError::MissingServiceUrl`] if the service has no URL yet.
    /// - [`ClientError::Transport`] on network failure.
    /// - [`ClientError::Deserialize`] if the response is not a service.
    pub async fn resolve_url(&self, region: &str, name: &str) -> Result<String, ClientError> {
        if let Some(url) = self.cached_url(region, name) {
            tracing::debug!(region, name, url = %url, "service URL from cache");
            return Ok(url);
        }

        let api_url = self.service_url(region, name);
        let response = self.request(Method::GET, &api_url).await?.send().await?;
        self.check_status(response.status(), region, name, &api_url)?;

        let body = response.text().await?;
        let item: ServiceItem =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: format!("service {name} in {region}"),
                source: e,
            })?;

        let url = item
            .status
            .and_then(|s| s.url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ClientError::MissingServiceUrl {
                name: name.to_owned(),
                region: region.to_owned(),
            })?;

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                ServiceKey {
                    region: region.to_owned(),
                    name: name.to_owned(),
                },
                url.clone(),
            );
        tracing::debug!(region, name, url = %url, "resolved service URL");
        Ok(url)
    }

    /// Deletes service `name` in `region`. The URL cache is left as is.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] if the service does not exist.
    /// - [`ClientError::Api`] on any other non-success status.
    /// - [`ClientError::Transport`] on network failure.
    pub async fn delete_service(&self, region: &str, name: &str) -> Result<(), ClientError> {
        let api_url = self.service_url(region, name);
        let response = self
            .request(Method::DELETE, &api_url)
            .await?
            .send()
            .await?;
        self.check_status(response.status(), region, name, &api_url)?;
        tracing::info!(region, name, "deleted service");
        Ok(())
    }

    async fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, ClientError> {
        let builder = self.client.request(method, url);
        Ok(match self.credentials.access_token().await? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    fn check_status(
        &self,
        status: StatusCode,
        region: &str,
        name: &str,
        url: &str,
    ) -> Result<(), ClientError> {
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                name: name.to_owned(),
                region: region.to_owned(),
                project: self.project_id.clone(),
            });
        }
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(())
    }
}
