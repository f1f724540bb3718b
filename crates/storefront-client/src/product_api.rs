//! HTTP client for the product service.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use storefront_core::{Product, ProductApiAuth};

use crate::credentials::Credentials;
use crate::error::ClientError;
use crate::metadata::MetadataClient;

/// Fetches random product samples from the product service.
///
/// When the credentials yield an identity token it is scoped to the base URL
/// and sent as a bearer token, which is what Cloud Run expects for
/// service-to-service calls.
#[derive(Debug, Clone)]
pub struct ProductApiClient {
    client: Client,
    base_url: String,
    credentials: Arc<Credentials>,
}

impl ProductApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        credentials: Arc<Credentials>,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            credentials,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn random_url(&self) -> String {
        format!("{}/random/", self.base_url)
    }

    /// Fetches a random sample of products.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] on a non-success status.
    /// - [`ClientError::Transport`] on network failure.
    /// - [`ClientError::Deserialize`] if the body is not a product list.
    /// - Any token error from the configured credentials.
    pub async fn get_products(&self) -> Result<Vec<Product>, ClientError> {
        let url = self.random_url();
        let mut request = self.client.get(&url);
        if let Some(token) = self.credentials.identity_token(&self.base_url).await? {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: url,
            source: e,
        })
    }
}

/// Chooses the credentials used to call the product service.
///
/// `Auto` authenticates only when the metadata server answers, i.e. when
/// running on Google Cloud.
pub async fn resolve_product_api_credentials(
    mode: ProductApiAuth,
    metadata: &MetadataClient,
) -> Credentials {
    match mode {
        ProductApiAuth::None => Credentials::Anonymous,
        ProductApiAuth::IdentityToken => Credentials::discover(metadata).await,
        ProductApiAuth::Auto => {
            if metadata.is_available().await {
                Credentials::Metadata(metadata.clone())
            } else {
                Credentials::Anonymous
            }
        }
    }
}
