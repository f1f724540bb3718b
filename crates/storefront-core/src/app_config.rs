use std::net::SocketAddr;
use std::path::PathBuf;

/// How the frontend authenticates to the product API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductApiAuth {
    /// Attach an identity token when running on Google Cloud, plain requests otherwise.
    Auto,
    /// Always attach an identity token scoped to the product API URL.
    IdentityToken,
    /// Never authenticate (local development).
    None,
}

impl std::fmt::Display for ProductApiAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductApiAuth::Auto => write!(f, "auto"),
            ProductApiAuth::IdentityToken => write!(f, "identity-token"),
            ProductApiAuth::None => write!(f, "none"),
        }
    }
}

/// Settings for the product API server.
#[derive(Debug, Clone)]
pub struct ProductApiConfig {
    pub bind_addr: SocketAddr,
    pub catalog_path: PathBuf,
    pub log_level: String,
    /// Redirect `GET /` to `/random/`.
    pub redirect_root: bool,
    pub request_tracing: bool,
    pub db_max_connections: u32,
}

/// Settings for the frontend server.
#[derive(Debug, Clone)]
pub struct FrontendConfig {
    pub bind_addr: SocketAddr,
    /// Base URL of the product API, without the `/random/` suffix.
    pub product_api_url: String,
    pub log_level: String,
    pub request_tracing: bool,
    pub product_api_auth: ProductApiAuth,
    pub http_timeout_secs: u64,
    /// Name of this deployment (`K_SERVICE` on Cloud Run).
    pub service_name: Option<String>,
    /// Region override; resolved from the metadata server or gcloud when unset.
    pub region: Option<String>,
    /// Project override; resolved from the metadata server or gcloud when unset.
    pub project_id: Option<String>,
    pub self_delete_route: bool,
    pub metadata_host: String,
}
