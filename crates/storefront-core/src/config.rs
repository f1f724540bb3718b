use std::env::VarError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::app_config::{FrontendConfig, ProductApiAuth, ProductApiConfig};
use crate::ConfigError;

const PRODUCT_API_DEFAULT_PORT: &str = "8081";
const FRONTEND_DEFAULT_PORT: &str = "8080";
const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";

/// Load product API configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed.
pub fn load_product_api_config() -> Result<ProductApiConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_product_api_config_from_env()
}

/// Load product API configuration from the current process environment only.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed.
pub fn load_product_api_config_from_env() -> Result<ProductApiConfig, ConfigError> {
    build_product_api_config(|key| std::env::var(key))
}

/// Load frontend configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if `PRODUCT_API` is missing or a value cannot be parsed.
pub fn load_frontend_config() -> Result<FrontendConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_frontend_config_from_env()
}

/// Load frontend configuration from the current process environment only.
///
/// # Errors
///
/// Returns `ConfigError` if `PRODUCT_API` is missing or a value cannot be parsed.
pub fn load_frontend_config_from_env() -> Result<FrontendConfig, ConfigError> {
    build_frontend_config(|key| std::env::var(key))
}

/// Typed accessors over an env-var lookup function.
///
/// Empty values are treated as unset, matching how `PORT=` behaves on most
/// platforms.
struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    fn optional(&self, var: &str) -> Option<String> {
        (self.lookup)(var)
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    }

    fn or_default(&self, var: &str, default: &str) -> String {
        self.optional(var).unwrap_or_else(|| default.to_owned())
    }

    fn parse<T>(&self, var: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(var, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_owned(),
                reason: e.to_string(),
            })
    }

    fn flag(&self, var: &str, default: bool) -> Result<bool, ConfigError> {
        match self.optional(var) {
            None => Ok(default),
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidEnvVar {
                var: var.to_owned(),
                reason: format!("expected a boolean, got {raw:?}"),
            }),
        }
    }

    fn listen_addr(&self, default_port: &str) -> Result<SocketAddr, ConfigError> {
        let port: u16 = self.parse("PORT", default_port)?;
        Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port))
    }
}

/// Build product API configuration from the provided env-var lookup function.
fn build_product_api_config<F>(lookup: F) -> Result<ProductApiConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let env = Env { lookup };

    Ok(ProductApiConfig {
        bind_addr: env.listen_addr(PRODUCT_API_DEFAULT_PORT)?,
        catalog_path: PathBuf::from(env.or_default("STOREFRONT_CATALOG_PATH", "./products.db")),
        log_level: env.or_default("STOREFRONT_LOG_LEVEL", "info"),
        redirect_root: env.flag("STOREFRONT_REDIRECT_ROOT", true)?,
        request_tracing: env.flag("STOREFRONT_REQUEST_TRACING", true)?,
        db_max_connections: env.parse("STOREFRONT_DB_MAX_CONNECTIONS", "4")?,
    })
}

/// Build frontend configuration from the provided env-var lookup function.
///
/// `PRODUCT_API` takes precedence over its older alias `PRODUCTS_URL`.
fn build_frontend_config<F>(lookup: F) -> Result<FrontendConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let env = Env { lookup };

    let product_api_url = env
        .optional("PRODUCT_API")
        .or_else(|| env.optional("PRODUCTS_URL"))
        .ok_or_else(|| ConfigError::MissingEnvVar("PRODUCT_API".to_owned()))?
        .trim_end_matches('/')
        .to_owned();

    let product_api_auth =
        parse_product_api_auth(&env.or_default("STOREFRONT_PRODUCT_API_AUTH", "auto"))?;

    Ok(FrontendConfig {
        bind_addr: env.listen_addr(FRONTEND_DEFAULT_PORT)?,
        product_api_url,
        log_level: env.or_default("STOREFRONT_LOG_LEVEL", "info"),
        request_tracing: env.flag("STOREFRONT_REQUEST_TRACING", true)?,
        product_api_auth,
        http_timeout_secs: env.parse("STOREFRONT_HTTP_TIMEOUT_SECS", "30")?,
        service_name: env.optional("K_SERVICE"),
        region: env
            .optional("STOREFRONT_REGION")
            .or_else(|| env.optional("CLOUD_RUN_REGION")),
        project_id: env.optional("GOOGLE_CLOUD_PROJECT"),
        self_delete_route: env.flag("STOREFRONT_SELF_DELETE_ROUTE", false)?,
        metadata_host: env.or_default("GCE_METADATA_HOST", DEFAULT_METADATA_HOST),
    })
}

fn parse_product_api_auth(s: &str) -> Result<ProductApiAuth, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "auto" => Ok(ProductApiAuth::Auto),
        "identity-token" | "id-token" => Ok(ProductApiAuth::IdentityToken),
        "none" | "off" => Ok(ProductApiAuth::None),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_PRODUCT_API_AUTH".to_owned(),
            reason: format!("expected auto, identity-token or none, got {other:?}"),
        }),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
