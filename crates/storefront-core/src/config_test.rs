use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with the frontend's required env vars populated.
fn frontend_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("PRODUCT_API", "https://product-api.example.com");
    m
}

#[test]
fn product_api_defaults() {
    let map = HashMap::new();
    let cfg = build_product_api_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.bind_addr.port(), 8081);
    assert!(cfg.bind_addr.ip().is_unspecified());
    assert_eq!(cfg.catalog_path, PathBuf::from("./products.db"));
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.redirect_root);
    assert!(cfg.request_tracing);
    assert_eq!(cfg.db_max_connections, 4);
}

#[test]
fn product_api_reads_port_and_toggles() {
    let mut map = HashMap::new();
    map.insert("PORT", "9000");
    map.insert("STOREFRONT_REDIRECT_ROOT", "false");
    map.insert("STOREFRONT_REQUEST_TRACING", "0");
    map.insert("STOREFRONT_CATALOG_PATH", "/data/catalog.db");
    let cfg = build_product_api_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.bind_addr.port(), 9000);
    assert!(!cfg.redirect_root);
    assert!(!cfg.request_tracing);
    assert_eq!(cfg.catalog_path, PathBuf::from("/data/catalog.db"));
}

#[test]
fn empty_port_falls_back_to_default() {
    let mut map = HashMap::new();
    map.insert("PORT", "");
    let cfg = build_product_api_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.bind_addr.port(), 8081);
}

#[test]
fn invalid_port_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PORT", "not-a-port");
    let result = build_product_api_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PORT"),
        "expected InvalidEnvVar(PORT), got: {result:?}"
    );
}

#[test]
fn invalid_flag_is_rejected() {
    let mut map = HashMap::new();
    map.insert("STOREFRONT_REDIRECT_ROOT", "maybe");
    let result = build_product_api_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOREFRONT_REDIRECT_ROOT"),
        "expected InvalidEnvVar(STOREFRONT_REDIRECT_ROOT), got: {result:?}"
    );
}

#[test]
fn frontend_requires_product_api() {
    let map = HashMap::new();
    let result = build_frontend_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "PRODUCT_API"),
        "expected MissingEnvVar(PRODUCT_API), got: {result:?}"
    );
}

#[test]
fn frontend_defaults() {
    let map = frontend_env();
    let cfg = build_frontend_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.bind_addr.port(), 8080);
    assert_eq!(cfg.product_api_url, "https://product-api.example.com");
    assert_eq!(cfg.product_api_auth, ProductApiAuth::Auto);
    assert_eq!(cfg.http_timeout_secs, 30);
    assert!(cfg.service_name.is_none());
    assert!(cfg.region.is_none());
    assert!(cfg.project_id.is_none());
    assert!(!cfg.self_delete_route);
    assert_eq!(cfg.metadata_host, "metadata.google.internal");
}

#[test]
fn frontend_accepts_products_url_alias() {
    let mut map = HashMap::new();
    map.insert("PRODUCTS_URL", "http://localhost:8081/");
    let cfg = build_frontend_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.product_api_url, "http://localhost:8081");
}

#[test]
fn frontend_prefers_product_api_over_alias() {
    let mut map = frontend_env();
    map.insert("PRODUCTS_URL", "http://ignored.example.com");
    let cfg = build_frontend_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.product_api_url, "https://product-api.example.com");
}

#[test]
fn frontend_reads_deployment_identity() {
    let mut map = frontend_env();
    map.insert("K_SERVICE", "frontend");
    map.insert("CLOUD_RUN_REGION", "europe-west1");
    map.insert("GOOGLE_CLOUD_PROJECT", "demo-project");
    map.insert("STOREFRONT_SELF_DELETE_ROUTE", "yes");
    let cfg = build_frontend_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.service_name.as_deref(), Some("frontend"));
    assert_eq!(cfg.region.as_deref(), Some("europe-west1"));
    assert_eq!(cfg.project_id.as_deref(), Some("demo-project"));
    assert!(cfg.self_delete_route);
}

#[test]
fn frontend_auth_modes() {
    assert_eq!(parse_product_api_auth("auto").unwrap(), ProductApiAuth::Auto);
    assert_eq!(
        parse_product_api_auth("Identity-Token").unwrap(),
        ProductApiAuth::IdentityToken
    );
    assert_eq!(parse_product_api_auth("none").unwrap(), ProductApiAuth::None);
    assert!(parse_product_api_auth("kerberos").is_err());
}
