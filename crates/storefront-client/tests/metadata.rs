//! Integration tests for `MetadataClient` and metadata-backed discovery.

use storefront_client::{
    resolve_product_api_credentials, CloudContext, CloudOverrides, Credentials, MetadataClient,
};
use storefront_core::ProductApiAuth;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> MetadataClient {
    MetadataClient::with_base_url(base_url, 5).expect("client construction should not fail")
}

async fn mount_metadata_root(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("metadata-flavor", "Google"))
        .respond_with(ResponseTemplate::new(200).insert_header("Metadata-Flavor", "Google"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn availability_requires_metadata_flavor_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    assert!(!test_client(&server.uri()).is_available().await);
}

#[tokio::test]
async fn availability_detects_metadata_server() {
    let server = MockServer::start().await;
    mount_metadata_root(&server).await;

    assert!(test_client(&server.uri()).is_available().await);
}

#[tokio::test]
async fn region_is_derived_from_zone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/instance/zone"))
        .and(header("metadata-flavor", "Google"))
        .respond_with(ResponseTemplate::new(200).set_body_string("projects/123456/zones/europe-west1-1"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert_eq!(client.zone().await.unwrap(), "europe-west1-1");
    assert_eq!(client.region().await.unwrap(), "europe-west1");
}

#[tokio::test]
async fn access_token_is_read_from_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/instance/service-accounts/default/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .mount(&server)
        .await;

    let token = test_client(&server.uri()).access_token().await.unwrap();
    assert_eq!(token, "ya29.token");
}

#[tokio::test]
async fn identity_token_is_scoped_to_audience() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/instance/service-accounts/default/identity"))
        .and(query_param("audience", "https://product.example.com"))
        .and(query_param("format", "full"))
        .respond_with(ResponseTemplate::new(200).set_body_string("eyJ.id.token\n"))
        .mount(&server)
        .await;

    let token = test_client(&server.uri())
        .identity_token("https://product.example.com")
        .await
        .unwrap();
    assert_eq!(token, "eyJ.id.token");
}

#[tokio::test]
async fn cloud_context_prefers_overrides() {
    let server = MockServer::start().await;
    // Nothing mounted: any request would return 404 and fail the resolve.
    let overrides = CloudOverrides {
        project_id: Some("override-project".to_owned()),
        region: Some("asia-east1".to_owned()),
    };

    let context = CloudContext::resolve(&overrides, &test_client(&server.uri()))
        .await
        .unwrap();
    assert_eq!(
        context,
        CloudContext {
            project_id: "override-project".to_owned(),
            region: "asia-east1".to_owned(),
        }
    );
}

#[tokio::test]
async fn cloud_context_from_metadata_server() {
    let server = MockServer::start().await;
    mount_metadata_root(&server).await;
    Mock::given(method("GET"))
        .and(path("/project/project-id"))
        .respond_with(ResponseTemplate::new(200).set_body_string("demo-project"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/instance/zone"))
        .respond_with(ResponseTemplate::new(200).set_body_string("projects/1/zones/us-central1-1"))
        .mount(&server)
        .await;

    let context = CloudContext::resolve(&CloudOverrides::default(), &test_client(&server.uri()))
        .await
        .unwrap();
    assert_eq!(context.project_id, "demo-project");
    assert_eq!(context.region, "us-central1");
}

#[tokio::test]
async fn auto_auth_uses_metadata_on_google_cloud() {
    let server = MockServer::start().await;
    mount_metadata_root(&server).await;

    let creds =
        resolve_product_api_credentials(ProductApiAuth::Auto, &test_client(&server.uri())).await;
    assert!(matches!(creds, Credentials::Metadata(_)));
}

#[tokio::test]
async fn auto_auth_is_anonymous_elsewhere() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let creds =
        resolve_product_api_credentials(ProductApiAuth::Auto, &test_client(&server.uri())).await;
    assert!(matches!(creds, Credentials::Anonymous));
}

#[tokio::test]
async fn disabled_auth_is_anonymous() {
    let server = MockServer::start().await;
    mount_metadata_root(&server).await;

    let creds =
        resolve_product_api_credentials(ProductApiAuth::None, &test_client(&server.uri())).await;
    assert!(matches!(creds, Credentials::Anonymous));
}

#[tokio::test]
async fn service_account_from_metadata_server() {
    let server = MockServer::start().await;
    mount_metadata_root(&server).await;
    Mock::given(method("GET"))
        .and(path("/instance/service-accounts/default/email"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("frontend@demo-project.iam.gserviceaccount.com"),
        )
        .mount(&server)
        .await;

    let metadata = test_client(&server.uri());
    let context = CloudContext {
        project_id: "demo-project".to_owned(),
        region: "europe-west1".to_owned(),
    };
    assert_eq!(
        context.service_account(&metadata).await.unwrap(),
        "frontend@demo-project.iam.gserviceaccount.com"
    );
}
