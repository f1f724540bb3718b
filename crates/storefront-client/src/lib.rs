//! Outbound HTTP clients: the product service, the Cloud Run admin API and
//! the Google Cloud metadata server.

pub mod cloud;
pub mod credentials;
pub mod error;
pub mod locator;
pub mod metadata;
pub mod product_api;

pub use cloud::{CloudContext, CloudOverrides};
pub use credentials::Credentials;
pub use error::ClientError;
pub use locator::{RunEndpoint, ServiceLocator};
pub use metadata::{region_from_zone, MetadataClient};
pub use product_api::{resolve_product_api_credentials, ProductApiClient};
