use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service {name} not found in region {region}, project {project}")]
    NotFound {
        name: String,
        region: String,
        project: String,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    Api { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("service {name} in region {region} has no URL yet")]
    MissingServiceUrl { name: String, region: String },

    #[error("gcloud {args} failed: {reason}")]
    Gcloud { args: String, reason: String },
}
