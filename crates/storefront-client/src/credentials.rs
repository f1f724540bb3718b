//! Ambient Google Cloud credentials.
//!
//! On Google Cloud tokens come from the metadata server; on a developer
//! machine they come from the `gcloud` CLI.

use tokio::process::Command;

use crate::error::ClientError;
use crate::metadata::MetadataClient;

/// Source of OAuth access tokens and identity tokens.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Default service account of the instance, via the metadata server.
    Metadata(MetadataClient),
    /// Active account of the local `gcloud` installation.
    Gcloud,
    /// Fixed bearer token, used for both token kinds.
    Static(String),
    /// No authentication; requests are sent without `Authorization`.
    Anonymous,
}

impl Credentials {
    /// Picks [`Credentials::Metadata`] when the metadata server answers and
    /// [`Credentials::Gcloud`] otherwise.
    pub async fn discover(metadata: &MetadataClient) -> Self {
        if metadata.is_available().await {
            tracing::debug!("using metadata server credentials");
            Credentials::Metadata(metadata.clone())
        } else {
            tracing::debug!("metadata server unavailable; using gcloud credentials");
            Credentials::Gcloud
        }
    }

    /// Returns an OAuth access token, or `None` for anonymous credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the token source fails.
    pub async fn access_token(&self) -> Result<Option<String>, ClientError> {
        match self {
            Credentials::Metadata(metadata) => metadata.access_token().await.map(Some),
            Credentials::Gcloud => gcloud(&["auth", "print-access-token"]).await.map(Some),
            Credentials::Static(token) => Ok(Some(token.clone())),
            Credentials::Anonymous => Ok(None),
        }
    }

    /// Returns an identity token for `audience`, or `None` for anonymous
    /// credentials.
    ///
    /// `gcloud` user accounts cannot mint tokens for an arbitrary audience, so
    /// the gcloud variant ignores `audience`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the token source fails.
    pub async fn identity_token(&self, audience: &str) -> Result<Option<String>, ClientError> {
        match self {
            Credentials::Metadata(metadata) => metadata.identity_token(audience).await.map(Some),
            Credentials::Gcloud => gcloud(&["auth", "print-identity-token"]).await.map(Some),
            Credentials::Static(token) => Ok(Some(token.clone())),
            Credentials::Anonymous => Ok(None),
        }
    }
}

/// Runs `gcloud` with `args` and returns its trimmed standard output.
pub(crate) async fn gcloud(args: &[&str]) -> Result<String, ClientError> {
    let joined = args.join(" ");
    let output = Command::new("gcloud")
        .args(args)
        .output()
        .await
        .map_err(|e| ClientError::Gcloud {
            args: joined.clone(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(ClientError::Gcloud {
            args: joined,
            reason: format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    // Token commands would leak secrets into the log.
    if args.first() != Some(&"auth") {
        tracing::debug!(args = %joined, result = %value, "gcloud");
    }
    Ok(value)
}
