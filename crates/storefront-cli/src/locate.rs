use std::sync::Arc;

use anyhow::Context;
use storefront_client::{CloudContext, CloudOverrides, Credentials, MetadataClient, ServiceLocator};

#[derive(Debug)]
pub(crate) struct LocateArgs {
    pub name: String,
    pub region: Option<String>,
    pub project: Option<String>,
    pub metadata_host: String,
    pub timeout_secs: u64,
}

/// Environment variable read when neither `--region` nor `STOREFRONT_REGION`
/// is given, matching the frontend's configuration.
pub(crate) const REGION_ALIAS_ENV: &str = "CLOUD_RUN_REGION";

/// Falls back to [`REGION_ALIAS_ENV`] when no region was passed. Empty values
/// count as unset.
pub(crate) fn region_or_alias(
    region: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    region
        .filter(|r| !r.trim().is_empty())
        .or_else(|| lookup(REGION_ALIAS_ENV).filter(|r| !r.trim().is_empty()))
}

pub(crate) async fn run_locate(args: LocateArgs) -> anyhow::Result<()> {
    let metadata = MetadataClient::new(&args.metadata_host, args.timeout_secs)?;
    let overrides = CloudOverrides {
        project_id: args.project,
        region: region_or_alias(args.region, |key| std::env::var(key).ok()),
    };
    let context = CloudContext::resolve(&overrides, &metadata)
        .await
        .context("resolving project and region")?;

    let credentials = Arc::new(Credentials::discover(&metadata).await);
    let locator = ServiceLocator::new(&context.project_id, credentials, args.timeout_secs)?;
    let url = locator
        .resolve_url(&context.region, &args.name)
        .await
        .with_context(|| format!("locating service {} in {}", args.name, context.region))?;

    println!("{url}");
    Ok(())
}
