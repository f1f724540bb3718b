mod import;
mod locate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Storefront catalog and deployment tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import the product feed into a new catalog database
    Import {
        /// Gzip-compressed JSON product feed
        #[arg(long, default_value = storefront_import::DEFAULT_SOURCE_PATH)]
        source: PathBuf,
        /// Catalog file to create; must not exist yet
        #[arg(long, default_value = storefront_import::DEFAULT_DESTINATION_PATH)]
        destination: PathBuf,
    },
    /// Print the URL of a deployed Cloud Run service
    Locate {
        /// Service name
        #[arg(long)]
        name: String,
        /// Region; falls back to `CLOUD_RUN_REGION`, then the metadata server or `gcloud config get-value run/region`
        #[arg(long, env = "STOREFRONT_REGION")]
        region: Option<String>,
        /// Project; defaults to the metadata server or `gcloud config get-value project`
        #[arg(long, env = "GOOGLE_CLOUD_PROJECT")]
        project: Option<String>,
        /// Metadata server host
        #[arg(long, env = "GCE_METADATA_HOST", default_value = "metadata.google.internal")]
        metadata_host: String,
        /// HTTP timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Import {
            source,
            destination,
        } => import::run_import(&source, &destination).await,
        Commands::Locate {
            name,
            region,
            project,
            metadata_host,
            timeout_secs,
        } => {
            locate::run_locate(locate::LocateArgs {
                name,
                region,
                project,
                metadata_host,
                timeout_secs,
            })
            .await
        }
    }
}

#[cfg(test)]
mod tests;
