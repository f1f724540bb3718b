//! One-shot import of the gzip-compressed product feed into a new catalog.
//!
//! The feed is decoded on a blocking thread and streamed to the catalog writer
//! through a bounded channel, so neither side ever holds more than a handful
//! of records.

pub mod error;
pub mod feed;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use flate2::read::GzDecoder;
use tokio::sync::mpsc;

pub use error::ImportError;
pub use feed::{decode_feed, FeedOutcome, SinkClosed};

/// Maximum number of products written to a catalog, regardless of feed size.
pub const MAX_IMPORTED_PRODUCTS: usize = 5000;

/// Default feed location, relative to the working directory.
pub const DEFAULT_SOURCE_PATH: &str = "./assets/products/products.json.gz";

/// Default catalog location, relative to the working directory.
pub const DEFAULT_DESTINATION_PATH: &str = "./products.db";

const CHANNEL_CAPACITY: usize = 256;
const PROGRESS_EVERY: usize = 1000;

/// Summary of a finished import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    /// `true` when the feed held more than [`MAX_IMPORTED_PRODUCTS`] records.
    pub truncated: bool,
}

/// Imports the product feed at `source` into a new catalog at `destination`.
///
/// All products are written in a single transaction which is committed only
/// after the feed has been read successfully.
///
/// # Errors
///
/// - [`ImportError::AlreadyExists`] if `destination` exists; it is left untouched.
/// - [`ImportError::OpenSource`] if the feed cannot be opened.
/// - [`ImportError::Decode`] if the feed is not valid gzip-compressed JSON
///   or a record does not match the feed format.
/// - [`ImportError::Normalize`] if a record cannot be converted.
/// - [`ImportError::Db`] if the catalog cannot be created or written.
pub async fn import_catalog(
    source: &Path,
    destination: &Path,
) -> Result<ImportReport, ImportError> {
    if matches!(destination.try_exists(), Ok(true)) {
        return Err(ImportError::AlreadyExists(destination.to_path_buf()));
    }

    let file = File::open(source).map_err(|e| ImportError::OpenSource {
        path: source.to_path_buf(),
        source: e,
    })?;

    let pool = storefront_db::create_catalog(destination).await?;
    tracing::info!(
        source = %source.display(),
        destination = %destination.display(),
        "importing products"
    );

    let (sender, mut receiver) = mpsc::channel(CHANNEL_CAPACITY);
    let decoder = tokio::task::spawn_blocking(move || {
        let reader = BufReader::new(GzDecoder::new(file));
        decode_feed(reader, MAX_IMPORTED_PRODUCTS, |raw| {
            sender.blocking_send(raw).map_err(|_| SinkClosed)
        })
    });

    let mut tx = pool.begin().await?;
    let mut imported = 0usize;
    while let Some(raw) = receiver.recv().await {
        let product = storefront_core::normalize_product(raw)?;
        storefront_db::insert_product(&mut *tx, &product).await?;
        imported += 1;
        if imported % PROGRESS_EVERY == 0 {
            tracing::debug!(imported, "import progress");
        }
    }

    let outcome = decoder.await??;
    tx.commit().await?;
    pool.close().await;

    if outcome.truncated {
        tracing::info!(
            cap = MAX_IMPORTED_PRODUCTS,
            "feed holds more products than the catalog cap; remainder skipped"
        );
    }
    tracing::info!(imported, "imported products");

    Ok(ImportReport {
        imported,
        truncated: outcome.truncated,
    })
}
