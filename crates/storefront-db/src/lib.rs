use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 4;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Path relative to crates/storefront-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &storefront_core::ProductApiConfig) -> Self {
        Self {
            max_connections: config.db_max_connections.max(1),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("catalog {} already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("failed to inspect catalog path {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Create a new catalog database at `path` and apply the schema.
///
/// The importer owns the catalog exclusively while writing, so the pool holds
/// a single connection.
///
/// # Errors
///
/// Returns [`DbError::AlreadyExists`] if anything already exists at `path`,
/// [`DbError::Sqlx`] if the file cannot be created, or
/// [`DbError::Migration`] if the schema cannot be applied.
pub async fn create_catalog(path: &Path) -> Result<SqlitePool, DbError> {
    let exists = path.try_exists().map_err(|source| DbError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if exists {
        return Err(DbError::AlreadyExists(path.to_path_buf()));
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Open an existing catalog for serving.
///
/// Connections are opened read-only with an in-memory journal and
/// `query_only` set, so nothing served from this pool can modify the file.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the file does not exist or cannot be opened.
pub async fn open_catalog_read_only(
    path: &Path,
    config: PoolConfig,
) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(false)
        .read_only(true)
        .journal_mode(SqliteJournalMode::Memory)
        .pragma("query_only", "true");

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Run all pending migrations against the pool.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Run a full health check: ping the pool and return a typed error on failure.
///
/// # Errors
///
/// Returns [`DbError`] if the ping fails.
pub async fn health_check(pool: &SqlitePool) -> Result<(), DbError> {
    ping(pool).await?;
    Ok(())
}

pub mod products;

pub use products::{count_products, insert_product, random_products, ProductRow};
