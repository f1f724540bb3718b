use std::path::PathBuf;

use storefront_core::CoreError;
use storefront_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cowardly refusing to overwrite {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("failed to open product feed {}: {source}", .path.display())]
    OpenSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode product feed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Normalize(#[from] CoreError),

    #[error("catalog write failed: {0}")]
    Db(DbError),

    #[error("feed decoder task failed: {0}")]
    DecoderTask(#[from] tokio::task::JoinError),
}

impl From<DbError> for ImportError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::AlreadyExists(path) => Self::AlreadyExists(path),
            other => Self::Db(other),
        }
    }
}

impl From<sqlx::Error> for ImportError {
    fn from(err: sqlx::Error) -> Self {
        Self::Db(DbError::Sqlx(err))
    }
}
