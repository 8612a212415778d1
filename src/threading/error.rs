use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole export load.
///
/// Problems with individual day files are not errors; they are logged and
/// the file contributes no messages.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("failed to list {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while reading or writing dumped thread JSON.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid thread JSON: {0}")]
    Json(#[from] serde_json::Error),
}
