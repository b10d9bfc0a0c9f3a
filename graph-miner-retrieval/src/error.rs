//! Error types for graph retrieval.

use std::{io, path::PathBuf};

use graph_miner_core::{RepositoryError, RepositoryErrorCode};
use thiserror::Error;

/// Error produced while downloading a graph or assembling its parameters.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The repository rejected the request.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// Reading or writing a cached file failed.
    #[error("I/O failure on `{path}`: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A remote file could not be fetched.
    #[error("failed to download `{url}`: {message}")]
    Download {
        /// URL that failed.
        url: String,
        /// Description of the failure reported by the client.
        message: String,
    },
    /// A URL has no file name to store its payload under.
    #[error("cannot derive a file name from `{url}`")]
    InvalidUrl {
        /// Offending URL.
        url: String,
    },
    /// The repository declared a different number of storage paths and URLs.
    #[error("{paths} storage paths were given for {urls} URLs")]
    PathCountMismatch {
        /// Number of URLs to download.
        urls: usize,
        /// Number of storage paths supplied.
        paths: usize,
    },
    /// A gzip payload could not be decompressed.
    #[error("failed to decompress `{path}`: {source}")]
    Decompress {
        /// Archive that failed to decode.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: io::Error,
    },
}

graph_miner_core::define_error_codes! {
    /// Stable codes describing [`RetrievalError`] variants.
    enum RetrievalErrorCode for RetrievalError {
        /// The repository rejected the request.
        Repository => Repository(..) => "RETRIEVAL_REPOSITORY",
        /// Reading or writing a cached file failed.
        Io => Io { .. } => "RETRIEVAL_IO",
        /// A remote file could not be fetched.
        Download => Download { .. } => "RETRIEVAL_DOWNLOAD_FAILED",
        /// A URL has no file name to store its payload under.
        InvalidUrl => InvalidUrl { .. } => "RETRIEVAL_INVALID_URL",
        /// Storage paths and URLs disagree in number.
        PathCountMismatch => PathCountMismatch { .. } => "RETRIEVAL_PATH_COUNT_MISMATCH",
        /// A gzip payload could not be decompressed.
        Decompress => Decompress { .. } => "RETRIEVAL_DECOMPRESS_FAILED",
    }
}

impl RetrievalError {
    /// Returns the code of the wrapped repository error, if any.
    #[must_use]
    pub const fn repository_code(&self) -> Option<RepositoryErrorCode> {
        match self {
            Self::Repository(error) => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenient alias for results returned by the retrieval API.
pub type Result<T> = core::result::Result<T, RetrievalError>;
