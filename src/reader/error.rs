//! Reader error types.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to fetch or decode an artifact. Never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("`{url}` answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("cannot read `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{artifact}` is not a valid artifact: {source}")]
    Decode {
        artifact: String,
        #[source]
        source: serde_json::Error,
    },
}
