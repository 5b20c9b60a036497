//! Where artifacts are fetched from.
//!
//! | Location                 | Source       |
//! |--------------------------|--------------|
//! | `http://…`, `https://…`  | [`HttpSource`] |
//! | anything else            | [`DirSource`]  |

use super::FetchError;
use std::{
    fs,
    path::{Component, Path, PathBuf},
    time::Duration,
};

/// Raw access to a named artifact.
pub trait ArtifactSource: Send + Sync {
    /// Fetch the bytes of `artifact` (a path relative to the source root).
    fn fetch(&self, artifact: &Path) -> Result<Vec<u8>, FetchError>;
}

// ============================================================================
// HTTP
// ============================================================================

/// Artifacts served under a base URL: `GET {base}/{artifact}`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            base: base.trim_end_matches('/').to_owned(),
            client,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// URL of `artifact`, each path segment percent-encoded.
    pub fn url_for(&self, artifact: &Path) -> String {
        let mut url = self.base.clone();
        for component in artifact.components() {
            if let Component::Normal(segment) = component {
                url.push('/');
                url.push_str(&urlencoding::encode(&segment.to_string_lossy()));
            }
        }
        url
    }
}

impl ArtifactSource for HttpSource {
    fn fetch(&self, artifact: &Path) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(artifact);
        let response = self.client.get(&url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.bytes()?.to_vec())
    }
}

// ============================================================================
// Directory
// ============================================================================

/// Artifacts in a local directory, typically the indexer output.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSource for DirSource {
    fn fetch(&self, artifact: &Path) -> Result<Vec<u8>, FetchError> {
        let path = self.dir.join(artifact);
        fs::read(&path).map_err(|source| FetchError::Io { path, source })
    }
}

// ============================================================================
// Either
// ============================================================================

/// A source picked from a location string.
#[derive(Debug, Clone)]
pub enum Source {
    Http(HttpSource),
    Dir(DirSource),
}

impl Source {
    /// `http://` and `https://` locations are fetched over HTTP with
    /// `timeout`; everything else is read as a directory.
    pub fn parse(location: &str, timeout: Duration) -> Result<Self, FetchError> {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            HttpSource::new(location, timeout).map(Self::Http)
        } else {
            Ok(Self::Dir(DirSource::new(location)))
        }
    }
}

impl ArtifactSource for Source {
    fn fetch(&self, artifact: &Path) -> Result<Vec<u8>, FetchError> {
        match self {
            Self::Http(source) => source.fetch(artifact),
            Self::Dir(source) => source.fetch(artifact),
        }
    }
}
