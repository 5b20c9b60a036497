//! Runtime read access to the generated artifacts.
//!
//! ```text
//! ContentReader ──► ArtifactSource::fetch ──► bytes ──► serde_json
//!                        │
//!                        ├── HttpSource  (GET {base}/{artifact})
//!                        └── DirSource   ({dir}/{artifact})
//! ```
//!
//! Every call fetches again; nothing is cached.

mod error;
mod query;
mod source;

pub use error::FetchError;
pub use query::{filter_by_tag, search};
pub use source::{ArtifactSource, DirSource, HttpSource, Source};

use crate::{
    config::{SiteConfig, defaults},
    content::ContentItem,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Index and tags fetched together.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub items: Vec<ContentItem>,
    pub tags: Vec<String>,
}

/// Reads the content index and tag set from an [`ArtifactSource`].
#[derive(Debug, Clone)]
pub struct ContentReader<S = Source> {
    source: S,
    index: PathBuf,
    tags: PathBuf,
}

impl ContentReader<Source> {
    /// Reader for `[reader].source` (or the output directory) using the
    /// configured artifact names.
    pub fn from_config(config: &SiteConfig) -> Result<Self, FetchError> {
        let source = Source::parse(&config.reader_source(), config.reader_timeout())?;
        Ok(Self::new(source).with_artifacts(&config.build.index, &config.build.tags))
    }
}

impl<S: ArtifactSource> ContentReader<S> {
    /// Reader using the default artifact names.
    pub fn new(source: S) -> Self {
        Self {
            source,
            index: defaults::build::index(),
            tags: defaults::build::tags(),
        }
    }

    pub fn with_artifacts(mut self, index: &Path, tags: &Path) -> Self {
        self.index = index.to_path_buf();
        self.tags = tags.to_path_buf();
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// All items, newest first.
    pub fn fetch_all(&self) -> Result<Vec<ContentItem>, FetchError> {
        self.fetch_json(&self.index)
    }

    /// The item whose id is `id`, or `None` if the index has no such item.
    pub fn fetch_by_id(&self, id: &str) -> Result<Option<ContentItem>, FetchError> {
        Ok(self.fetch_all()?.into_iter().find(|item| item.id == id))
    }

    pub fn fetch_tags(&self) -> Result<Vec<String>, FetchError> {
        self.fetch_json(&self.tags)
    }

    /// Fetch index and tags concurrently.
    pub fn fetch_overview(&self) -> Result<Overview, FetchError> {
        let (items, tags) = rayon::join(|| self.fetch_all(), || self.fetch_tags());
        Ok(Overview {
            items: items?,
            tags: tags?,
        })
    }

    fn fetch_json<T: DeserializeOwned>(&self, artifact: &Path) -> Result<T, FetchError> {
        let bytes = self.source.fetch(artifact)?;
        serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode {
            artifact: artifact.display().to_string(),
            source,
        })
    }
}
