//! `[build]` section configuration.
//!
//! Where content is read from and where the index artifacts are written.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in folio.toml - indexer configuration.
///
/// # Example
/// ```toml
/// [build]
/// content = "public/posts"        # markdown posts
/// output = "public"               # served directory
/// index = "posts-index.json"      # sorted content index
/// tags = "tags.json"              # unique tag list
///
/// [build.rss]
/// enable = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Directory holding the content files.
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Directory the artifacts are written to (the served root).
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Extension of eligible content files, without the dot.
    #[serde(default = "defaults::build::extension")]
    #[educe(Default = defaults::build::extension())]
    pub extension: String,

    /// Content index artifact, relative to `output`.
    #[serde(default = "defaults::build::index")]
    #[educe(Default = defaults::build::index())]
    pub index: PathBuf,

    /// Tag set artifact, relative to `output`.
    #[serde(default = "defaults::build::tags")]
    #[educe(Default = defaults::build::tags())]
    pub tags: PathBuf,

    /// RSS feed generation settings.
    #[serde(default)]
    pub rss: RssConfig,
}

/// `[build.rss]` section - RSS feed generation configuration.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RssConfig {
    /// Enable RSS feed generation.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub enable: bool,

    /// Output path for the feed, relative to `output`.
    #[serde(default = "defaults::build::rss::path")]
    #[educe(Default = defaults::build::rss::path())]
    pub path: PathBuf,

    /// URL segment post pages live under: `{base.url}/{link_prefix}/{id}`.
    #[serde(default = "defaults::build::rss::link_prefix")]
    #[educe(Default = defaults::build::rss::link_prefix())]
    pub link_prefix: String,
}
