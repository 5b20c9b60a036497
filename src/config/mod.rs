//! Site configuration management for `folio.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[base]`    | Site metadata (title, author, url)               |
//! | `[build]`   | Content/output paths, artifact names, RSS        |
//! | `[serve]`   | Preview server (port, interface, watch)          |
//! | `[reader]`  | Where query commands fetch artifacts from        |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Jane Doe"
//! url = "https://janedoe.dev"
//!
//! [build]
//! content = "public/posts"
//! output = "public"
//!
//! [build.rss]
//! enable = true
//!
//! [serve]
//! port = 5277
//! ```

mod base;
mod build;
pub mod defaults;
mod error;
mod reader;
mod serve;

pub use base::BaseConfig;
pub use build::{BuildConfig, RssConfig};
pub use error::ConfigError;
pub use reader::ReaderConfig;
pub use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Component, Path, PathBuf},
    time::Duration,
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Indexer settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Preview server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Query command settings
    #[serde(default)]
    pub reader: ReaderConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load `folio.toml` (or the `-C` override) under the CLI root, falling
    /// back to defaults when the file does not exist.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Absolute path of the content index artifact.
    pub fn index_path(&self) -> PathBuf {
        self.build.output.join(&self.build.index)
    }

    /// Absolute path of the tag set artifact.
    pub fn tags_path(&self) -> PathBuf {
        self.build.output.join(&self.build.tags)
    }

    /// Absolute path of the rss feed.
    pub fn rss_path(&self) -> PathBuf {
        self.build.output.join(&self.build.rss.path)
    }

    /// Artifact location for the query commands: `[reader].source`, or the
    /// output directory.
    pub fn reader_source(&self) -> String {
        self.reader
            .source
            .clone()
            .unwrap_or_else(|| self.build.output.to_string_lossy().into_owned())
    }

    pub fn reader_timeout(&self) -> Duration {
        Duration::from_secs(self.reader.timeout)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => {
                let base = cli
                    .root
                    .clone()
                    .unwrap_or_else(|| self.get_root().to_owned());
                base.join(name)
            }
            _ => cli
                .root
                .clone()
                .unwrap_or_else(|| self.get_root().to_owned()),
        };

        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
        self.config_path = cli.config.clone();
        self.update_path_with_root(&root);

        match &cli.command {
            Commands::Index { rss } => {
                Self::update_option(&mut self.build.rss.enable, rss.as_ref());
            }
            Commands::Serve {
                interface,
                port,
                watch,
            } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.watch, watch.as_ref());
            }
            _ => {}
        }

        if let Some(from) = cli.reader_args().and_then(|r| r.from.as_ref()) {
            self.reader.source = Some(from.clone());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve config/content/output against `root` and normalize to
    /// absolute paths.
    pub fn update_path_with_root(&mut self, root: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(&self.config_path));
        self.build.content = Self::normalize_path(&root.join(&self.build.content));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration values that serde cannot check.
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        if self.build.rss.enable && self.base.url.is_none() {
            bail!(ConfigError::Validation(
                "[base.url] is required for RSS generation".into()
            ));
        }

        let extension = &self.build.extension;
        if extension.is_empty() || extension.contains(['.', '/', '\\']) {
            bail!(ConfigError::Validation(
                "[build.extension] must be a bare extension such as \"md\"".into()
            ));
        }

        Self::check_artifact_path("[build.index]", &self.build.index)?;
        Self::check_artifact_path("[build.tags]", &self.build.tags)?;
        Self::check_artifact_path("[build.rss.path]", &self.build.rss.path)?;

        let mut artifacts = vec![
            ("[build.index]", &self.build.index),
            ("[build.tags]", &self.build.tags),
        ];
        if self.build.rss.enable {
            artifacts.push(("[build.rss.path]", &self.build.rss.path));
        }
        for (i, (field, path)) in artifacts.iter().enumerate() {
            let path = Self::artifact_key(path);
            for (other_field, other) in &artifacts[i + 1..] {
                let other = Self::artifact_key(other);
                if path.starts_with(&other) || other.starts_with(&path) {
                    bail!(ConfigError::Validation(format!(
                        "{field} and {other_field} must name different files"
                    )));
                }
            }
        }

        if self.reader.timeout == 0 {
            bail!(ConfigError::Validation(
                "[reader.timeout] must be at least 1 second".into()
            ));
        }

        Ok(())
    }

    /// Artifacts live inside the output directory: relative, no `..`.
    fn check_artifact_path(field: &str, path: &Path) -> Result<()> {
        let inside_output = !path.as_os_str().is_empty()
            && path
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !inside_output {
            bail!(ConfigError::Validation(format!(
                "{field} must be a relative path inside the output directory"
            )));
        }
        Ok(())
    }

    /// `path` without `.` components, for comparing artifact locations.
    fn artifact_key(path: &Path) -> PathBuf {
        path.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn validation_message(config: &SiteConfig) -> String {
        config.validate().unwrap_err().to_string()
    }

    #[test]
    fn test_from_str() {
        let config = SiteConfig::from_str(
            r#"
            [base]
            title = "Jane Doe"
            url = "https://janedoe.dev"
        "#,
        )
        .unwrap();

        assert_eq!(config.base.title, "Jane Doe");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_str_rejects_unknown_section() {
        let err = SiteConfig::from_str("[deploy]\nforce = true").unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SiteConfig::from_path(Path::new("/definitely/not/here/folio.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Io(..))
        ));
    }

    #[test]
    fn test_update_with_cli_resolves_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let cli = Cli::parse_from(["folio", "--root", root, "-c", "posts", "index", "--rss"]);

        let mut config = SiteConfig::default();
        config.update_with_cli(&cli);

        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.get_root(), root);
        assert_eq!(config.build.content, root.join("posts"));
        assert_eq!(config.build.output, root.join("public"));
        assert_eq!(config.config_path, root.join("folio.toml"));
        assert_eq!(config.index_path(), root.join("public/posts-index.json"));
        assert_eq!(config.tags_path(), root.join("public/tags.json"));
        assert_eq!(config.rss_path(), root.join("public/feed.xml"));
        assert!(config.build.rss.enable);
    }

    #[test]
    fn test_update_with_cli_init_name() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let cli = Cli::parse_from(["folio", "--root", root, "init", "mysite"]);

        let mut config = SiteConfig::default();
        config.update_with_cli(&cli);

        let expected = dir.path().canonicalize().unwrap().join("mysite");
        assert_eq!(config.get_root(), expected);
        assert_eq!(config.config_path, expected.join("folio.toml"));
    }

    #[test]
    fn test_update_with_cli_serve_and_reader() {
        let cli = Cli::parse_from(["folio", "serve", "-i", "0.0.0.0", "-p", "9000", "-w", "false"]);
        let mut config = SiteConfig::default();
        config.update_with_cli(&cli);

        assert_eq!(config.serve.interface, "0.0.0.0");
        assert_eq!(config.serve.port, 9000);
        assert!(!config.serve.watch);

        let cli = Cli::parse_from(["folio", "tags", "--from", "http://localhost:5277"]);
        let mut config = SiteConfig::default();
        config.update_with_cli(&cli);
        assert_eq!(config.reader_source(), "http://localhost:5277");
    }

    #[test]
    fn test_reader_source_defaults_to_output() {
        let cli = Cli::parse_from(["folio", "-o", "/srv/site", "list"]);
        let mut config = SiteConfig::default();
        config.update_with_cli(&cli);

        assert_eq!(config.reader_source(), "/srv/site");
        assert_eq!(config.reader_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let mut config = SiteConfig::default();
        config.base.url = Some("janedoe.dev".into());
        assert!(validation_message(&config).contains("[base.url]"));
    }

    #[test]
    fn test_validate_rss_requires_url() {
        let mut config = SiteConfig::default();
        config.build.rss.enable = true;
        assert!(validation_message(&config).contains("RSS"));

        config.base.url = Some("https://janedoe.dev".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_extension() {
        let mut config = SiteConfig::default();
        for bad in ["", ".md", "a/b"] {
            config.build.extension = bad.into();
            assert!(validation_message(&config).contains("[build.extension]"));
        }
        config.build.extension = "markdown".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_artifact_paths() {
        let mut config = SiteConfig::default();
        config.build.index = PathBuf::from("../escape.json");
        assert!(validation_message(&config).contains("[build.index]"));

        let mut config = SiteConfig::default();
        config.build.tags = PathBuf::from("/abs/tags.json");
        assert!(validation_message(&config).contains("[build.tags]"));

        let mut config = SiteConfig::default();
        config.build.tags = config.build.index.clone();
        assert!(validation_message(&config).contains("different files"));

        let mut config = SiteConfig::default();
        config.build.index = PathBuf::from("data/posts.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_artifact_collisions() {
        fn rss_config() -> SiteConfig {
            let mut config = SiteConfig::default();
            config.base.url = Some("https://example.com".into());
            config.build.rss.enable = true;
            config
        }

        let mut config = rss_config();
        config.build.rss.path = PathBuf::from("tags.json");
        let message = validation_message(&config);
        assert!(message.contains("[build.tags] and [build.rss.path]"));

        let mut config = rss_config();
        config.build.rss.path = config.build.index.clone();
        assert!(validation_message(&config).contains("[build.index] and [build.rss.path]"));

        let mut config = SiteConfig::default();
        config.build.tags = PathBuf::from("./posts-index.json");
        assert!(validation_message(&config).contains("different files"));

        let mut config = SiteConfig::default();
        config.build.tags = PathBuf::from("posts-index.json/tags.json");
        assert!(validation_message(&config).contains("different files"));

        // A disabled feed never gets written, so its path cannot collide.
        let mut config = SiteConfig::default();
        config.build.rss.path = PathBuf::from("tags.json");
        assert!(config.validate().is_ok());

        assert!(rss_config().validate().is_ok());
    }

    #[test]
    fn test_validate_timeout() {
        let mut config = SiteConfig::default();
        config.reader.timeout = 0;
        assert!(validation_message(&config).contains("[reader.timeout]"));
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let text = toml::to_string_pretty(&SiteConfig::default()).unwrap();
        let parsed = SiteConfig::from_str(&text).unwrap();
        assert_eq!(parsed.build.index, PathBuf::from("posts-index.json"));
        assert_eq!(parsed.serve.port, 5277);
    }
}
