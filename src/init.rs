//! Site initialization module.
//!
//! Creates the content directory and a default configuration.

use crate::config::SiteConfig;
use anyhow::{Context, Result, bail};
use std::fs;

/// Sample post written into a fresh content directory.
const SAMPLE_POST: &str = "\
---
title: Hello, world
date: 2024-01-01
tags: [meta]
summary: The first post.
---
Write posts as markdown files in this directory, then run `folio index`.
";

const SAMPLE_POST_NAME: &str = "hello-world";

/// Create a new site at `config`'s root.
///
/// Refuses to touch a root that already has a config file or a content
/// directory.
pub fn new_site(config: &SiteConfig) -> Result<()> {
    let root = config.get_root();

    if config.config_path.exists() {
        bail!(
            "Config file `{}` already exists. Remove it manually or init in a different path.",
            config.config_path.display()
        );
    }

    let content = &config.build.content;
    if content.exists() {
        bail!(
            "Path `{}` already exists. Try `folio init <SITE_NAME>` instead.",
            content.display()
        );
    }

    fs::create_dir_all(content)
        .with_context(|| format!("Failed to create {}", content.display()))?;

    let post = content.join(SAMPLE_POST_NAME).with_extension(&config.build.extension);
    fs::write(&post, SAMPLE_POST).with_context(|| format!("Failed to write {}", post.display()))?;

    init_default_config(config)?;

    crate::log!("init"; "created site at {}", root.display());
    Ok(())
}

/// Write default configuration file
fn init_default_config(config: &SiteConfig) -> Result<()> {
    let content = toml::to_string_pretty(&SiteConfig::default())?;
    if let Some(parent) = config.config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&config.config_path, content)
        .with_context(|| format!("Failed to write {}", config.config_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn init_config(root: &std::path::Path) -> SiteConfig {
        let cli = Cli::parse_from(["folio", "--root", root.to_str().unwrap(), "init", "mysite"]);
        let mut config = SiteConfig::default();
        config.update_with_cli(&cli);
        config
    }

    #[test]
    fn test_new_site_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let config = init_config(dir.path());

        new_site(&config).unwrap();

        let site = dir.path().canonicalize().unwrap().join("mysite");
        assert!(site.join("folio.toml").is_file());
        assert!(site.join("public/posts/hello-world.md").is_file());

        let written = SiteConfig::from_path(&site.join("folio.toml")).unwrap();
        assert_eq!(written.build.extension, "md");
        assert!(!written.build.rss.enable);
    }

    #[test]
    fn test_new_site_refuses_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = init_config(dir.path());
        new_site(&config).unwrap();

        let err = new_site(&config).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_new_site_then_index() {
        let dir = tempfile::tempdir().unwrap();
        let config = init_config(dir.path());
        new_site(&config).unwrap();

        let report = crate::indexer::run(&config).unwrap();
        assert_eq!(report.items, 1);
        assert_eq!(report.tags, 1);
    }
}
