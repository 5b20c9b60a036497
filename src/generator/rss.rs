//! rss feed generation.
//!
//! Turns the content index into an RSS 2.0 channel. The indexer publishes
//! the rendered feed together with the JSON artifacts.

use crate::{
    config::SiteConfig,
    content::{ContentIndex, ContentItem},
};
use anyhow::{Result, anyhow};
use regex::Regex;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use serde_json::Value;
use std::sync::LazyLock;

// ============================================================================
// Public API
// ============================================================================

/// Render the rss feed if enabled in config. Nothing is written here.
pub fn render_rss(config: &SiteConfig, index: &ContentIndex) -> Result<Option<String>> {
    if !config.build.rss.enable {
        return Ok(None);
    }
    RssFeed::new(config, index).into_xml().map(Some)
}

// ============================================================================
// RssFeed Implementation
// ============================================================================

/// rss feed builder
struct RssFeed<'a> {
    config: &'a SiteConfig,
    index: &'a ContentIndex,
}

impl<'a> RssFeed<'a> {
    const fn new(config: &'a SiteConfig, index: &'a ContentIndex) -> Self {
        Self { config, index }
    }

    /// Generate rss xml string.
    ///
    /// Items come out in index order, newest first.
    fn into_xml(self) -> Result<String> {
        let items: Vec<_> = self
            .index
            .items()
            .iter()
            .filter_map(|item| item_to_rss_item(item, self.config))
            .collect();

        let channel = ChannelBuilder::default()
            .title(&self.config.base.title)
            .link(self.config.base.url.as_deref().unwrap_or_default())
            .description(&self.config.base.description)
            .language(self.config.base.language.clone())
            .generator(concat!("folio ", env!("CARGO_PKG_VERSION")).to_string())
            .items(items)
            .build();

        channel
            .validate()
            .map_err(|e| anyhow!("rss validation failed: {e}"))?;
        Ok(channel.to_string())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert a content item to an rss item.
/// Returns None if required fields (title, valid date) are missing.
fn item_to_rss_item(item: &ContentItem, config: &SiteConfig) -> Option<rss::Item> {
    let title = item.title()?.to_owned();
    let pub_date = item.date()?.to_rfc2822();
    let link = item_link(item, config);
    let author = normalize_rss_author(metadata_str(item, "author"), config);
    let description = metadata_str(item, "summary")
        .or_else(|| metadata_str(item, "description"))
        .map(str::to_owned);

    Some(
        ItemBuilder::default()
            .title(title)
            .link(Some(link.clone()))
            .guid(GuidBuilder::default().permalink(true).value(link).build())
            .description(description)
            .pub_date(pub_date)
            .author(author)
            .build(),
    )
}

/// `{base.url}/{link_prefix}/{id}`
fn item_link(item: &ContentItem, config: &SiteConfig) -> String {
    let base = config.base.url.as_deref().unwrap_or_default();
    let prefix = config.build.rss.link_prefix.trim_matches('/');
    let id = urlencoding::encode(&item.id);

    let mut link = base.trim_end_matches('/').to_owned();
    if !prefix.is_empty() {
        link.push('/');
        link.push_str(prefix);
    }
    link.push('/');
    link.push_str(&id);
    link
}

fn metadata_str<'i>(item: &'i ContentItem, key: &str) -> Option<&'i str> {
    item.metadata
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Normalize author field to rss format: "email@example.com (Name)"
///
/// Priority:
/// 1. Post meta author if already in valid format
/// 2. Site config author if in valid format
/// 3. Combine site config email and author
fn normalize_rss_author(author: Option<&str>, config: &SiteConfig) -> Option<String> {
    static RE_VALID_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}[ \t]*\([^)]+\)$").unwrap()
    });

    let author = author?;

    if RE_VALID_AUTHOR.is_match(author) {
        return Some(author.to_owned());
    }

    let site_author = &config.base.author;
    if RE_VALID_AUTHOR.is_match(site_author) {
        return Some(site_author.clone());
    }

    Some(format!("{} ({})", config.base.email, site_author))
}
