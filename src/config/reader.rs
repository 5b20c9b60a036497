//! `[reader]` section configuration.
//!
//! Where the query commands (`list`, `get`, `tags`) fetch artifacts from.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[reader]` section in folio.toml.
///
/// # Example
/// ```toml
/// [reader]
/// source = "https://janedoe.dev"   # or a directory; defaults to [build.output]
/// timeout = 5                      # seconds, HTTP only
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ReaderConfig {
    /// Base URL or directory holding the artifacts.
    #[serde(default = "defaults::reader::source")]
    #[educe(Default = defaults::reader::source())]
    pub source: Option<String>,

    /// HTTP request timeout in seconds.
    #[serde(default = "defaults::reader::timeout")]
    #[educe(Default = defaults::reader::timeout())]
    pub timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_reader_config() {
        let config = r#"
            [reader]
            source = "https://janedoe.dev"
            timeout = 3
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.reader.source.as_deref(), Some("https://janedoe.dev"));
        assert_eq!(config.reader.timeout, 3);
    }

    #[test]
    fn test_reader_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.reader.source, None);
        assert_eq!(config.reader.timeout, 10);
    }
}
