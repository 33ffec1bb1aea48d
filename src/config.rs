//! Runtime configuration: product registry, news sources and polling knobs.
//!
//! Every field has a built-in default, so the binary runs without a config
//! file. A YAML file passed with `--config` overrides any subset of fields.
//!
//! ```yaml
//! interval_secs: 3600
//! products:
//!   - name: UniFi Network
//!     feed: https://community.ui.com/rss/releases/UniFi-Network-Application
//! news_sources:
//!   - kind: structured-feed
//!     url: https://blog.ui.com/rss
//!   - kind: generic-markup
//!     url: https://blog.ui.com/
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

use crate::error::BoxError;

/// One row of the product registry: display name and release feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProductFeed {
    pub name: String,
    pub feed: String,
}

impl ProductFeed {
    pub fn new(name: &str, feed: &str) -> Self {
        Self {
            name: name.to_string(),
            feed: feed.to_string(),
        }
    }
}

/// How a news source is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// RSS or Atom document.
    StructuredFeed,
    /// Arbitrary HTML, mined with the candidate extractor.
    GenericMarkup,
}

/// One link of the news fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceSpec {
    pub kind: SourceKind,
    pub url: String,
}

impl SourceSpec {
    pub fn feed(url: &str) -> Self {
        Self {
            kind: SourceKind::StructuredFeed,
            url: url.to_string(),
        }
    }

    pub fn markup(url: &str) -> Self {
        Self {
            kind: SourceKind::GenericMarkup,
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between scheduled refreshes.
    pub interval_secs: u64,
    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Maximum number of news items rendered.
    pub max_news_items: usize,
    /// Markup candidates with shorter text are ignored.
    pub min_text_len: usize,
    /// Product registry, in refresh order.
    pub products: Vec<ProductFeed>,
    /// News fallback chain, in try order.
    pub news_sources: Vec<SourceSpec>,
    /// Hosts accepted for markup-extracted news links.
    pub blog_domains: Vec<String>,
    /// Topical keywords a markup candidate must mention.
    pub keywords: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_secs: 24 * 60 * 60,
            request_timeout_secs: 30,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            max_news_items: 5,
            min_text_len: 8,
            products: vec![
                ProductFeed::new(
                    "UniFi Network",
                    "https://community.ui.com/rss/releases/UniFi-Network-Application/e6712595-81bb-4829-8e42-9e2630fabcfe",
                ),
                ProductFeed::new(
                    "UniFi Protect",
                    "https://community.ui.com/rss/releases/UniFi-Protect/d79e4b3a-3e3b-4a2a-8b6a-3c2d4e0f5a11",
                ),
                ProductFeed::new(
                    "UniFi OS",
                    "https://community.ui.com/rss/releases/UniFi-OS-Dream-Machines/88c6c2f2-6a5f-4b7e-9e6b-1c3f6c0d2b44",
                ),
                ProductFeed::new(
                    "UniFi Access",
                    "https://community.ui.com/rss/releases/UniFi-Access/4d3c8b6e-2f1a-4c9d-8e7b-5a6f0e1d2c33",
                ),
            ],
            news_sources: vec![
                SourceSpec::feed("https://blog.ui.com/rss"),
                SourceSpec::markup("https://blog.ui.com/"),
                SourceSpec::markup("https://community.ui.com/stories"),
            ],
            blog_domains: vec!["blog.ui.com".to_string(), "community.ui.com".to_string()],
            keywords: [
                "Introducing",
                "Releasing",
                "Welcome",
                "UniFi",
                "Protect",
                "Doorbell",
                "Storage",
                "Network",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
        }
    }
}

impl Config {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse a YAML document; missing fields keep their defaults.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Load the config file if one was given, else the built-in defaults.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, BoxError> {
        let Some(path) = path else {
            info!("No config file given; using built-in defaults");
            return Ok(Self::default());
        };
        let text = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml(&text)?;
        info!(
            path = %path.display(),
            products = config.products.len(),
            news_sources = config.news_sources.len(),
            "Loaded configuration"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.interval(), Duration::from_secs(86_400));
        assert_eq!(c.max_news_items, 5);
        assert_eq!(c.min_text_len, 8);
        assert_eq!(c.news_sources.len(), 3);
        assert_eq!(c.news_sources[0].kind, SourceKind::StructuredFeed);
        assert_eq!(c.news_sources[1].kind, SourceKind::GenericMarkup);
        assert_eq!(c.blog_domains.len(), 2);
        assert_eq!(c.keywords.len(), 8);
    }

    #[test]
    fn test_yaml_partial_override() {
        let yaml = r#"
interval_secs: 60
products:
  - name: UniFi Protect
    feed: https://example.com/protect.rss
news_sources:
  - kind: generic-markup
    url: https://blog.ui.com/
"#;
        let c = Config::from_yaml(yaml).unwrap();
        assert_eq!(c.interval_secs, 60);
        assert_eq!(c.products, vec![ProductFeed::new("UniFi Protect", "https://example.com/protect.rss")]);
        assert_eq!(c.news_sources, vec![SourceSpec::markup("https://blog.ui.com/")]);
        // untouched fields keep defaults
        assert_eq!(c.max_news_items, 5);
        assert_eq!(c.request_timeout_secs, 30);
    }

    #[test]
    fn test_yaml_rejects_unknown_kind() {
        let yaml = "news_sources:\n  - kind: telegram\n    url: https://t.me/s/x\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let c = Config {
            interval_secs: 0,
            ..Config::default()
        };
        assert_eq!(c.interval(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_load_without_path_uses_defaults() {
        let c = Config::load(None).await.unwrap();
        assert_eq!(c, Config::default());
    }
}
