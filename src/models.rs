//! Data models for extracted feed entries and news items.
//!
//! Both records are ephemeral: they are built fresh on every poll, written
//! into the page model and then dropped.
//!
//! - [`ProductFeedEntry`]: the newest entry of a product release feed
//! - [`NewsItem`]: one post shown in the news list

use serde::{Deserialize, Serialize};

/// The newest entry of a product's release feed.
///
/// `version` is derived from `title` by [`crate::feed::derive_version`] and
/// falls back to the full title when the title carries no dotted number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProductFeedEntry {
    /// Raw entry title, e.g. `"UniFi Network 8.1.113"`.
    pub title: String,
    /// Version extracted from the title.
    pub version: String,
    /// Link to the release notes.
    pub link: String,
    /// Plain-text description with markup stripped.
    pub description: String,
    /// Publish date as it appeared in the feed.
    pub date: String,
}

/// A single news post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    pub title: String,
    /// Absolute URL of the post.
    pub link: String,
    /// Display date, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            date: None,
        }
    }

    pub fn with_date(mut self, date: Option<String>) -> Self {
        self.date = date;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_item_without_date_skips_field() {
        let item = NewsItem::new("Introducing UniFi Express", "https://blog.ui.com/a");
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("date"));
    }

    #[test]
    fn test_news_item_with_date() {
        let item = NewsItem::new("t", "https://blog.ui.com/a").with_date(Some("2024-01-01".into()));
        assert_eq!(item.date.as_deref(), Some("2024-01-01"));
    }
}
