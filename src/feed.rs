//! Structured-feed parsing for RSS 2.0 and Atom documents.
//!
//! Documents are deserialised with `quick_xml::de` into two small shapes,
//! RSS first and Atom second. Each entry becomes a [`ProductFeedEntry`]
//! whose version is pulled out of the title and whose description is
//! reduced to plain text.

use once_cell::sync::Lazy;
use quick_xml::de::from_str;
use regex::Regex;
use scraper::Html;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::ExtractError;
use crate::models::ProductFeedEntry;
use crate::utils::{normalize_whitespace, truncate_for_log};

/// One leading integer, one to three `.integer` groups, optional qualifier.
static VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+){1,3}(?:[-+]?[A-Za-z][0-9A-Za-z]*)?").unwrap());

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    summary: Option<AtomText>,
    content: Option<AtomText>,
    updated: Option<String>,
    published: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href", default)]
    href: String,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

impl AtomEntry {
    /// `rel="alternate"` (or no `rel`) wins over the first link.
    fn best_link(&self) -> String {
        self.links
            .iter()
            .find(|l| l.rel.as_deref().is_none_or(|r| r == "alternate"))
            .or_else(|| self.links.first())
            .map(|l| l.href.clone())
            .unwrap_or_default()
    }
}

/// Parse every entry of an RSS or Atom document, in document order.
///
/// An unparsable document yields [`ExtractError::Xml`]; a parsable one
/// without entries yields an empty vector.
#[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
pub fn parse_entries(text: &str) -> Result<Vec<ProductFeedEntry>, ExtractError> {
    let xml = scrub_html_entities_for_xml(text);

    match from_str::<Rss>(&xml) {
        Ok(rss) => {
            debug!(count = rss.channel.items.len(), "Parsed RSS items");
            Ok(rss.channel.items.into_iter().map(rss_entry).collect())
        }
        Err(rss_err) => match from_str::<AtomFeed>(&xml) {
            Ok(atom) => {
                debug!(count = atom.entries.len(), "Parsed Atom entries");
                Ok(atom.entries.into_iter().map(atom_entry).collect())
            }
            Err(atom_err) => {
                debug!(
                    rss = %rss_err,
                    atom = %atom_err,
                    preview = %truncate_for_log(text, 200),
                    "Document is neither RSS nor Atom"
                );
                Err(ExtractError::Xml(rss_err))
            }
        },
    }
}

/// Parse the first (newest) entry of a feed.
///
/// # Errors
///
/// [`ExtractError::NoEntry`] when the document holds no entry element,
/// [`ExtractError::Xml`] when it is not a feed at all.
pub fn parse_latest_entry(text: &str) -> Result<ProductFeedEntry, ExtractError> {
    parse_entries(text)?
        .into_iter()
        .next()
        .ok_or(ExtractError::NoEntry)
}

/// Pull a dotted version number out of a release title.
///
/// ```ignore
/// assert_eq!(derive_version("UniFi Network 8.1.113"), "8.1.113");
/// assert_eq!(derive_version("Security advisory"), "Security advisory");
/// ```
pub fn derive_version(title: &str) -> String {
    VERSION
        .find(title)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| title.to_string())
}

/// Reduce an HTML fragment to its whitespace-collapsed text content.
pub fn strip_markup(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<String>();
    normalize_whitespace(&text)
}

fn build_entry(title: String, link: String, description: &str, date: String) -> ProductFeedEntry {
    let title = title.trim().to_string();
    ProductFeedEntry {
        version: derive_version(&title),
        link: link.trim().to_string(),
        description: strip_markup(description),
        date: date.trim().to_string(),
        title,
    }
}

fn rss_entry(item: RssItem) -> ProductFeedEntry {
    build_entry(
        item.title.unwrap_or_default(),
        item.link.unwrap_or_default(),
        item.description.as_deref().unwrap_or_default(),
        item.pub_date.unwrap_or_default(),
    )
}

fn atom_entry(entry: AtomEntry) -> ProductFeedEntry {
    let link = entry.best_link();
    let description = entry
        .summary
        .or(entry.content)
        .map(|t| t.value)
        .unwrap_or_default();
    build_entry(
        entry.title.map(|t| t.value).unwrap_or_default(),
        link,
        &description,
        entry.published.or(entry.updated).unwrap_or_default(),
    )
}

/// HTML entities that are not predefined in XML and would abort parsing.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>UniFi Network Application</title>
    <link>https://community.ui.com/releases</link>
    <item>
      <title>UniFi Network 8.1.113</title>
      <link>https://community.ui.com/releases/8-1-113</link>
      <description><![CDATA[<p>Improvements&nbsp;and
        <b>bug fixes</b>.</p>]]></description>
      <pubDate>Tue, 02 Jan 2024 10:00:00 +0000</pubDate>
    </item>
    <item>
      <title>UniFi Network 8.0.28</title>
      <link>https://community.ui.com/releases/8-0-28</link>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>UniFi Protect</title>
  <entry>
    <title type="html">UniFi Protect 3.0.22-beta</title>
    <link rel="replies" href="https://community.ui.com/replies/1"/>
    <link rel="alternate" href="https://community.ui.com/releases/protect-3-0-22"/>
    <updated>2024-03-05T08:30:00Z</updated>
    <summary type="html">&lt;ul&gt;&lt;li&gt;Faster timeline&lt;/li&gt;&lt;/ul&gt;</summary>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_latest_rss_entry() {
        let e = parse_latest_entry(RSS).unwrap();
        assert_eq!(e.title, "UniFi Network 8.1.113");
        assert_eq!(e.version, "8.1.113");
        assert_eq!(e.link, "https://community.ui.com/releases/8-1-113");
        assert_eq!(e.description, "Improvements and bug fixes.");
        assert_eq!(e.date, "Tue, 02 Jan 2024 10:00:00 +0000");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let entries = parse_entries(RSS).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].description, "");
        assert_eq!(entries[1].date, "");
    }

    #[test]
    fn test_parse_atom_entry() {
        let e = parse_latest_entry(ATOM).unwrap();
        assert_eq!(e.version, "3.0.22-beta");
        assert_eq!(e.link, "https://community.ui.com/releases/protect-3-0-22");
        assert_eq!(e.description, "Faster timeline");
        assert_eq!(e.date, "2024-03-05T08:30:00Z");
    }

    #[test]
    fn test_feed_without_entries_fails() {
        let xml = r#"<rss version="2.0"><channel><title>Empty</title></channel></rss>"#;
        assert!(matches!(parse_latest_entry(xml), Err(ExtractError::NoEntry)));
    }

    #[test]
    fn test_non_xml_fails() {
        assert!(parse_latest_entry("<html><body><p>oops").is_err());
    }

    #[test]
    fn test_derive_version() {
        assert_eq!(derive_version("UniFi Network 8.1.113"), "8.1.113");
        assert_eq!(derive_version("UDM Firmware 4.0.6 release"), "4.0.6");
        assert_eq!(derive_version("UniFi OS 4.0.6rc2 hotfix"), "4.0.6rc2");
        assert_eq!(derive_version("Access 1.2"), "1.2");
        assert_eq!(derive_version("UniFi 5G Max 1.2.3.4.5"), "1.2.3.4");
        assert_eq!(derive_version("Security advisory bulletin"), "Security advisory bulletin");
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<p>Fixes bugs.</p>"), "Fixes bugs.");
        assert_eq!(strip_markup("plain   text\n here"), "plain text here");
        assert_eq!(strip_markup(""), "");
    }
}
