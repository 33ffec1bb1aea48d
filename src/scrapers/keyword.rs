//! Keyword and blog-domain heuristic for generic markup.
//!
//! Every anchor, article and heading of the page is a candidate. A
//! candidate is kept when its text mentions one of the topical keywords and
//! its link points at one of the known blog domains. Links are
//! de-duplicated (first seen wins) and the list is cut to a fixed size.

use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use super::CandidateExtractor;
use crate::config::Config;
use crate::models::NewsItem;
use crate::utils::{host_in_domains, normalize_whitespace};

const CANDIDATES: &str = "a, article, h1, h2, h3, h4, h5, h6";

#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    /// Lowercased topical keywords.
    keywords: Vec<String>,
    blog_domains: Vec<String>,
    min_text_len: usize,
    limit: usize,
}

impl KeywordExtractor {
    pub fn new(keywords: &[String], blog_domains: &[String], min_text_len: usize, limit: usize) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            blog_domains: blog_domains.to_vec(),
            min_text_len,
            limit,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.keywords,
            &config.blog_domains,
            config.min_text_len,
            config.max_news_items,
        )
    }

    fn is_topical(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    fn is_blog_link(&self, link: &Url) -> bool {
        link.host_str()
            .is_some_and(|host| host_in_domains(host, &self.blog_domains))
    }

    fn candidate(&self, element: ElementRef<'_>, base: &Url) -> Option<NewsItem> {
        let text = normalize_whitespace(&element.text().collect::<String>());
        if text.chars().count() < self.min_text_len {
            return None;
        }

        // only the element's own href; article and heading wrappers carry none
        let href = element.value().attr("href")?;
        let link = base.join(href.trim()).ok()?;

        if !self.is_topical(&text) || !self.is_blog_link(&link) {
            return None;
        }
        Some(NewsItem::new(text, link.to_string()))
    }
}

impl CandidateExtractor for KeywordExtractor {
    #[instrument(level = "debug", skip_all, fields(base = %base))]
    fn extract(&self, html: &str, base: &Url) -> Vec<NewsItem> {
        let document = Html::parse_document(html);
        let candidates = Selector::parse(CANDIDATES).unwrap();

        let items: Vec<NewsItem> = document
            .select(&candidates)
            .filter_map(|el| self.candidate(el, base))
            .unique_by(|item| item.link.clone())
            .take(self.limit)
            .collect();

        debug!(count = items.len(), "Extracted markup candidates");
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::from_config(&Config::default())
    }

    fn base() -> Url {
        Url::parse("https://blog.ui.com/").unwrap()
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let html = r#"
            <a href="/a">Introducing UniFi Express</a>
            <a href="/b">Releasing Protect 3.0</a>
            <a href="/a">Introducing UniFi Express again</a>
            <a href="/c">Welcome the new Doorbell</a>
        "#;
        let links: Vec<String> = extractor()
            .extract(html, &base())
            .into_iter()
            .map(|i| i.link)
            .collect();
        assert_eq!(
            links,
            vec![
                "https://blog.ui.com/a",
                "https://blog.ui.com/b",
                "https://blog.ui.com/c",
            ]
        );
    }

    #[test]
    fn test_rejects_short_offtopic_and_foreign_links() {
        let html = r#"
            <a href="/x">UniFi</a>
            <a href="/careers">Careers at the company</a>
            <a href="https://example.com/post">Introducing UniFi elsewhere</a>
            <a href="https://community.ui.com/stories/1">Network storage tips</a>
        "#;
        let items = extractor().extract(html, &base());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].link, "https://community.ui.com/stories/1");
        assert_eq!(items[0].title, "Network storage tips");
    }

    #[test]
    fn test_article_card_takes_anchor_title() {
        let html = r#"
            <article>
              <h2><a href="/protect-4">Introducing Protect 4.0</a></h2>
              <p>Today we ship a big update with lots of features and fixes for everyone.</p>
              <time>Jan 2, 2024</time>
              <a href="/protect-4">Read more</a>
            </article>
        "#;
        let items = extractor().extract(html, &base());
        assert_eq!(
            items,
            vec![NewsItem::new("Introducing Protect 4.0", "https://blog.ui.com/protect-4")]
        );
    }

    #[test]
    fn test_elements_without_link_are_skipped() {
        let html = r#"<h1>Welcome to the UniFi blog</h1>"#;
        assert!(extractor().extract(html, &base()).is_empty());
    }

    #[test]
    fn test_limit_truncates() {
        let html: String = (0..8)
            .map(|i| format!(r#"<a href="/p{i}">UniFi post number {i}</a>"#))
            .collect();
        let items = extractor().extract(&html, &base());
        assert_eq!(items.len(), 5);
        assert_eq!(items[4].link, "https://blog.ui.com/p4");
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let html = r#"<a href="/s">new STORAGE options arrive</a>"#;
        assert_eq!(extractor().extract(html, &base()).len(), 1);
    }
}
