//! Candidate extraction from generic markup.
//!
//! Pages without a feed are mined for post-like elements. The mining
//! strategy sits behind [`CandidateExtractor`] so the news fallback chain
//! does not care how candidates are found.
//!
//! # Strategies
//!
//! | Strategy | Module | Notes |
//! |----------|--------|-------|
//! | Keyword + blog domain | [`keyword`] | Anchors, articles and headings; heuristic |

use url::Url;

use crate::models::NewsItem;

pub mod keyword;

pub use keyword::KeywordExtractor;

/// Turns an HTML document into news candidates.
///
/// Implementations are heuristic: they may admit false positives or miss
/// real posts. Returned items carry absolute links.
pub trait CandidateExtractor: Send + Sync {
    /// Extract candidates from `html`, resolving relative links against `base`.
    fn extract(&self, html: &str, base: &Url) -> Vec<NewsItem>;
}
