//! News flow: the first source that yields items wins.
//!
//! Sources are tried strictly in order. A fetch failure, an unparsable
//! document or an empty extraction all advance to the next source; the
//! first non-empty result is rendered and later sources are never fetched.
//! When every source fails a single placeholder item is rendered.

use tracing::{info, instrument, warn};
use url::Url;

use crate::config::{SourceKind, SourceSpec};
use crate::error::ExtractError;
use crate::feed::parse_entries;
use crate::fetch::Fetch;
use crate::models::NewsItem;
use crate::render::{NEWS_UNAVAILABLE, RenderTarget};
use crate::scrapers::CandidateExtractor;
use crate::utils::display_date;

/// Where the fallback chain ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsOutcome {
    Succeeded {
        /// Index of the winning source in the chain.
        source: usize,
        host: String,
        items: usize,
    },
    Exhausted,
}

/// First `limit` feed entries as news items.
///
/// # Errors
///
/// Returns [`ExtractError::Xml`] when `text` is neither RSS nor Atom.
pub fn feed_news_items(text: &str, limit: usize) -> Result<Vec<NewsItem>, ExtractError> {
    Ok(parse_entries(text)?
        .into_iter()
        .take(limit)
        .map(|e| NewsItem::new(e.title, e.link).with_date(display_date(&e.date)))
        .collect())
}

async fn try_source<F: Fetch>(
    fetcher: &F,
    source: &SourceSpec,
    extractor: &dyn CandidateExtractor,
    limit: usize,
) -> Result<(Url, Vec<NewsItem>), ExtractError> {
    let base = Url::parse(&source.url)?;
    let body = fetcher.fetch_text(&source.url).await?;

    let items = match source.kind {
        SourceKind::StructuredFeed => feed_news_items(&body, limit)?,
        SourceKind::GenericMarkup => {
            let mut items = extractor.extract(&body, &base);
            items.truncate(limit);
            items
        }
    };

    if items.is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok((base, items))
}

/// Walk the fallback chain from the first source and render the outcome.
///
/// Sources are fetched one at a time, in order. The first source that
/// yields at least one item is rendered with a `Source: <host>` label and
/// the sources after it are never fetched.
///
/// # Arguments
///
/// * `fetcher` - Transport used for every source
/// * `sources` - The fallback chain, most preferred first
/// * `extractor` - Candidate heuristic for generic-markup sources
/// * `limit` - Maximum number of items rendered
/// * `target` - Page that receives the news list
///
/// # Returns
///
/// [`NewsOutcome::Succeeded`] naming the winning source, or
/// [`NewsOutcome::Exhausted`] after the single placeholder item
/// ([`NEWS_UNAVAILABLE`]) was rendered with no provenance.
#[instrument(level = "info", skip_all, fields(sources = sources.len()))]
pub async fn refresh_news<F, T>(
    fetcher: &F,
    sources: &[SourceSpec],
    extractor: &dyn CandidateExtractor,
    limit: usize,
    target: &mut T,
) -> NewsOutcome
where
    F: Fetch,
    T: RenderTarget,
{
    for (index, source) in sources.iter().enumerate() {
        match try_source(fetcher, source, extractor, limit).await {
            Ok((base, items)) => {
                let host = base.host_str().unwrap_or_default().to_string();
                target.replace_news(&items, Some(&format!("Source: {host}")));
                info!(source = index, %host, items = items.len(), "News source resolved");
                return NewsOutcome::Succeeded {
                    source: index,
                    host,
                    items: items.len(),
                };
            }
            Err(e) => {
                warn!(source = index, url = %source.url, kind = ?source.kind, error = %e, "News source failed; trying next");
            }
        }
    }

    warn!("All news sources failed");
    target.replace_news(&[NewsItem::new(NEWS_UNAVAILABLE, "")], None);
    NewsOutcome::Exhausted
}
