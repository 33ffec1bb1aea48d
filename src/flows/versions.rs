//! Version flow: newest release of every registered product.

use tracing::{info, instrument, warn};

use crate::config::ProductFeed;
use crate::error::ExtractError;
use crate::feed::parse_latest_entry;
use crate::fetch::Fetch;
use crate::models::ProductFeedEntry;
use crate::render::RenderTarget;

async fn latest_entry<F: Fetch>(fetcher: &F, url: &str) -> Result<ProductFeedEntry, ExtractError> {
    let body = fetcher.fetch_text(url).await?;
    parse_latest_entry(&body)
}

/// Refresh every product row, one product at a time in registry order.
///
/// A failing product is logged and skipped; its row stays as it was.
///
/// # Arguments
///
/// * `fetcher` - Transport used for every product feed
/// * `registry` - Products and their release feeds
/// * `target` - Page whose rows receive the newest entries
///
/// # Returns
///
/// One `"<product> <version>"` summary per product that succeeded, in
/// registry order.
#[instrument(level = "info", skip_all, fields(products = registry.len()))]
pub async fn refresh_versions<F, T>(fetcher: &F, registry: &[ProductFeed], target: &mut T) -> Vec<String>
where
    F: Fetch,
    T: RenderTarget,
{
    let mut summaries = Vec::with_capacity(registry.len());

    for product in registry {
        match latest_entry(fetcher, &product.feed).await {
            Ok(entry) => {
                let found = target.upsert_product_row(&product.name, &entry);
                if !found {
                    warn!(product = %product.name, "No table row for product");
                }
                info!(product = %product.name, version = %entry.version, row_found = found, "Version updated");
                summaries.push(format!("{} {}", product.name, entry.version));
            }
            Err(e) => {
                warn!(product = %product.name, url = %product.feed, error = %e, "Version fetch failed; skipping product");
            }
        }
    }

    summaries
}
