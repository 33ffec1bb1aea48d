//! JSON snapshot of the page model.
//!
//! The snapshot is the serde form of [`Page`]: rows with their cells,
//! status line and news section. It is overwritten on every refresh; no
//! history is kept.

use crate::error::BoxError;
use crate::page::Page;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub const FILE_NAME: &str = "page.json";

/// Serialize `page` to `{output_dir}/page.json`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_snapshot(page: &Page, output_dir: &Path) -> Result<(), BoxError> {
    let json = serde_json::to_string_pretty(page)?;
    let path = output_dir.join(FILE_NAME);
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProductFeed;
    use crate::render::RenderTarget;

    #[tokio::test]
    async fn test_snapshot_round_trips() {
        let dir = std::env::temp_dir().join(format!("release_watch_json_{}", std::process::id()));
        fs::create_dir_all(&dir).await.unwrap();

        let mut page = Page::for_products(&[ProductFeed::new("UniFi Network", "https://n")]);
        page.set_status("Refreshing…");
        write_snapshot(&page, &dir).await.unwrap();

        let text = fs::read_to_string(dir.join(FILE_NAME)).await.unwrap();
        let back: Page = serde_json::from_str(&text).unwrap();
        assert_eq!(back, page);

        let _ = fs::remove_dir_all(&dir).await;
    }
}
