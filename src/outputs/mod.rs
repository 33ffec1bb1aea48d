//! Output generation for the rendered page.
//!
//! # Submodules
//!
//! - [`html`]: renders the page model back to an HTML document
//! - [`json`]: writes a serde snapshot of the page model
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── index.html   # rendered page
//! └── page.json    # page model snapshot
//! ```
//!
//! Both files are replaced after every refresh.

use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

use crate::error::BoxError;
use crate::page::Page;

pub mod html;
pub mod json;

pub const HTML_FILE_NAME: &str = "index.html";

/// Write `index.html` and `page.json` into `output_dir`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_page(page: &Page, output_dir: &Path) -> Result<(), BoxError> {
    let path = output_dir.join(HTML_FILE_NAME);
    fs::write(&path, html::render_page(page)).await?;
    info!(path = %path.display(), "Wrote HTML page");

    json::write_snapshot(page, output_dir).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProductFeed;

    #[tokio::test]
    async fn test_write_page_writes_both_files() {
        let dir = std::env::temp_dir().join(format!("release_watch_out_{}", std::process::id()));
        fs::create_dir_all(&dir).await.unwrap();

        let page = Page::for_products(&[ProductFeed::new("UniFi Protect", "https://p")]);
        write_page(&page, &dir).await.unwrap();

        let html = fs::read_to_string(dir.join(HTML_FILE_NAME)).await.unwrap();
        assert!(html.contains("<td>UniFi Protect</td>"));
        assert!(dir.join(json::FILE_NAME).exists());

        let _ = fs::remove_dir_all(&dir).await;
    }
}
