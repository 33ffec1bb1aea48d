//! # release_watch
//!
//! Keeps a UniFi release table and news list up to date by polling release
//! feeds and blog sources.
//!
//! ## Usage
//!
//! ```sh
//! release_watch -p ./releases.html -o ./public
//! ```
//!
//! ## Architecture
//!
//! One combined refresh runs on start, then every interval (24 h by
//! default) and on every manual trigger (SIGHUP):
//! 1. **Versions**: the newest entry of each product feed goes into the
//!    product's table row
//! 2. **News**: the first news source in the fallback chain that yields
//!    items fills the news list
//! 3. **Output**: the page is written as `index.html` and `page.json`

use clap::Parser;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod driver;
mod error;
mod feed;
mod fetch;
mod flows;
mod models;
mod outputs;
mod page;
mod render;
mod scrapers;
mod utils;

use cli::Cli;
use config::Config;
use driver::Refresher;
use error::BoxError;
use fetch::HttpFetcher;
use flows::NewsOutcome;
use page::Page;
use scrapers::KeywordExtractor;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("release_watch starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = Config::load(args.config.as_deref()).await?;
    if let Some(secs) = args.interval_secs {
        config.interval_secs = secs;
    }

    ensure_writable_dir(&args.output_dir).await?;

    let page = match &args.page {
        Some(path) => {
            let html = tokio::fs::read_to_string(path).await?;
            let page = Page::from_html(&html);
            if page.rows.is_empty() {
                warn!(path = %path.display(), "Page has no table rows; version updates will find nothing");
            }
            page
        }
        None => {
            info!(products = config.products.len(), "No page given; starting from a blank product table");
            Page::for_products(&config.products)
        }
    };

    let fetcher = HttpFetcher::from_config(&config)?;
    let extractor = Arc::new(KeywordExtractor::from_config(&config));
    let refresher = Refresher::new(fetcher, config, extractor, page).with_output_dir(args.output_dir.clone());

    if args.once {
        let Some(report) = refresher.try_refresh().await else {
            return Ok(());
        };
        match &report.news {
            NewsOutcome::Succeeded { source, host, items } => {
                info!(source, %host, items, "News resolved")
            }
            NewsOutcome::Exhausted => warn!("No news source produced items"),
        }
        let page = refresher.snapshot().await;
        info!(
            rows = page.rows.len(),
            versions = report.summaries.len(),
            status = %report.status,
            output_dir = %args.output_dir.display(),
            "Single refresh complete"
        );
        return Ok(());
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    Arc::new(refresher).run(manual_trigger(), shutdown).await;
    info!("release_watch stopped");
    Ok(())
}

/// SIGHUP requests an immediate refresh.
#[cfg(unix)]
fn manual_trigger() -> Option<mpsc::Receiver<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "Cannot listen for SIGHUP; manual refresh disabled");
            return None;
        }
    };
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            if tx.try_send(()).is_err() {
                debug!("Manual refresh already pending");
            }
        }
    });
    info!(pid = std::process::id(), "Send SIGHUP to refresh now");
    Some(rx)
}

#[cfg(not(unix))]
fn manual_trigger() -> Option<mpsc::Receiver<()>> {
    None
}
