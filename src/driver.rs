//! Combined refresh and the polling loop.
//!
//! [`Refresher`] owns the page and runs the version flow then the news
//! flow under one status line. It carries an in-flight flag: a trigger
//! that arrives while a refresh is running is dropped, not queued.
//!
//! [`Refresher::run`] refreshes immediately, then on every interval tick
//! and on every manual trigger, until the shutdown future resolves.

use chrono::Local;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, mpsc};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::fetch::Fetch;
use crate::flows::{NewsOutcome, refresh_news, refresh_versions};
use crate::outputs;
use crate::page::Page;
use crate::render::{REFRESHING, RenderTarget};
use crate::scrapers::CandidateExtractor;
use crate::utils::refresh_stamp;

/// What one combined refresh produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub summaries: Vec<String>,
    pub news: NewsOutcome,
    pub status: String,
}

/// Clears the in-flight flag when the refresh ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Refresher<F> {
    fetcher: F,
    config: Config,
    extractor: Arc<dyn CandidateExtractor>,
    page: Mutex<Page>,
    output_dir: Option<PathBuf>,
    in_flight: AtomicBool,
}

/// Build the status line shown after a refresh.
///
/// # Arguments
///
/// * `stamp` - Local refresh time, already formatted
/// * `summaries` - `"<product> <version>"` for every product that succeeded
///
/// # Returns
///
/// `Last refreshed <stamp>` followed by ` | `-joined summaries, e.g.
/// `Last refreshed 2024-01-01 09:00:00 | UDM 4.0.6`.
pub fn status_line(stamp: &str, summaries: &[String]) -> String {
    let mut line = format!("Last refreshed {stamp}");
    for s in summaries {
        line.push_str(" | ");
        line.push_str(s);
    }
    line
}

impl<F: Fetch + 'static> Refresher<F> {
    pub fn new(fetcher: F, config: Config, extractor: Arc<dyn CandidateExtractor>, page: Page) -> Self {
        Self {
            fetcher,
            config,
            extractor,
            page: Mutex::new(page),
            output_dir: None,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Write `index.html` and `page.json` here after every refresh.
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }

    pub async fn snapshot(&self) -> Page {
        self.page.lock().await.clone()
    }

    /// Run one combined refresh unless one is already running.
    ///
    /// Returns `None` when the trigger was dropped.
    pub async fn try_refresh(&self) -> Option<RefreshReport> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Refresh already in flight; dropping trigger");
            return None;
        }
        let _guard = InFlight(&self.in_flight);
        Some(self.refresh().await)
    }

    #[instrument(level = "info", skip_all)]
    async fn refresh(&self) -> RefreshReport {
        let t0 = std::time::Instant::now();
        let mut page = self.page.lock().await;
        page.set_status(REFRESHING);
        self.publish(&page).await;

        let summaries = refresh_versions(&self.fetcher, &self.config.products, &mut *page).await;
        let news = refresh_news(
            &self.fetcher,
            &self.config.news_sources,
            self.extractor.as_ref(),
            self.config.max_news_items,
            &mut *page,
        )
        .await;

        let status = status_line(&refresh_stamp(Local::now()), &summaries);
        page.set_status(&status);
        self.publish(&page).await;

        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            versions = summaries.len(),
            news = ?news,
            "Refresh complete"
        );
        RefreshReport {
            summaries,
            news,
            status,
        }
    }

    async fn publish(&self, page: &Page) {
        let Some(dir) = &self.output_dir else {
            return;
        };
        if let Err(e) = outputs::write_page(page, dir).await {
            error!(path = %dir.display(), error = %e, "Failed to write page outputs");
        }
    }

    /// Refresh now, then on every tick and manual trigger until `shutdown`.
    ///
    /// Each refresh runs on its own task so that a trigger arriving
    /// mid-refresh reaches the in-flight check and is dropped there.
    pub async fn run(self: Arc<Self>, mut trigger: Option<mpsc::Receiver<()>>, shutdown: impl Future<Output = ()>) {
        let mut ticker = interval(self.config.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(interval_secs = self.config.interval().as_secs(), manual_trigger = trigger.is_some(), "Poller started");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Poller shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    info!("Scheduled refresh");
                    self.spawn_refresh();
                }
                Some(()) = recv_trigger(&mut trigger) => {
                    info!("Manual refresh");
                    self.spawn_refresh();
                }
            }
        }
    }

    fn spawn_refresh(self: &Arc<Self>) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            this.try_refresh().await;
        });
    }
}

/// Next manual trigger; pends forever when there is no trigger or it closed.
async fn recv_trigger(trigger: &mut Option<mpsc::Receiver<()>>) -> Option<()> {
    match trigger {
        Some(rx) => match rx.recv().await {
            Some(()) => Some(()),
            None => {
                *trigger = None;
                std::future::pending().await
            }
        },
        None => std::future::pending().await,
    }
}
