//! Command-line interface definitions for release_watch.
//!
//! All arguments can be provided via command-line flags or environment
//! variables.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for release_watch.
///
/// # Examples
///
/// ```sh
/// # Poll forever, starting from the built-in product table
/// release_watch -o ./public
///
/// # Update an existing page once and exit
/// release_watch -p ./releases.html -o ./public --once
///
/// # Custom registry and hourly polling
/// release_watch -o ./public -c ./release_watch.yaml --interval-secs 3600
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory that receives index.html and page.json after every refresh
    #[arg(short, long, env = "RELEASE_WATCH_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Existing HTML page whose release table should be updated
    #[arg(short, long, env = "RELEASE_WATCH_PAGE")]
    pub page: Option<PathBuf>,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "RELEASE_WATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Refresh once and exit instead of polling
    #[arg(long)]
    pub once: bool,

    /// Override the polling interval from the config file
    #[arg(long, env = "RELEASE_WATCH_INTERVAL_SECS")]
    pub interval_secs: Option<u64>,
}
