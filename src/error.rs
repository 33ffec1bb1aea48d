//! Error taxonomy for fetching and extraction.
//!
//! Every variant is recovered inside the flow step that produced it: the
//! version flow skips the product, the news flow advances to the next
//! source. Nothing here is fatal.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// Network or transport failure.
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    /// The feed document could not be parsed as RSS or Atom.
    #[error("feed parse: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    /// The feed parsed but holds no `item`/`entry` element.
    #[error("feed has no entry element")]
    NoEntry,

    /// The source URL is not a valid absolute URL.
    #[error("bad source URL: {0}")]
    Url(#[from] url::ParseError),

    /// Parsing succeeded but nothing usable came out of it.
    #[error("no extractable items")]
    Empty,
}

/// Error type for start-up plumbing and `main`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
