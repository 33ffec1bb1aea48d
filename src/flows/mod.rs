//! The two refresh flows.
//!
//! - [`versions`]: newest release of every registered product into the table
//! - [`news`]: fallback chain of news sources into the news list
//!
//! Both fetch strictly one document at a time and write through
//! [`crate::render::RenderTarget`].

pub mod news;
pub mod versions;

pub use news::{NewsOutcome, refresh_news};
pub use versions::refresh_versions;
