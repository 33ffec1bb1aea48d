//! The render target the refresh flows write into.
//!
//! Flows never touch presentation state directly; they go through
//! [`RenderTarget`]. [`crate::page::Page`] is the production implementation.

use crate::models::{NewsItem, ProductFeedEntry};

/// Text shown in place of an empty value.
pub const PLACEHOLDER: &str = "—";

/// Display text of a populated release-notes link.
pub const RELEASE_LINK_TEXT: &str = "Release notes / download";

/// Single item rendered when every news source failed.
pub const NEWS_UNAVAILABLE: &str = "Unable to load news right now.";

/// Status text while a refresh is running.
pub const REFRESHING: &str = "Refreshing…";

pub trait RenderTarget {
    /// Write `entry` into the row whose first cell names `product`.
    ///
    /// Returns `false` (and changes nothing) when no such row exists.
    fn upsert_product_row(&mut self, product: &str, entry: &ProductFeedEntry) -> bool;

    /// Replace the news list. `None` provenance clears the label.
    fn replace_news(&mut self, items: &[NewsItem], provenance: Option<&str>);

    fn set_status(&mut self, text: &str);
}
