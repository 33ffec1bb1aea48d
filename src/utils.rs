//! Utility functions for text normalisation, dates, hosts and the file system.
//!
//! - Whitespace collapsing shared by the feed parser and the page model
//! - Date formatting for the status line and news list
//! - Blog-domain matching for the markup extractor
//! - Output directory validation

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

use crate::error::BoxError;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every whitespace run to a single space and trim the ends.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_whitespace("  UniFi\n   Protect "), "UniFi Protect");
/// ```
pub fn normalize_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut after `max` bytes (backing off to the previous
/// char boundary) and get a `"…(+N bytes)"` suffix.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Timestamp shown in the "Last refreshed" status line.
pub fn refresh_stamp(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Turn a raw feed date into a display date.
///
/// RFC 2822 (RSS `pubDate`) and RFC 3339 (Atom `updated`) dates become
/// `YYYY-MM-DD`. Anything else is passed through trimmed; empty input
/// yields `None`.
pub fn display_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = DateTime::parse_from_rfc2822(raw).or_else(|_| DateTime::parse_from_rfc3339(raw));
    match parsed {
        Ok(dt) => Some(dt.format("%Y-%m-%d").to_string()),
        Err(_) => Some(raw.to_string()),
    }
}

/// Whether `host` is one of `domains` or a subdomain of one.
pub fn host_in_domains(host: &str, domains: &[String]) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    domains.iter().any(|d| {
        let d = d.to_ascii_lowercase();
        host == d || host.ends_with(&format!(".{d}"))
    })
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), BoxError> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  UniFi\n\t Protect  "), "UniFi Protect");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundary() {
        let s = "ééééé";
        let result = truncate_for_log(s, 3);
        assert!(result.starts_with('é'));
        assert!(result.contains("bytes)"));
    }

    #[test]
    fn test_display_date_rfc2822() {
        assert_eq!(
            display_date("Tue, 02 Jan 2024 10:00:00 +0000").as_deref(),
            Some("2024-01-02")
        );
    }

    #[test]
    fn test_display_date_rfc3339() {
        assert_eq!(
            display_date("2024-03-05T08:30:00Z").as_deref(),
            Some("2024-03-05")
        );
    }

    #[test]
    fn test_display_date_passthrough_and_empty() {
        assert_eq!(display_date("Mon, 01 Jan 2024").as_deref(), Some("Mon, 01 Jan 2024"));
        assert_eq!(display_date("   "), None);
    }

    #[test]
    fn test_host_in_domains() {
        let domains = vec!["blog.ui.com".to_string(), "community.ui.com".to_string()];
        assert!(host_in_domains("blog.ui.com", &domains));
        assert!(host_in_domains("BLOG.UI.COM", &domains));
        assert!(host_in_domains("www.blog.ui.com", &domains));
        assert!(!host_in_domains("ui.com", &domains));
        assert!(!host_in_domains("evilblog.ui.com", &domains));
    }

    #[test]
    fn test_refresh_stamp_format() {
        let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(refresh_stamp(now), "2024-01-02 03:04:05");
    }
}
