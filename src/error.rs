// src/error.rs
// =============================================================================
// Errors that can happen while building a sitemap.
//
// None of these stop a crawl. Each one is recorded against the task that
// produced it, the task contributes nothing more, and every other queued or
// in-flight task keeps going. The full list is printed after the report.
//
// Rust concepts:
// - thiserror: derives Display and std::error::Error from the #[error] text
// - Enums with named fields: each variant carries what the message needs
// =============================================================================

use std::time::Duration;
use thiserror::Error;

/// A failure recorded during a crawl.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrawlError {
    /// Network, status code, scheme or content-type failure while fetching a page
    #[error("could not fetch {url:?}: {reason}")]
    Fetch { url: String, reason: String },

    /// The fetched content could not be parsed for links
    #[error("could not parse {url:?}: {reason}")]
    Parse { url: String, reason: String },

    /// A single href could not be turned into a valid URL
    #[error("could not parse new URL {href:?}: {reason}")]
    MalformedLink { href: String, reason: String },

    /// A worker task panicked or was cancelled before reporting back
    #[error("crawl worker failed: {0}")]
    Worker(String),

    /// The run-level deadline elapsed and in-flight work was abandoned
    #[error("crawl deadline of {0:?} exceeded, results are partial")]
    DeadlineExceeded(Duration),
}

impl CrawlError {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        CrawlError::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(url: impl Into<String>, reason: impl ToString) -> Self {
        CrawlError::Parse {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed_link(href: impl Into<String>, reason: impl ToString) -> Self {
        CrawlError::MalformedLink {
            href: href.into(),
            reason: reason.to_string(),
        }
    }
}
