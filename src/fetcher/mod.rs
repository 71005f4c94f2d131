// src/fetcher/mod.rs
// =============================================================================
// This module retrieves pages for the crawler.
//
// Submodules:
// - http: the real fetcher, built on reqwest
//
// The crawler only talks to the `Fetcher` trait, so tests can swap in an
// in-memory site and count exactly how often each page is requested.
//
// Rust concepts:
// - Traits: a shared interface that several types can implement
// - async-trait: lets trait methods be async and still be used as dyn Fetcher
// =============================================================================

mod http;

pub use http::HttpFetcher;

use async_trait::async_trait;
use url::Url;

use crate::error::CrawlError;

/// A page that passed the scheme, status and content-type checks
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The requested URL as parsed (not the post-redirect location)
    pub url: Url,
    /// Raw response body
    pub body: Vec<u8>,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, failing with a single descriptive `CrawlError::Fetch` when
    /// the scheme is not http(s), the status is outside [200, 300), or the
    /// Content-Type contains none of `allowed_content_types`.
    async fn fetch(
        &self,
        url: &str,
        allowed_content_types: &[String],
    ) -> Result<FetchedPage, CrawlError>;
}

/// Case-insensitive substring match of a Content-Type header against the allow list.
/// An empty allow list accepts everything.
pub fn content_type_allowed(content_type: &str, allowed_content_types: &[String]) -> bool {
    if allowed_content_types.is_empty() {
        return true;
    }

    let content_type = content_type.to_lowercase();
    allowed_content_types
        .iter()
        .any(|allowed| content_type.contains(&allowed.to_lowercase()))
}
