// src/fetcher/http.rs
// =============================================================================
// This module fetches pages over HTTP.
//
// Key functionality:
// - Only http:// and https:// URLs are fetched
// - Only 2xx responses are accepted
// - The Content-Type header must match one of the allowed types
// - Network failures are described (timeout, redirect loop, connection, ...)
//
// Every failure becomes exactly one CrawlError::Fetch, so a broken page shows
// up once in the error listing and nothing else is recorded for it.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use super::{content_type_allowed, FetchedPage, Fetcher};
use crate::config::CrawlConfig;
use crate::error::CrawlError;

/// Fetcher backed by a shared reqwest client.
///
/// The client is cheap to clone (it's an Arc internally) and pools
/// connections, so one instance serves every worker of a crawl.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .connect_timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .pool_max_idle_per_host(config.concurrency_cap)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        raw_url: &str,
        allowed_content_types: &[String],
    ) -> Result<FetchedPage, CrawlError> {
        let url = Url::parse(raw_url).map_err(|e| CrawlError::fetch(raw_url, e))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CrawlError::fetch(
                raw_url,
                format!("URL must have an http or https scheme, got {:?}", url.scheme()),
            ));
        }

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CrawlError::fetch(raw_url, describe_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::fetch(
                raw_url,
                format!(
                    "invalid status code, got {}, expected >=200 && <300",
                    status.as_u16()
                ),
            ));
        }

        // Header values that aren't valid strings count as an empty content type
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        if !content_type_allowed(&content_type, allowed_content_types) {
            return Err(CrawlError::fetch(
                raw_url,
                format!(
                    "Content-Type {:?} must be one of {:?}",
                    content_type, allowed_content_types
                ),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CrawlError::fetch(raw_url, describe_error(&e)))?;

        tracing::debug!(url = %url, bytes = body.len(), "fetched page");

        Ok(FetchedPage {
            url,
            body: body.to_vec(),
        })
    }
}

// Turns a reqwest error into a short human-readable reason
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - Too many redirects
// - Connection refused / DNS failure
// - Body decoding problems
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
