// src/crawl/testing.rs
// =============================================================================
// An in-memory website for crawl tests.
//
// It serves pages from a map instead of the network and counts every fetch
// per path, plus the highest number of fetches that were running at once.
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::normalize::path_key;
use crate::error::CrawlError;
use crate::fetcher::{content_type_allowed, FetchedPage, Fetcher};

pub const ORIGIN: &str = "http://test.local";

enum TestPage {
    Html(String),
    Status(u16),
    ContentType(&'static str, String),
    Raw(Vec<u8>),
    Panic,
}

pub struct StaticSite {
    pages: HashMap<String, TestPage>,
    delay: Duration,
    slow: HashMap<String, Duration>,
    fetches: Mutex<HashMap<String, usize>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl StaticSite {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            delay: Duration::ZERO,
            slow: HashMap::new(),
            fetches: Mutex::new(HashMap::new()),
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// The site used by the end-to-end scenarios: a home page, two sections
    /// that link back to each other, and one page two levels further down.
    pub fn scenario() -> Self {
        Self::new()
            .page(
                "/",
                r#"<html><body>
                    <a href="/">Home</a>
                    <a href="/page-1">Page 1</a>
                    <a href="/page-2">Page 2</a>
                    <a href="http://external-site.com">External</a>
                </body></html>"#,
            )
            .page("/page-1", SECTION_ONE)
            .page("/page-1a", SECTION_ONE)
            .page("/page-1b", SECTION_ONE)
            .page(
                "/page-2",
                r#"<html><body>
                    <a href="/">Home</a>
                    <a href="/page-2">Page 2</a>
                    <a href="/page-2a">Page 2A</a>
                </body></html>"#,
            )
            .page(
                "/page-2a",
                r#"<html><body><a href="/a-deep-page">Deep</a></body></html>"#,
            )
            .page(
                "/a-deep-page",
                "<html><body><p>Nothing to see here</p></body></html>",
            )
    }

    pub fn page(mut self, path: &str, html: &str) -> Self {
        self.pages
            .insert(path.to_string(), TestPage::Html(html.to_string()));
        self
    }

    pub fn status(mut self, path: &str, code: u16) -> Self {
        self.pages.insert(path.to_string(), TestPage::Status(code));
        self
    }

    pub fn content_type(mut self, path: &str, content_type: &'static str, body: &str) -> Self {
        self.pages.insert(
            path.to_string(),
            TestPage::ContentType(content_type, body.to_string()),
        );
        self
    }

    /// Serves `body` as text/html without any encoding checks
    pub fn raw(mut self, path: &str, body: &[u8]) -> Self {
        self.pages.insert(path.to_string(), TestPage::Raw(body.to_vec()));
        self
    }

    pub fn panics(mut self, path: &str) -> Self {
        self.pages.insert(path.to_string(), TestPage::Panic);
        self
    }

    /// Every fetch sleeps for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fetches of `path` sleep for `delay` instead of the site-wide delay
    pub fn slow(mut self, path: &str, delay: Duration) -> Self {
        self.slow.insert(path.to_string(), delay);
        self
    }

    pub fn seed(&self) -> String {
        ORIGIN.to_string()
    }

    pub fn fetch_count(&self, path: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    pub fn fetch_counts(&self) -> HashMap<String, usize> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

const SECTION_ONE: &str = r#"<html><body>
    <a href="/">Home</a>
    <a href="/page-1">Page 1</a>
    <a href="/page-1a">Page 1A</a>
    <a href="/page-1b">Page 1B</a>
</body></html>"#;

#[async_trait]
impl Fetcher for StaticSite {
    async fn fetch(
        &self,
        raw_url: &str,
        allowed_content_types: &[String],
    ) -> Result<FetchedPage, CrawlError> {
        let url = Url::parse(raw_url).map_err(|e| CrawlError::fetch(raw_url, e))?;
        let key = path_key(&url);

        *self.fetches.lock().unwrap().entry(key.clone()).or_default() += 1;

        let running = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);

        let delay = self.slow.get(&key).copied().unwrap_or(self.delay);
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);

        let (content_type, body) = match self.pages.get(&key) {
            Some(TestPage::Html(html)) => ("text/html; charset=utf-8", html.clone().into_bytes()),
            Some(TestPage::ContentType(content_type, body)) => {
                (*content_type, body.clone().into_bytes())
            }
            Some(TestPage::Raw(body)) => ("text/html", body.clone()),
            Some(TestPage::Status(code)) => {
                return Err(CrawlError::fetch(
                    raw_url,
                    format!("invalid status code, got {}, expected >=200 && <300", code),
                ))
            }
            Some(TestPage::Panic) => panic!("test page {} panicked", key),
            None => {
                return Err(CrawlError::fetch(
                    raw_url,
                    "invalid status code, got 404, expected >=200 && <300",
                ))
            }
        };

        if !content_type_allowed(content_type, allowed_content_types) {
            return Err(CrawlError::fetch(
                raw_url,
                format!(
                    "Content-Type {:?} must be one of {:?}",
                    content_type, allowed_content_types
                ),
            ));
        }

        Ok(FetchedPage { url, body })
    }
}
