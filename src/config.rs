// src/config.rs
// =============================================================================
// Settings that shape a single crawl.
//
// The CLI (src/cli.rs) validates raw flag values; this struct is what the
// scheduler, workers and fetcher actually read. Keeping it separate from the
// clap struct lets tests build a crawl without going through argument parsing.
// =============================================================================

use std::time::Duration;

use crate::cli::Cli;

/// Content types accepted when no --content-type flag is given
pub const DEFAULT_CONTENT_TYPES: &[&str] = &["text/html"];

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Tasks at a depth greater than this still get fetched, but do not enqueue children
    pub max_depth: usize,
    /// Maximum number of pages fetched and parsed at the same time
    pub concurrency_cap: usize,
    /// Lowercased content-type fragments a response must contain (empty = accept all)
    pub allowed_content_types: Vec<String>,
    /// Timeout for a single HTTP request
    pub request_timeout: Duration,
    /// Optional wall-clock limit for the whole crawl
    pub deadline: Option<Duration>,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            concurrency_cap: 40,
            allowed_content_types: DEFAULT_CONTENT_TYPES
                .iter()
                .map(|ct| ct.to_string())
                .collect(),
            request_timeout: Duration::from_secs(10),
            deadline: None,
            user_agent: format!("sitemap-builder/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&Cli> for CrawlConfig {
    fn from(cli: &Cli) -> Self {
        let allowed_content_types = if cli.content_types.is_empty() {
            CrawlConfig::default().allowed_content_types
        } else {
            cli.content_types
                .iter()
                .map(|ct| ct.trim().to_lowercase())
                .filter(|ct| !ct.is_empty())
                .collect()
        };

        Self {
            max_depth: cli.max_depth,
            concurrency_cap: cli.cap,
            allowed_content_types,
            request_timeout: Duration::from_secs(cli.timeout),
            deadline: cli.deadline.map(Duration::from_secs),
            ..Default::default()
        }
    }
}
