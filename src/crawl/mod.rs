// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Concurrent crawling from a seed URL with a fixed concurrency cap
// - Same-host restriction (links to other sites are never followed)
// - Configurable depth limit
// - Every path fetched at most once, even when many pages link to it
//
// Submodules:
// - normalize: turns raw hrefs into same-host URLs and path keys
// - visited: the set of paths already scheduled
// - link_map: which page links to which
// - worker: fetches and processes a single page
// - scheduler: runs workers and detects when the crawl is complete
// =============================================================================

mod link_map;
mod normalize;
mod scheduler;
mod visited;
mod worker;

#[cfg(test)]
mod testing;

// Re-export the main crawling entry point and its result types
pub use link_map::SiteMap;
pub use scheduler::{build, CrawlResult, CrawlStats};
