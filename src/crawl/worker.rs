// src/crawl/worker.rs
// =============================================================================
// Executes one crawl task: fetch a page, find its links, record them, and
// hand newly claimed pages back to the scheduler.
//
// A worker never retries and never stops the crawl. A page that can't be
// fetched or parsed produces exactly one error and no edges; a single bad
// href produces one error and the remaining hrefs are still processed.
// =============================================================================

use std::sync::Arc;

use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::fetcher::Fetcher;
use crate::parser::extract_hrefs;

use super::link_map::LinkMap;
use super::normalize::normalize;
use super::visited::VisitedRegistry;

/// One unit of crawl work: a URL at a given number of hops from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub url: String,
    pub depth: usize,
}

/// State shared by every worker of one crawl
pub struct CrawlContext {
    pub fetcher: Arc<dyn Fetcher>,
    pub visited: VisitedRegistry,
    pub links: LinkMap,
    pub config: CrawlConfig,
}

/// What a worker reports back to the scheduler
#[derive(Debug, Default)]
pub struct TaskOutcome {
    /// Tasks for pages this worker claimed
    pub children: Vec<Task>,
    pub errors: Vec<CrawlError>,
    /// Number of new edges this page added to the link map
    pub edges: usize,
    /// Whether the page itself was fetched and parsed successfully
    pub fetched: bool,
}

pub async fn process(task: Task, ctx: &CrawlContext) -> TaskOutcome {
    let mut outcome = TaskOutcome::default();

    tracing::debug!(url = %task.url, depth = task.depth, "crawling");

    let page = match ctx
        .fetcher
        .fetch(&task.url, &ctx.config.allowed_content_types)
        .await
    {
        Ok(page) => page,
        Err(e) => {
            outcome.errors.push(e);
            return outcome;
        }
    };

    let hrefs = match extract_hrefs(page.url.as_str(), &page.body) {
        Ok(hrefs) => hrefs,
        Err(e) => {
            outcome.errors.push(e);
            return outcome;
        }
    };
    outcome.fetched = true;

    // Children are only expanded while the task is within the depth limit;
    // checking this before claiming keeps pages we won't fetch unclaimed
    let may_expand = task.depth <= ctx.config.max_depth;

    for href in hrefs {
        let link = match normalize(&page.url, &href) {
            Ok(Some(link)) => link,
            Ok(None) => continue,
            Err(e) => {
                outcome.errors.push(e);
                continue;
            }
        };

        if ctx.links.record(&link.source_path, &link.dest_path) {
            outcome.edges += 1;
        }

        if may_expand && ctx.visited.claim(&link.dest_path) {
            outcome.children.push(Task {
                url: link.url.to_string(),
                depth: task.depth + 1,
            });
        }
    }

    tracing::debug!(
        url = %task.url,
        edges = outcome.edges,
        children = outcome.children.len(),
        "page done"
    );

    outcome
}
