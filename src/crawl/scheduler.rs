// src/crawl/scheduler.rs
// =============================================================================
// This module runs a crawl: it turns one seed URL into a growing set of
// fetch-and-parse tasks and decides when there is nothing left to do.
//
// How it works:
// 1. The seed path is claimed and the seed task (depth 1) is queued
// 2. Queued tasks are started while the admission gate has free permits,
//    one depth level at a time
// 3. Each finished worker hands back the pages it claimed; they are counted
//    as outstanding work first and then appended to the queue
// 4. The crawl is done when the outstanding-work counter reaches zero
//
// Why a counter and not "the queue is empty"?
// - The amount of work isn't known up front: any running worker may still
//   discover new pages after the queue has been drained
// - The counter covers queued AND running tasks, so zero really means done
//
// Why a semaphore and not a bounded queue?
// - One page can link to thousands of others. A queue sized to the
//   concurrency cap would make a worker wait on itself. The queue here grows
//   freely; the semaphore alone limits how many workers run at once.
//
// Why level by level?
// - A page is claimed by the first worker that finds it, and its depth comes
//   from that worker. If a deeper page could finish first, it would claim a
//   shared child at too great a depth and the child might not be expanded.
//   No depth d+1 task starts until every depth d task has finished, so each
//   page is claimed at its shortest distance from the seed, whatever the
//   timing or the cap.
//
// Rust concepts:
// - JoinSet: owns the spawned workers and yields their results as they finish
// - Semaphore: a counting gate; an owned permit travels into the worker task
//   and is released when the task ends
// =============================================================================

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

use super::link_map::{LinkMap, SiteMap};
use super::normalize::path_key;
use super::visited::VisitedRegistry;
use super::worker::{process, CrawlContext, Task, TaskOutcome};
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::fetcher::Fetcher;

/// Everything a finished crawl produced
#[derive(Debug)]
pub struct CrawlResult {
    pub site_map: SiteMap,
    pub errors: Vec<CrawlError>,
    pub stats: CrawlStats,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct CrawlStats {
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub paths_claimed: usize,
    pub edges_recorded: usize,
    pub duration_ms: u64,
}

/// Crawls the site behind `seed` and returns the link map and every recorded error.
///
/// Never fails as a whole: a bad seed, a broken page or a malformed link all
/// end up in `CrawlResult::errors` next to whatever could be discovered.
pub async fn build(seed: &str, fetcher: Arc<dyn Fetcher>, config: &CrawlConfig) -> CrawlResult {
    let started = Instant::now();
    let seed = seed.trim();

    let ctx = Arc::new(CrawlContext {
        fetcher,
        visited: VisitedRegistry::new(),
        links: LinkMap::new(),
        config: config.clone(),
    });

    // An unparseable seed is still queued; the fetcher reports why it failed
    if let Ok(seed_url) = Url::parse(seed) {
        ctx.visited.claim(&path_key(&seed_url));
    }

    tracing::info!(
        seed,
        max_depth = config.max_depth,
        cap = config.concurrency_cap,
        "starting crawl"
    );

    let mut scheduler = Scheduler::new(Arc::clone(&ctx), config.concurrency_cap);
    scheduler.enqueue(Task {
        url: seed.to_string(),
        depth: 1,
    });
    scheduler.run(config.deadline).await;

    let Scheduler {
        errors, mut stats, ..
    } = scheduler;

    stats.paths_claimed = ctx.visited.len();
    stats.edges_recorded = ctx.links.edge_count();
    stats.duration_ms = started.elapsed().as_millis() as u64;

    tracing::info!(
        pages = stats.pages_fetched,
        failed = stats.pages_failed,
        edges = stats.edges_recorded,
        errors = errors.len(),
        duration_ms = stats.duration_ms,
        "crawl finished"
    );

    CrawlResult {
        site_map: ctx.links.snapshot(),
        errors,
        stats,
    }
}

struct Scheduler {
    ctx: Arc<CrawlContext>,
    gate: Arc<Semaphore>,
    queue: VecDeque<Task>,
    in_flight: JoinSet<TaskOutcome>,
    /// Depth of the tasks currently running
    level: usize,
    /// Tasks created but not yet fully processed (queued + running)
    outstanding: usize,
    errors: Vec<CrawlError>,
    stats: CrawlStats,
}

impl Scheduler {
    fn new(ctx: Arc<CrawlContext>, concurrency_cap: usize) -> Self {
        Self {
            ctx,
            gate: Arc::new(Semaphore::new(concurrency_cap.max(1))),
            queue: VecDeque::new(),
            in_flight: JoinSet::new(),
            level: 1,
            outstanding: 0,
            errors: Vec::new(),
            stats: CrawlStats::default(),
        }
    }

    // Counted before it becomes visible in the queue
    fn enqueue(&mut self, task: Task) {
        self.outstanding += 1;
        self.queue.push_back(task);
    }

    async fn run(&mut self, deadline: Option<Duration>) {
        let deadline = deadline.map(|limit| (limit, tokio::time::Instant::now() + limit));

        loop {
            self.dispatch();

            debug_assert_eq!(self.outstanding, self.queue.len() + self.in_flight.len());
            if self.outstanding == 0 {
                return;
            }

            let joined = match deadline {
                Some((limit, at)) => {
                    match tokio::time::timeout_at(at, self.in_flight.join_next()).await {
                        Ok(joined) => joined,
                        Err(_) => {
                            self.abandon(limit);
                            return;
                        }
                    }
                }
                None => self.in_flight.join_next().await,
            };

            match joined {
                Some(Ok(outcome)) => self.complete(outcome),
                Some(Err(join_error)) => {
                    let err = CrawlError::Worker(join_error.to_string());
                    tracing::debug!(error = %err, "recorded crawl error");
                    self.errors.push(err);
                    self.stats.pages_failed += 1;
                    self.outstanding -= 1;
                }
                None => {
                    // Nothing running yet work is queued: the gate has no free
                    // permit for it. Stop, but don't let the truncation go unnoticed.
                    self.stall();
                    return;
                }
            }
        }
    }

    // Starts queued tasks until the queue is empty, the gate is full, or the
    // next task belongs to a deeper level than the one still running
    fn dispatch(&mut self) {
        while let Some(next) = self.queue.front() {
            if !self.in_flight.is_empty() && next.depth != self.level {
                break;
            }
            let Ok(permit) = Arc::clone(&self.gate).try_acquire_owned() else {
                break;
            };
            let Some(task) = self.queue.pop_front() else {
                break;
            };
            self.level = task.depth;

            let ctx = Arc::clone(&self.ctx);
            self.in_flight.spawn(async move {
                let _permit = permit;
                process(task, &ctx).await
            });
        }
    }

    fn complete(&mut self, outcome: TaskOutcome) {
        if outcome.fetched {
            self.stats.pages_fetched += 1;
        } else {
            self.stats.pages_failed += 1;
        }

        for err in outcome.errors {
            tracing::debug!(error = %err, "recorded crawl error");
            self.errors.push(err);
        }

        for child in outcome.children {
            self.enqueue(child);
        }

        // Only now, with every child counted, does the finished task stop counting
        self.outstanding -= 1;
    }

    fn stall(&mut self) {
        tracing::error!(
            outstanding = self.outstanding,
            queued = self.queue.len(),
            "no running workers but work is outstanding"
        );

        self.errors.push(CrawlError::Worker(format!(
            "crawl stopped with {} queued tasks that could not be started",
            self.queue.len()
        )));
        self.queue.clear();
        self.outstanding = 0;
    }

    fn abandon(&mut self, limit: Duration) {
        tracing::warn!(
            deadline = ?limit,
            running = self.in_flight.len(),
            queued = self.queue.len(),
            "crawl deadline exceeded, abandoning remaining work"
        );

        self.in_flight.abort_all();
        self.queue.clear();
        self.outstanding = 0;
        self.errors.push(CrawlError::DeadlineExceeded(limit));
    }
}
