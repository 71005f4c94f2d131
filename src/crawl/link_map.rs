// src/crawl/link_map.rs
// =============================================================================
// Collects which page links to which, while many workers write at once.
//
// Each source path keeps its destinations in first-seen order without
// duplicates. Workers only ever call `record`; the sorted view used for the
// report is a separate copy taken once the crawl is done.
//
// Rust concepts:
// - DashMap: a HashMap split into shards, each with its own lock, so workers
//   writing different pages rarely wait for each other
// - BTreeMap: a map that keeps its keys sorted
// =============================================================================

use dashmap::DashMap;
use std::collections::BTreeMap;

/// Sorted copy of the crawl result: page path -> sorted linked paths
pub type SiteMap = BTreeMap<String, Vec<String>>;

#[derive(Debug, Default)]
pub struct LinkMap {
    links: DashMap<String, Vec<String>>,
}

impl LinkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an edge; returns `false` if it was already present.
    pub fn record(&self, source_path: &str, dest_path: &str) -> bool {
        let mut destinations = self.links.entry(source_path.to_string()).or_default();

        // Per-page out-degree is small, a linear scan beats hashing here
        if destinations.iter().any(|d| d == dest_path) {
            return false;
        }
        destinations.push(dest_path.to_string());
        true
    }

    /// Destinations of `source_path` in first-seen order
    #[cfg(test)]
    pub fn destinations(&self, source_path: &str) -> Option<Vec<String>> {
        self.links.get(source_path).map(|d| d.value().clone())
    }

    pub fn edge_count(&self) -> usize {
        self.links.iter().map(|entry| entry.value().len()).sum()
    }

    /// Sorted, stable copy for reporting
    pub fn snapshot(&self) -> SiteMap {
        self.links
            .iter()
            .map(|entry| {
                let mut destinations = entry.value().clone();
                destinations.sort();
                (entry.key().clone(), destinations)
            })
            .collect()
    }
}
