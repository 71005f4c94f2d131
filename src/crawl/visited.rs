// src/crawl/visited.rs
// =============================================================================
// Tracks which paths have already been scheduled for fetching.
//
// Checking "have we seen it?" and then inserting in a second step is a race:
// two workers can both see "no" and both schedule the same page. `claim`
// does both in one atomic insert, so exactly one caller wins per path.
// =============================================================================

use dashmap::DashSet;

#[derive(Debug, Default)]
pub struct VisitedRegistry {
    paths: DashSet<String>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `path` was not claimed before; the caller now owns scheduling it.
    pub fn claim(&self, path: &str) -> bool {
        self.paths.insert(path.to_string())
    }

    #[cfg(test)]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}
