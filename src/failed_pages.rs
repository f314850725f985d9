//! Names of pages that failed to load.
//!
//! Created once per process and shared with every generator through an `Arc`. The set only
//! grows: a page that failed once is never loaded again.

use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct FailedPages {
    names: RwLock<HashSet<String>>,
}

impl FailedPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, page: &str) -> bool {
        // a poisoned lock still holds a usable set; insertions are never partial
        self.names
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(page)
    }

    /// Record a failed page. Returns `true` when the page was not already recorded.
    pub fn insert(&self, page: &str) -> bool {
        self.names
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(page.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recorded names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .names
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect();
        names.sort();
        names
    }
}
