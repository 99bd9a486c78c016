use serde::{Deserialize, Serialize};

use crate::model::LocationQuery;

pub const RECENT_CAPACITY: usize = 5;

/// What `record` does with a query that is already cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Leave the existing entry where it is.
    #[default]
    KeepPosition,
    MoveToFront,
}

/// Most-recent-first list of distinct searches, at most `RECENT_CAPACITY` long.
#[derive(Debug, Clone, Default)]
pub struct RecentSearches {
    entries: Vec<LocationQuery>,
    policy: DuplicatePolicy,
}

impl RecentSearches {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self { entries: Vec::with_capacity(RECENT_CAPACITY), policy }
    }

    pub fn record(&mut self, query: LocationQuery) {
        if let Some(pos) = self.entries.iter().position(|e| *e == query) {
            if self.policy == DuplicatePolicy::MoveToFront {
                let existing = self.entries.remove(pos);
                self.entries.insert(0, existing);
            }
            return;
        }

        self.entries.insert(0, query);
        self.entries.truncate(RECENT_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn list(&self) -> Vec<String> {
        self.entries.iter().map(|q| q.as_str().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }
}
