//! Bounded recent sets: one position-ranked id list per (chain, kind).
//! The id points back into the point cache, the way the original layout
//! kept sorted sets of ids next to TTL'd point entries.

use std::collections::BTreeMap;

/// Ranked set of entity ids ordered by chain position. Trimmed to a
/// fixed size after every insert so memory stays bounded.
#[derive(Debug, Default)]
pub struct RecentSet {
    // (position, id) gives a total order; ties on position keep both ids.
    entries: BTreeMap<(i64, String), ()>,
}

impl RecentSet {
    pub fn insert(&mut self, position: i64, id: String, limit: usize) {
        self.entries.insert((position, id), ());
        while self.entries.len() > limit {
            // Lowest position first, so the oldest entry drops.
            let oldest = self
                .entries
                .keys()
                .next()
                .cloned()
                .expect("non-empty set has a first key");
            self.entries.remove(&oldest);
        }
    }

    /// Newest first, at most `limit` ids.
    pub fn newest(&self, limit: usize) -> Vec<String> {
        self.entries
            .keys()
            .rev()
            .take(limit)
            .map(|(_, id)| id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
