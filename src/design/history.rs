//! Bounded undo history of design snapshots.

use std::collections::VecDeque;

use super::options::DesignSnapshot;

/// Maximum number of snapshots kept.
pub const UNDO_LIMIT: usize = 20;

/// Fixed-capacity stack of style snapshots.
///
/// Pushing past the limit evicts the oldest entry. Popping returns the most
/// recent one.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    entries: VecDeque<DesignSnapshot>,
    limit: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoHistory {
    /// Empty history with the standard limit.
    pub fn new() -> Self {
        Self::with_limit(UNDO_LIMIT)
    }

    /// Empty history holding at most `limit` entries (minimum 1).
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit + 1),
            limit,
        }
    }

    /// Push a snapshot, evicting the oldest when over the limit.
    ///
    /// Returns the evicted snapshot, if any.
    pub fn push(&mut self, snapshot: DesignSnapshot) -> Option<DesignSnapshot> {
        self.entries.push_back(snapshot);
        if self.entries.len() > self.limit {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Remove and return the most recent snapshot.
    pub fn pop(&mut self) -> Option<DesignSnapshot> {
        self.entries.pop_back()
    }

    /// Most recent snapshot without removing it.
    pub fn peek(&self) -> Option<&DesignSnapshot> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Snapshots from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &DesignSnapshot> {
        self.entries.iter()
    }
}
