//! Conflict review session for the most recent committed sync cycle.

use std::collections::{HashMap, HashSet};

use crate::models::{Conflict, QuoteId, QuoteRecord};
use crate::util::unix_timestamp_ms_now;

/// Conflicts from the latest commit plus the collection as it was right
/// before that commit. Superseded by the next committed cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictSession {
    conflicts: Vec<Conflict>,
    snapshot: Vec<QuoteRecord>,
    opened_at: i64,
}

impl ConflictSession {
    #[must_use]
    pub fn new(conflicts: Vec<Conflict>, snapshot: Vec<QuoteRecord>) -> Self {
        Self {
            conflicts,
            snapshot,
            opened_at: unix_timestamp_ms_now(),
        }
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Pre-merge copy of the collection
    pub fn snapshot(&self) -> &[QuoteRecord] {
        &self.snapshot
    }

    /// When the session was opened (Unix ms)
    pub const fn opened_at(&self) -> i64 {
        self.opened_at
    }

    /// Build the collection with every conflicting entry put back to its
    /// pre-merge form. Returns the new collection and how many entries were
    /// reverted.
    ///
    /// Each conflict restores its own local record into the slot that still
    /// holds its remote record. Slots overwritten again later in the same
    /// batch are restored once, by the conflict that wrote them last.
    #[must_use]
    pub fn revert_to_local(&self, current: &[QuoteRecord]) -> (Vec<QuoteRecord>, usize) {
        let mut slots: HashMap<&QuoteId, usize> = HashMap::with_capacity(current.len());
        for (index, record) in current.iter().enumerate() {
            slots.entry(&record.id).or_insert(index);
        }

        let mut records = current.to_vec();
        let mut restored = HashSet::new();
        for conflict in self.conflicts.iter().rev() {
            let Some(&index) = slots.get(&conflict.remote.id) else {
                continue;
            };
            if current[index] != conflict.remote || !restored.insert(index) {
                continue;
            }
            records[index] = conflict.local.clone();
        }

        let reverted = restored.len();
        (records, reverted)
    }
}
