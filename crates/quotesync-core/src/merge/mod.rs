//! Merge engine: reconcile the local collection with a remote batch.
//!
//! Records are matched by [`merge_key`](crate::models::merge_key). A remote
//! record with no local match is appended. A match that differs in category
//! or source is a conflict; the remote record replaces the local one in
//! place. Matches that agree on both fields are left alone.

use std::collections::HashMap;

use crate::models::{Conflict, QuoteRecord};

/// Result of merging a remote batch into a local collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// New collection: local order preserved, new items appended
    pub merged: Vec<QuoteRecord>,
    /// Every conflict detected in this batch
    pub conflicts: Vec<Conflict>,
    /// Whether `merged` differs from the input collection
    pub changed: bool,
    /// Number of appended remote records
    pub added: usize,
    /// Number of in-place replacements
    pub replaced: usize,
}

/// Merge `remote` into `local` without touching either input.
///
/// Runs in O(local + remote).
pub fn merge(local: &[QuoteRecord], remote: &[QuoteRecord]) -> MergeOutcome {
    let mut lookup: HashMap<String, &QuoteRecord> = HashMap::with_capacity(local.len());
    // Merge key to position in `merged`. Replacements keep the key, so the
    // slot of a local record stays put after an earlier overwrite.
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(local.len());
    for (index, record) in local.iter().enumerate() {
        let key = record.merge_key();
        lookup.insert(key.clone(), record);
        slots.insert(key, index);
    }

    let mut outcome = MergeOutcome {
        merged: local.to_vec(),
        ..MergeOutcome::default()
    };

    for incoming in remote {
        let key = incoming.merge_key();
        let Some(&existing) = lookup.get(&key) else {
            slots.insert(key.clone(), outcome.merged.len());
            lookup.insert(key, incoming);
            outcome.merged.push(incoming.clone());
            outcome.added += 1;
            outcome.changed = true;
            continue;
        };

        if existing.category == incoming.category && existing.source == incoming.source {
            continue;
        }

        outcome
            .conflicts
            .push(Conflict::new(existing.clone(), incoming.clone()));

        if let Some(&index) = slots.get(&key) {
            outcome.merged[index] = incoming.clone();
            outcome.replaced += 1;
            outcome.changed = true;
        }
    }

    outcome
}
