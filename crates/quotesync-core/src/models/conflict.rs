//! Sync conflict model

use serde::{Deserialize, Serialize};

use super::QuoteRecord;

/// A local/remote pair sharing a merge key but differing in category or
/// source. The remote side is what the sync cycle applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Record as it was in the local collection before the merge
    pub local: QuoteRecord,
    /// Record that replaced it
    pub remote: QuoteRecord,
}

impl Conflict {
    #[must_use]
    pub const fn new(local: QuoteRecord, remote: QuoteRecord) -> Self {
        Self { local, remote }
    }

    /// Whether the two sides disagree on category
    #[must_use]
    pub fn category_changed(&self) -> bool {
        self.local.category != self.remote.category
    }
}
