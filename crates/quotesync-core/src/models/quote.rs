//! Quote record model

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::util::unix_timestamp_ms_now;

const LOCAL_ID_PREFIX: &str = "local-";
const REMOTE_ID_PREFIX: &str = "srv-";

/// Category assigned to every record that arrives from the remote feed.
pub const REMOTE_CATEGORY: &str = "Server";

/// Identifier of a quote record.
///
/// Local ids are `local-<uuid v7>`; ids minted for remote items are
/// `srv-<remote id>` so their provenance is visible in exports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(String);

impl QuoteId {
    /// Create a new unique local id
    #[must_use]
    pub fn new_local() -> Self {
        Self(format!("{LOCAL_ID_PREFIX}{}", Uuid::now_v7()))
    }

    /// Create an id for a remote item, keyed by the remote's own id
    #[must_use]
    pub fn remote(remote_id: impl fmt::Display) -> Self {
        Self(format!("{REMOTE_ID_PREFIX}{remote_id}"))
    }

    /// Create an id for a remote item that carried no id of its own
    #[must_use]
    pub fn new_remote() -> Self {
        Self::remote(Uuid::now_v7())
    }

    /// Wrap an id read back from storage or an import file
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.0.starts_with(REMOTE_ID_PREFIX)
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a record was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSource {
    #[default]
    Local,
    Remote,
}

impl fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

/// A quote in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    /// Unique identifier
    pub id: QuoteId,
    /// Quote text; also the merge key once lowercased
    pub text: String,
    /// Free-form category label
    pub category: String,
    /// Provenance
    pub source: QuoteSource,
    /// Creation or last replacement time (Unix ms). Provenance hint only.
    pub last_modified: i64,
}

impl QuoteRecord {
    /// Create a new local record. Text and category are trimmed.
    #[must_use]
    pub fn new_local(text: &str, category: &str) -> Self {
        Self {
            id: QuoteId::new_local(),
            text: text.trim().to_string(),
            category: category.trim().to_string(),
            source: QuoteSource::Local,
            last_modified: unix_timestamp_ms_now(),
        }
    }

    /// Build the internal form of an item fetched from the remote feed.
    #[must_use]
    pub fn from_remote(remote_id: Option<String>, title: &str, fetched_at: i64) -> Self {
        Self {
            id: remote_id.map_or_else(QuoteId::new_remote, QuoteId::remote),
            text: title.trim().to_string(),
            category: REMOTE_CATEGORY.to_string(),
            source: QuoteSource::Remote,
            last_modified: fetched_at,
        }
    }

    /// Key used to match records across the local/remote boundary
    #[must_use]
    pub fn merge_key(&self) -> String {
        merge_key(&self.text)
    }

    /// Both text and category are non-empty after trimming
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && !self.category.trim().is_empty()
    }
}

/// Case-insensitive, whitespace-trimmed form of a quote text.
///
/// `"Hello"` and `"hello "` share a key; `"Hello."` does not.
#[must_use]
pub fn merge_key(text: &str) -> String {
    text.trim().to_lowercase()
}
