//! Quote export helpers.

use chrono::{DateTime, Utc};

use crate::models::QuoteRecord;

/// Render the collection as pretty-printed JSON.
///
/// The output uses the persisted record shape, so it can be fed straight
/// back into an import.
pub fn render_json_export(quotes: &[QuoteRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(quotes)
}

/// Default export file name for a given moment, safe on every filesystem.
#[must_use]
pub fn suggested_export_file_name(at: DateTime<Utc>) -> String {
    format!("quotes-{}.json", at.format("%Y-%m-%dT%H-%M-%S-%3fZ"))
}
