//! Record store: the canonical in-memory quote collection and its persisted
//! form.
//!
//! Loading never fails on bad data. A missing slot, unparseable JSON or a
//! non-array root yields the built-in defaults; individual entries that fail
//! validation are dropped.

use std::collections::HashSet;

use serde_json::Value;

use crate::db::{Database, SlotKey, SlotRepository, SqliteSlotRepository};
use crate::error::{Error, Result};
use crate::models::{CategoryFilter, QuoteId, QuoteRecord, QuoteSource};
use crate::util::unix_timestamp_ms_now;

const DEFAULT_QUOTES: [(&str, &str); 3] = [
    (
        "The best way to get started is to quit talking and begin doing.",
        "Motivation",
    ),
    (
        "Don\u{2019}t let yesterday take up too much of today.",
        "Inspiration",
    ),
    (
        "It\u{2019}s not whether you get knocked down, it\u{2019}s whether you get up.",
        "Resilience",
    ),
];

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Records appended to the collection
    pub added: Vec<QuoteRecord>,
    /// Entries dropped by structural validation
    pub invalid: usize,
    /// Valid entries whose text was already present
    pub duplicates: usize,
}

/// Owns the quote collection and writes it through to the slot table.
pub struct RecordStore {
    db: Database,
    records: Vec<QuoteRecord>,
}

impl RecordStore {
    /// Load the collection from `db`, falling back to defaults.
    pub fn open(db: Database) -> Result<Self> {
        let raw = SqliteSlotRepository::new(db.connection()).get(SlotKey::Quotes)?;
        let records = parse_collection(raw.as_deref(), unix_timestamp_ms_now());
        tracing::debug!("Loaded {} quotes", records.len());
        Ok(Self { db, records })
    }

    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    /// Re-read the persisted collection, discarding in-memory state.
    pub fn load(&mut self) -> Result<&[QuoteRecord]> {
        let raw = self.slots().get(SlotKey::Quotes)?;
        self.records = parse_collection(raw.as_deref(), unix_timestamp_ms_now());
        Ok(&self.records)
    }

    /// Persist the current collection (full overwrite).
    pub fn save(&self) -> Result<()> {
        let serialized = serde_json::to_string(&self.records)?;
        self.slots().set(SlotKey::Quotes, &serialized)
    }

    /// Replace the whole collection. The in-memory copy only changes once
    /// the new collection has been written.
    pub fn replace_all(&mut self, records: Vec<QuoteRecord>) -> Result<()> {
        let serialized = serde_json::to_string(&records)?;
        self.slots().set(SlotKey::Quotes, &serialized)?;
        self.records = records;
        Ok(())
    }

    /// Add a user-entered quote.
    pub fn add(&mut self, text: &str, category: &str) -> Result<QuoteRecord> {
        let record = QuoteRecord::new_local(text, category);
        if !record.is_valid() {
            return Err(Error::InvalidInput(
                "quote text and category must not be empty".to_string(),
            ));
        }

        let key = record.merge_key();
        if self.records.iter().any(|existing| existing.merge_key() == key) {
            return Err(Error::DuplicateQuote(record.text));
        }

        let mut next = self.records.clone();
        next.push(record.clone());
        self.replace_all(next)?;
        Ok(record)
    }

    /// Import a JSON array of quotes, appending the new ones.
    pub fn import_json(&mut self, raw: &str) -> Result<ImportReport> {
        let parsed: Value = serde_json::from_str(raw)
            .map_err(|error| Error::InvalidImport(format!("invalid JSON: {error}")))?;
        let Value::Array(items) = parsed else {
            return Err(Error::InvalidImport(
                "root must be an array of quotes".to_string(),
            ));
        };

        let mut seen = self
            .records
            .iter()
            .map(QuoteRecord::merge_key)
            .collect::<HashSet<_>>();
        let mut report = ImportReport::default();

        for item in &items {
            let Some((text, category)) = validated_fields(item) else {
                report.invalid += 1;
                continue;
            };
            let record = QuoteRecord::new_local(text, category);
            if seen.insert(record.merge_key()) {
                report.added.push(record);
            } else {
                report.duplicates += 1;
            }
        }

        if !report.added.is_empty() {
            let mut next = self.records.clone();
            next.extend(report.added.iter().cloned());
            self.replace_all(next)?;
        }

        tracing::info!(
            "Imported {} quotes ({} invalid, {} duplicates)",
            report.added.len(),
            report.invalid,
            report.duplicates
        );
        Ok(report)
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        categories_of(&self.records)
    }

    pub fn load_filter(&self) -> Result<CategoryFilter> {
        Ok(self
            .slots()
            .get(SlotKey::LastCategoryFilter)?
            .map_or(CategoryFilter::All, |value| CategoryFilter::parse(&value)))
    }

    pub fn save_filter(&self, filter: &CategoryFilter) -> Result<()> {
        match filter {
            CategoryFilter::All => self.slots().remove(SlotKey::LastCategoryFilter),
            CategoryFilter::Category(category) => {
                self.slots().set(SlotKey::LastCategoryFilter, category)
            }
        }
    }

    fn slots(&self) -> SqliteSlotRepository<'_> {
        SqliteSlotRepository::new(self.db.connection())
    }
}

/// Distinct categories in first-seen order. Spellings that differ only in
/// case are listed once, under the first one seen.
pub fn categories_of(records: &[QuoteRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| seen.insert(record.category.to_lowercase()))
        .map(|record| record.category.clone())
        .collect()
}

/// The collection used on first run or when stored data is unusable.
pub fn default_quotes(now_ms: i64) -> Vec<QuoteRecord> {
    DEFAULT_QUOTES
        .iter()
        .map(|(text, category)| QuoteRecord {
            id: QuoteId::new_local(),
            text: (*text).to_string(),
            category: (*category).to_string(),
            source: QuoteSource::Local,
            last_modified: now_ms,
        })
        .collect()
}

/// Structural check: an object with non-empty string `text` and `category`.
pub fn is_valid_quote(value: &Value) -> bool {
    validated_fields(value).is_some()
}

/// Decode the persisted slot, applying validation and field backfill.
pub fn parse_collection(raw: Option<&str>, now_ms: i64) -> Vec<QuoteRecord> {
    let Some(raw) = raw else {
        return default_quotes(now_ms);
    };

    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            tracing::warn!("Stored quotes are not an array; using defaults");
            return default_quotes(now_ms);
        }
        Err(error) => {
            tracing::warn!("Stored quotes are not valid JSON ({error}); using defaults");
            return default_quotes(now_ms);
        }
    };

    let mut seen_ids = HashSet::new();
    items
        .iter()
        .filter_map(|item| backfilled_record(item, now_ms))
        .map(|mut record| {
            if !seen_ids.insert(record.id.clone()) {
                record.id = QuoteId::new_local();
                seen_ids.insert(record.id.clone());
            }
            record
        })
        .collect()
}

fn validated_fields(value: &Value) -> Option<(&str, &str)> {
    let object = value.as_object()?;
    let text = object.get("text")?.as_str()?;
    let category = object.get("category")?.as_str()?;
    if text.trim().is_empty() || category.trim().is_empty() {
        return None;
    }
    Some((text, category))
}

fn backfilled_record(value: &Value, now_ms: i64) -> Option<QuoteRecord> {
    let (text, category) = validated_fields(value)?;
    let object = value.as_object()?;

    let id = object
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .map_or_else(QuoteId::new_local, QuoteId::from_raw);
    let source = object
        .get("source")
        .and_then(|source| serde_json::from_value::<QuoteSource>(source.clone()).ok())
        .unwrap_or_default();
    let last_modified = object
        .get("lastModified")
        .and_then(Value::as_i64)
        .unwrap_or(now_ms);

    Some(QuoteRecord {
        id,
        text: text.to_string(),
        category: category.to_string(),
        source,
        last_modified,
    })
}
