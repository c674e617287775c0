//! Key-value slot repository implementation

use crate::error::Result;
use crate::util::unix_timestamp_ms_now;
use rusqlite::{params, Connection, OptionalExtension};

/// Durable slots the application persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKey {
    /// JSON array holding the full quote collection
    Quotes,
    /// Last category filter the user picked
    LastCategoryFilter,
}

impl SlotKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quotes => "quotes",
            Self::LastCategoryFilter => "last_category_filter",
        }
    }
}

/// Trait for slot storage operations
pub trait SlotRepository {
    /// Read a slot, `None` when it was never written
    fn get(&self, key: SlotKey) -> Result<Option<String>>;

    /// Overwrite a slot
    fn set(&self, key: SlotKey, value: &str) -> Result<()>;

    /// Remove a slot
    fn remove(&self, key: SlotKey) -> Result<()>;
}

/// `SQLite` implementation of `SlotRepository`
pub struct SqliteSlotRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSlotRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn get(&self, key: SlotKey) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: SlotKey, value: &str) -> Result<()> {
        let now = unix_timestamp_ms_now();
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key.as_str(), value, now],
        )?;
        Ok(())
    }

    fn remove(&self, key: SlotKey) -> Result<()> {
        self.conn
            .execute("DELETE FROM slots WHERE key = ?", params![key.as_str()])?;
        Ok(())
    }
}
