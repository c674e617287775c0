//! Database layer for Quotesync

mod connection;
mod migrations;
mod slot_repository;

pub use connection::Database;
pub use slot_repository::{SlotKey, SlotRepository, SqliteSlotRepository};
