//! quotesync-core - Core library for Quotesync
//!
//! This crate owns the quote collection and everything that keeps it in step
//! with the remote feed: persistence, the remote gateway, the merge engine,
//! the sync orchestrator and the conflict review session. Front ends (the CLI
//! today) only trigger operations and display results.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod merge;
pub mod models;
pub mod remote;
pub mod services;
pub mod state;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{CategoryFilter, Conflict, QuoteId, QuoteRecord, QuoteSource};
