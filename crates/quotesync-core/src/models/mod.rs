//! Data models for Quotesync

mod conflict;
mod filter;
mod quote;

pub use conflict::Conflict;
pub use filter::CategoryFilter;
pub use quote::{merge_key, QuoteId, QuoteRecord, QuoteSource, REMOTE_CATEGORY};
