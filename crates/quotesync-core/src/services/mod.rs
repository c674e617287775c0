//! Shared services used by front ends.

mod quotes;

pub use quotes::{QuoteService, QuoteState};
