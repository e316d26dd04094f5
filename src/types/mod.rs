//! Data types for the feed counter
//!
//! Records persisted by the store plus the values it reports back.

mod counts;

pub use counts::{CounterSnapshot, FeedOutcome, GlobalCount, StoredRecord, VisitorCount};
