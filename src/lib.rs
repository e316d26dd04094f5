//! Feed Counter
//!
//! Backend for the "feed the platypus" page: every feed bumps the
//! visitor's own counter and one global counter, both kept in a small
//! file-backed document store.
//!
//! # Modules
//!
//! - `types`: Records (VisitorCount, GlobalCount) and reported values
//! - `store`: The counter store with read and increment operations
//! - `api`: REST endpoints and WebSocket live updates
//! - `config`: Environment-driven configuration
//! - `error`: Store error type
//! - `utils`: Atomic file replacement
//!
//! # Example
//!
//! ```no_run
//! use feed_counter::CounterStore;
//!
//! let store = CounterStore::open("feeds.jsonl").unwrap();
//! store.increment_for_visitor("visitor-123").unwrap();
//! assert!(store.global_count() >= 1);
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{ServerConfig, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use store::CounterStore;
pub use types::{CounterSnapshot, FeedOutcome, GlobalCount, VisitorCount};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
