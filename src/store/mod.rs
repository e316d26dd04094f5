//! Counter Store - file-backed document store for feed counts
//!
//! Two collections live in one JSON Lines file: `visitors` (one document
//! per visitor id) and `globalStats` (a single document). The whole file is
//! loaded at startup and rewritten atomically after every change.

mod counters;
mod load;

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::types::{CounterSnapshot, FeedOutcome, GlobalCount, StoredRecord, VisitorCount};
use crate::utils::atomic::{atomic_write_with, cleanup_temp_file};

/// In-memory image of the store file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CounterState {
    /// visitorId -> count
    pub(crate) visitors: BTreeMap<String, u64>,
    /// `None` until the first feed ever
    pub(crate) global: Option<GlobalCount>,
}

/// Counter store with in-memory cache for thread-safe operations
///
/// Readers only touch `state`. Writers serialize on `write_lock`, persist
/// without holding `state`, then take its write guard just long enough to
/// swap the new image in.
pub struct CounterStore {
    pub(crate) file_path: PathBuf,
    pub(crate) state: RwLock<CounterState>,
    pub(crate) write_lock: Mutex<()>,
}

impl CounterStore {
    /// Open the store at `file_path`, loading existing records
    ///
    /// A missing file is an empty store.
    pub fn open<P: AsRef<Path>>(file_path: P) -> StoreResult<Self> {
        let file_path = file_path.as_ref().to_path_buf();

        if cleanup_temp_file(&file_path)? {
            tracing::warn!(path = %file_path.display(), "removed stale temp file from interrupted write");
        }

        let state = load::load_state(&file_path)?;
        tracing::info!(
            path = %file_path.display(),
            visitors = state.visitors.len(),
            total_feeds = state.global.map(|g| g.total_feeds).unwrap_or(0),
            "counter store loaded"
        );

        Ok(Self {
            file_path,
            state: RwLock::new(state),
            write_lock: Mutex::new(()),
        })
    }

    /// Open the store described by `config`
    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        Self::open(&config.data_file)
    }

    /// Persist state to file (internal helper, expects caller to hold `write_lock`)
    pub(crate) fn persist_to_file(&self, state: &CounterState) -> StoreResult<()> {
        atomic_write_with(&self.file_path, |w| write_records(w, state))?;
        Ok(())
    }

    /// Get the store file path
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

fn write_records(w: &mut dyn Write, state: &CounterState) -> std::io::Result<()> {
    if let Some(global) = state.global {
        serde_json::to_writer(&mut *w, &StoredRecord::GlobalStats(global))?;
        w.write_all(b"\n")?;
    }
    for (visitor_id, count) in &state.visitors {
        let record = StoredRecord::Visitors(VisitorCount::new(visitor_id.clone(), *count));
        serde_json::to_writer(&mut *w, &record)?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

impl CounterStore {
    /// Current global total, or 0 before the first feed
    pub fn global_count(&self) -> u64 {
        counters::global_count(self)
    }

    /// Count for `visitor_id`, or 0 if the visitor never fed
    pub fn visitor_count(&self, visitor_id: &str) -> u64 {
        counters::visitor_count(self, visitor_id)
    }

    /// Increment both the visitor's count and the global count
    pub fn increment_for_visitor(&self, visitor_id: &str) -> StoreResult<()> {
        counters::feed_with(self, visitor_id, |_| {}).map(|_| ())
    }

    /// Same as [`increment_for_visitor`](Self::increment_for_visitor), reporting the new counts
    pub fn feed(&self, visitor_id: &str) -> StoreResult<FeedOutcome> {
        counters::feed_with(self, visitor_id, |_| {})
    }

    /// Same as [`feed`](Self::feed), calling `on_commit` with the new counts
    /// before the next feed can start
    ///
    /// Callbacks therefore observe commits in order; `on_commit` must not
    /// feed this store again.
    pub fn feed_with<F>(&self, visitor_id: &str, on_commit: F) -> StoreResult<FeedOutcome>
    where
        F: FnOnce(&FeedOutcome),
    {
        counters::feed_with(self, visitor_id, on_commit)
    }

    /// Copy of every record
    pub fn snapshot(&self) -> CounterSnapshot {
        counters::snapshot(self)
    }
}
