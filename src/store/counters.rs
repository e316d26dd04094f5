//! Read and increment operations

use crate::error::{StoreError, StoreResult};
use crate::types::{CounterSnapshot, FeedOutcome, GlobalCount, VisitorCount};

use super::CounterStore;

/// Key reported when the global counter overflows
const GLOBAL_KEY: &str = "globalStats";

pub fn global_count(store: &CounterStore) -> u64 {
    store
        .state
        .read()
        .global
        .map(|g| g.total_feeds)
        .unwrap_or(0)
}

pub fn visitor_count(store: &CounterStore, visitor_id: &str) -> u64 {
    store
        .state
        .read()
        .visitors
        .get(visitor_id)
        .copied()
        .unwrap_or(0)
}

/// Upsert the visitor record and the global record
///
/// Writers are serialized on `write_lock` for the whole operation. Both
/// upserts are applied to a copy which is persisted before it replaces the
/// live state, so a failed write changes neither counter and readers never
/// wait on the file write.
pub fn feed_with<F>(store: &CounterStore, visitor_id: &str, on_commit: F) -> StoreResult<FeedOutcome>
where
    F: FnOnce(&FeedOutcome),
{
    let _writer = store.write_lock.lock();
    let mut next = store.state.read().clone();

    let visitor_count = match next.visitors.get_mut(visitor_id) {
        Some(count) => {
            *count = count.checked_add(1).ok_or_else(|| StoreError::CounterOverflow {
                key: visitor_id.to_string(),
            })?;
            *count
        }
        None => {
            next.visitors.insert(visitor_id.to_string(), 1);
            1
        }
    };

    let total_feeds = match next.global.as_mut() {
        Some(global) => {
            global.total_feeds = global.total_feeds.checked_add(1).ok_or_else(|| {
                StoreError::CounterOverflow {
                    key: GLOBAL_KEY.to_string(),
                }
            })?;
            global.total_feeds
        }
        None => {
            next.global = Some(GlobalCount { total_feeds: 1 });
            1
        }
    };

    if let Err(e) = store.persist_to_file(&next) {
        tracing::error!(visitor_id, error = %e, "failed to persist feed");
        return Err(e);
    }
    *store.state.write() = next;

    tracing::debug!(visitor_id, visitor_count, total_feeds, "feed recorded");

    let outcome = FeedOutcome {
        visitor_id: visitor_id.to_string(),
        visitor_count,
        total_feeds,
    };
    on_commit(&outcome);
    Ok(outcome)
}

pub fn snapshot(store: &CounterStore) -> CounterSnapshot {
    let state = store.state.read();
    CounterSnapshot {
        total_feeds: state.global.map(|g| g.total_feeds).unwrap_or(0),
        visitors: state
            .visitors
            .iter()
            .map(|(id, count)| VisitorCount::new(id.clone(), *count))
            .collect(),
    }
}
