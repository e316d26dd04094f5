//! Loading the store file into memory

use std::collections::btree_map::Entry;
use std::fs;
use std::path::Path;

use crate::error::StoreResult;
use crate::types::StoredRecord;

use super::CounterState;

/// Read `file_path` into a [`CounterState`]
///
/// Blank and unparseable lines (bad JSON or invalid UTF-8) are skipped. When a key appears more than
/// once the first document wins.
pub(crate) fn load_state(file_path: &Path) -> StoreResult<CounterState> {
    if !file_path.exists() {
        return Ok(CounterState::default());
    }

    let content = fs::read(file_path)?;
    Ok(parse_state(&content))
}

/// Strip surrounding ASCII whitespace (including a trailing `\r`)
fn trim_line(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &line[start..end]
}

pub(crate) fn parse_state(content: &[u8]) -> CounterState {
    let mut state = CounterState::default();

    for (index, line) in content.split(|b| *b == b'\n').enumerate() {
        let line = trim_line(line);
        if line.is_empty() {
            continue;
        }

        let record = match serde_json::from_slice::<StoredRecord>(line) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(line = index + 1, error = %e, "skipping unreadable record");
                continue;
            }
        };

        match record {
            StoredRecord::GlobalStats(global) => {
                if state.global.is_some() {
                    tracing::warn!(line = index + 1, "ignoring duplicate globalStats record");
                } else {
                    state.global = Some(global);
                }
            }
            StoredRecord::Visitors(visitor) => match state.visitors.entry(visitor.visitor_id) {
                Entry::Occupied(entry) => {
                    tracing::warn!(
                        line = index + 1,
                        visitor_id = %entry.key(),
                        "ignoring duplicate visitor record"
                    );
                }
                Entry::Vacant(entry) => {
                    entry.insert(visitor.count);
                }
            },
        }
    }

    state
}
