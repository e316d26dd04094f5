//! Counter records held by the store

use serde::{Deserialize, Serialize};

/// Per-visitor feed count, keyed by `visitorId`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorCount {
    #[serde(rename = "visitorId")]
    pub visitor_id: String,
    pub count: u64,
}

impl VisitorCount {
    pub fn new(visitor_id: impl Into<String>, count: u64) -> Self {
        Self {
            visitor_id: visitor_id.into(),
            count,
        }
    }
}

/// The one-and-only global feed total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlobalCount {
    #[serde(rename = "totalFeeds")]
    pub total_feeds: u64,
}

/// One line of the store file, tagged with its collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "table")]
pub enum StoredRecord {
    #[serde(rename = "globalStats")]
    GlobalStats(GlobalCount),
    #[serde(rename = "visitors")]
    Visitors(VisitorCount),
}

/// Counts observed right after a feed was applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedOutcome {
    #[serde(rename = "visitorId")]
    pub visitor_id: String,
    #[serde(rename = "visitorCount")]
    pub visitor_count: u64,
    #[serde(rename = "totalFeeds")]
    pub total_feeds: u64,
}

/// Point-in-time copy of every record in the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    #[serde(rename = "totalFeeds")]
    pub total_feeds: u64,
    pub visitors: Vec<VisitorCount>,
}

impl CounterSnapshot {
    /// Sum of every visitor's count
    pub fn visitor_total(&self) -> u64 {
        self.visitors.iter().map(|v| v.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visitor_record_line_format() {
        let record = StoredRecord::Visitors(VisitorCount::new("v1", 2));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"table":"visitors","visitorId":"v1","count":2}"#);
    }

    #[test]
    fn test_global_record_line_format() {
        let record = StoredRecord::GlobalStats(GlobalCount { total_feeds: 7 });
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"table":"globalStats","totalFeeds":7}"#);
    }

    #[test]
    fn test_unknown_table_is_rejected() {
        let result = serde_json::from_str::<StoredRecord>(r#"{"table":"other","count":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let result =
            serde_json::from_str::<StoredRecord>(r#"{"table":"visitors","visitorId":"v","count":-1}"#);
        assert!(result.is_err());
    }
}
