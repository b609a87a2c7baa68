//! Per-table load timelines.
//!
//! An [`EntityTimeline`] is the unit of analysis: every record for one
//! table, sorted ascending by creation time. Timelines are built by the
//! event collector and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::models::load_record::{LoadRecord, TableKey};

/// Time-ordered load records for a single table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTimeline {
    pub entity: TableKey,
    pub records: Vec<LoadRecord>,
}

impl EntityTimeline {
    /// Build a timeline from pre-grouped records, establishing the
    /// ascending-by-creation-time order every downstream analyzer relies on.
    pub fn new(entity: TableKey, mut records: Vec<LoadRecord>) -> Self {
        records.sort_by_key(|r| r.created_at);
        Self { entity, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Interval statistics need at least two records; shorter timelines
    /// produce no frequency output (absence, not an error).
    pub fn is_analyzable(&self) -> bool {
        self.records.len() >= 2
    }

    /// Seconds between the first and last record's creation time.
    pub fn span_seconds(&self) -> f64 {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => {
                (last.created_at - first.created_at).num_milliseconds() as f64 / 1000.0
            }
            _ => 0.0,
        }
    }

    /// Check the ascending sort invariant. Used by debug assertions in the
    /// analyzers; the collector is the only producer of timelines, so a
    /// violation here is a construction bug.
    pub fn is_sorted(&self) -> bool {
        self.records
            .windows(2)
            .all(|pair| pair[0].created_at <= pair[1].created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::load_record::LoadState;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn record_at(secs: i64) -> LoadRecord {
        LoadRecord {
            entity: TableKey::new("sales", "orders"),
            label: None,
            state: LoadState::Finished,
            created_at: ts(secs),
            started_at: None,
            committed_at: None,
            finished_at: None,
            size_bytes: None,
        }
    }

    #[test]
    fn test_new_sorts_by_creation_time() {
        let timeline = EntityTimeline::new(
            TableKey::new("sales", "orders"),
            vec![record_at(300), record_at(0), record_at(60)],
        );
        assert!(timeline.is_sorted());
        assert_eq!(timeline.records[0].created_at, ts(0));
        assert_eq!(timeline.records[2].created_at, ts(300));
        assert_eq!(timeline.span_seconds(), 300.0);
    }

    #[test]
    fn test_analyzable_requires_two_records() {
        let single = EntityTimeline::new(TableKey::new("d", "t"), vec![record_at(0)]);
        assert!(!single.is_analyzable());

        let pair = EntityTimeline::new(TableKey::new("d", "t"), vec![record_at(0), record_at(1)]);
        assert!(pair.is_analyzable());
    }

    #[test]
    fn test_empty_timeline_span_is_zero() {
        let empty = EntityTimeline::new(TableKey::new("d", "t"), vec![]);
        assert!(empty.is_empty());
        assert_eq!(empty.span_seconds(), 0.0);
    }
}
