//! # Event Collector
//!
//! Normalizes loosely-typed metadata rows into sorted per-table timelines.
//!
//! ## Overview
//!
//! This is the single place where NULL handling, state-string parsing, and
//! timestamp conversion happen. Rows that cannot be placed on a timeline
//! (missing creation time, missing entity fields, unrecognized state) are
//! dropped silently; the drop count is debug-logged but never surfaced as
//! an error. Empty input yields empty output.
//!
//! Output order is deterministic regardless of input order: timelines are
//! keyed through an ordered map and each timeline is sorted ascending by
//! creation time.

use std::collections::BTreeMap;

use crate::models::load_record::{to_utc, LoadRecord, LoadState, RawLoadRow, TableKey};
use crate::models::timeline::EntityTimeline;

/// Group raw rows into cleaned, time-ordered per-table timelines.
pub fn collect(rows: Vec<RawLoadRow>) -> Vec<EntityTimeline> {
    let total = rows.len();
    let mut groups: BTreeMap<TableKey, Vec<LoadRecord>> = BTreeMap::new();

    let mut kept = 0usize;
    for row in rows {
        if let Some(record) = normalize_row(row) {
            kept += 1;
            groups.entry(record.entity.clone()).or_default().push(record);
        }
    }

    if kept < total {
        tracing::debug!(
            dropped = total - kept,
            total = total,
            "dropped rows without a usable creation time, entity, or state"
        );
    }

    groups
        .into_iter()
        .map(|(entity, records)| EntityTimeline::new(entity, records))
        .collect()
}

/// Normalize one raw row, or `None` when the row cannot participate in any
/// analysis.
///
/// Phase stamps are kept independently optional: a pending job legitimately
/// carries only its creation time.
pub fn normalize_row(row: RawLoadRow) -> Option<LoadRecord> {
    let database = non_empty(row.database_name)?;
    let table = non_empty(row.table_name)?;
    let state = LoadState::parse(row.state.as_deref()?)?;
    let created_at = to_utc(row.create_time?);

    Some(LoadRecord {
        entity: TableKey::new(database, table),
        label: non_empty(row.label),
        state,
        created_at,
        started_at: row.load_start_time.map(to_utc),
        committed_at: row.load_commit_time.map(to_utc),
        finished_at: row.load_finish_time.map(to_utc),
        size_bytes: row.scan_bytes,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
