//! # Basic Load Statistics
//!
//! State counts, success rate, byte volumes, and pending-wait figures for
//! one table's records. Purely descriptive; insight rules interpret the
//! numbers downstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::load_record::{LoadRecord, LoadState};

/// Wait figures for loads that have not reached a terminal state,
/// measured from creation time against an explicit clock reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitStatistics {
    pub count: usize,
    pub mean_seconds: f64,
    pub max_seconds: f64,
    /// Label of the longest-waiting load, when it carries one
    pub longest_label: Option<String>,
}

/// Aggregate counts and rates over one table's load records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicStatistics {
    pub total_loads: usize,
    pub finished_loads: usize,
    pub cancelled_loads: usize,
    pub loading_loads: usize,
    pub pending_loads: usize,
    /// `finished / total * 100`; the denominator includes cancelled and
    /// still-active loads. 0 for an empty set.
    pub success_rate: f64,
    pub total_bytes: i64,
    pub mean_bytes: f64,
    pub first_load_at: Option<DateTime<Utc>>,
    pub last_load_at: Option<DateTime<Utc>>,
    pub span_seconds: f64,
    /// Absent when every load has reached a terminal state
    pub pending_wait: Option<WaitStatistics>,
}

/// Reduce a record slice to basic statistics. `now` feeds only the
/// pending-wait figures; everything else is a pure aggregate.
pub fn compute(records: &[LoadRecord], now: DateTime<Utc>) -> BasicStatistics {
    let total_loads = records.len();
    let mut finished_loads = 0usize;
    let mut cancelled_loads = 0usize;
    let mut loading_loads = 0usize;
    let mut pending_loads = 0usize;

    for record in records {
        match record.state {
            LoadState::Finished => finished_loads += 1,
            LoadState::Cancelled => cancelled_loads += 1,
            LoadState::Loading => loading_loads += 1,
            LoadState::Pending => pending_loads += 1,
        }
    }

    let success_rate = if total_loads > 0 {
        finished_loads as f64 / total_loads as f64 * 100.0
    } else {
        0.0
    };

    let sized: Vec<i64> = records.iter().filter_map(|r| r.size_bytes).collect();
    let total_bytes: i64 = sized.iter().sum();
    let mean_bytes = if sized.is_empty() {
        0.0
    } else {
        total_bytes as f64 / sized.len() as f64
    };

    let first_load_at = records.iter().map(|r| r.created_at).min();
    let last_load_at = records.iter().map(|r| r.created_at).max();
    let span_seconds = match (first_load_at, last_load_at) {
        (Some(first), Some(last)) => (last - first).num_milliseconds() as f64 / 1000.0,
        _ => 0.0,
    };

    BasicStatistics {
        total_loads,
        finished_loads,
        cancelled_loads,
        loading_loads,
        pending_loads,
        success_rate,
        total_bytes,
        mean_bytes,
        first_load_at,
        last_load_at,
        span_seconds,
        pending_wait: wait_statistics(records, now),
    }
}

fn wait_statistics(records: &[LoadRecord], now: DateTime<Utc>) -> Option<WaitStatistics> {
    let mut waits: Vec<(&LoadRecord, f64)> = records
        .iter()
        .filter_map(|r| r.wait_duration(now).map(|w| (r, w)))
        .collect();
    if waits.is_empty() {
        return None;
    }

    let count = waits.len();
    let mean_seconds = waits.iter().map(|(_, w)| w).sum::<f64>() / count as f64;
    waits.sort_by(|a, b| a.1.total_cmp(&b.1));
    let (longest, max_seconds) = waits.last().map(|(r, w)| (*r, *w))?;

    Some(WaitStatistics {
        count,
        mean_seconds,
        max_seconds,
        longest_label: longest.label.clone(),
    })
}
