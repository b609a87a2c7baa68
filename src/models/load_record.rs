//! # Load Records
//!
//! Raw and normalized representations of a single load/import operation.
//!
//! ## Overview
//!
//! The metadata store exposes load jobs as loosely-typed rows: every field
//! may be NULL, state strings vary in casing across frontend versions, and
//! phase timestamps are only present once the corresponding phase has been
//! reached. [`RawLoadRow`] models that boundary faithfully; [`LoadRecord`]
//! is the strongly-typed form produced by one normalization pass in the
//! event collector.
//!
//! ## Lifecycle
//!
//! A load job moves through `PENDING → LOADING → FINISHED`, or is
//! terminated as `CANCELLED`. Phase boundaries:
//!
//! ```text
//! create_time        job enqueued
//! load_start_time    write phase begins
//! load_commit_time   write phase ends, publish phase begins
//! load_finish_time   publish phase ends, job visible to queries
//! ```
//!
//! Invariant: `created_at <= started_at <= committed_at <= finished_at`
//! whenever the later stamps are present.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Lifecycle state of a load job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// Job is queued but has not started writing
    Pending,
    /// Job is actively writing data
    Loading,
    /// Job completed successfully and is visible to queries
    Finished,
    /// Job was cancelled or failed
    Cancelled,
}

impl LoadState {
    /// Check if this is a terminal state (no further transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }

    /// Check if the job completed successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Check if the job is still being processed
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Loading)
    }

    /// Parse a state string as reported by the metadata store.
    ///
    /// Casing is inconsistent across frontend versions, so matching is
    /// case-insensitive. `RUNNING` is an alias some releases use for the
    /// write phase.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" | "QUEUEING" => Some(Self::Pending),
            "LOADING" | "RUNNING" => Some(Self::Loading),
            "FINISHED" => Some(Self::Finished),
            "CANCELLED" | "FAILED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Loading => write!(f, "loading"),
            Self::Finished => write!(f, "finished"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for LoadState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid load state: {s}"))
    }
}

/// Composite identifier grouping load records into one timeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableKey {
    pub database: String,
    pub table: String,
}

impl TableKey {
    pub fn new(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.table)
    }
}

/// One row of the loads metadata table, exactly as the cluster reports it.
///
/// Every field is optional: rows for jobs that never started carry only
/// `create_time`, and older frontend versions omit `scan_bytes` entirely.
/// Do not read these fields directly outside the event collector.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct RawLoadRow {
    pub database_name: Option<String>,
    pub table_name: Option<String>,
    pub label: Option<String>,
    pub state: Option<String>,
    pub create_time: Option<NaiveDateTime>,
    pub load_start_time: Option<NaiveDateTime>,
    pub load_commit_time: Option<NaiveDateTime>,
    pub load_finish_time: Option<NaiveDateTime>,
    pub scan_bytes: Option<i64>,
}

/// Normalized load operation record.
///
/// Produced by [`crate::analytics::collector::normalize_row`]; all
/// downstream analyzers consume this type only. Missing optional stamps
/// mean the corresponding phase has not completed, never "unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRecord {
    pub entity: TableKey,
    pub label: Option<String>,
    pub state: LoadState,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub committed_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub size_bytes: Option<i64>,
}

impl LoadRecord {
    /// Check whether all three phase boundary stamps are present.
    pub fn has_complete_phases(&self) -> bool {
        self.started_at.is_some() && self.committed_at.is_some() && self.finished_at.is_some()
    }

    /// Write phase duration in seconds (`committed_at - started_at`).
    ///
    /// Present only for finished jobs with all phase stamps whose
    /// differences are non-negative; a stamp ordering violation makes the
    /// record ineligible for phase statistics rather than producing a
    /// negative duration.
    pub fn write_duration(&self) -> Option<f64> {
        self.phase_durations().map(|(write, _, _)| write)
    }

    /// Publish phase duration in seconds (`finished_at - committed_at`).
    pub fn publish_duration(&self) -> Option<f64> {
        self.phase_durations().map(|(_, publish, _)| publish)
    }

    /// Total duration in seconds (`finished_at - started_at`).
    pub fn total_duration(&self) -> Option<f64> {
        self.phase_durations().map(|(_, _, total)| total)
    }

    /// All three phase durations at once, or `None` if the record does not
    /// qualify for phase analysis.
    pub fn phase_durations(&self) -> Option<(f64, f64, f64)> {
        if self.state != LoadState::Finished {
            return None;
        }
        let started = self.started_at?;
        let committed = self.committed_at?;
        let finished = self.finished_at?;

        let write = seconds_between(started, committed)?;
        let publish = seconds_between(committed, finished)?;
        let total = seconds_between(started, finished)?;
        Some((write, publish, total))
    }

    /// How long a still-active job has been waiting, measured from its
    /// creation time against the supplied clock reading.
    ///
    /// Returns `None` for terminal jobs. Clamped at zero in case the
    /// metadata store's clock runs ahead of the caller's.
    pub fn wait_duration(&self, now: DateTime<Utc>) -> Option<f64> {
        if !self.state.is_active() {
            return None;
        }
        let waited = (now - self.created_at).num_milliseconds() as f64 / 1000.0;
        Some(waited.max(0.0))
    }
}

/// Non-negative difference between two stamps in seconds, or `None` when
/// the later stamp precedes the earlier one.
fn seconds_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> Option<f64> {
    let millis = (later - earlier).num_milliseconds();
    if millis < 0 {
        return None;
    }
    Some(millis as f64 / 1000.0)
}

/// Interpret a naive metadata-store timestamp as UTC.
///
/// The cluster reports wall-clock times without an offset; the deployment
/// convention is UTC frontends.
pub(crate) fn to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&naive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn finished_record(start: i64, commit: i64, finish: i64) -> LoadRecord {
        LoadRecord {
            entity: TableKey::new("sales", "orders"),
            label: None,
            state: LoadState::Finished,
            created_at: ts(0),
            started_at: Some(ts(start)),
            committed_at: Some(ts(commit)),
            finished_at: Some(ts(finish)),
            size_bytes: Some(1024),
        }
    }

    #[test]
    fn test_state_parsing_is_case_insensitive() {
        assert_eq!(LoadState::parse("FINISHED"), Some(LoadState::Finished));
        assert_eq!(LoadState::parse("finished"), Some(LoadState::Finished));
        assert_eq!(LoadState::parse(" Cancelled "), Some(LoadState::Cancelled));
        assert_eq!(LoadState::parse("RUNNING"), Some(LoadState::Loading));
        assert_eq!(LoadState::parse("garbage"), None);
    }

    #[test]
    fn test_state_groups() {
        assert!(LoadState::Finished.is_terminal());
        assert!(LoadState::Cancelled.is_terminal());
        assert!(LoadState::Pending.is_active());
        assert!(LoadState::Loading.is_active());
        assert!(LoadState::Finished.is_success());
        assert!(!LoadState::Cancelled.is_success());
    }

    #[test]
    fn test_phase_durations_for_finished_record() {
        let record = finished_record(10, 40, 50);
        assert_eq!(record.phase_durations(), Some((30.0, 10.0, 40.0)));
        assert_eq!(record.write_duration(), Some(30.0));
        assert_eq!(record.publish_duration(), Some(10.0));
        assert_eq!(record.total_duration(), Some(40.0));
    }

    #[test]
    fn test_phase_durations_absent_without_all_stamps() {
        let mut record = finished_record(10, 40, 50);
        record.committed_at = None;
        assert_eq!(record.phase_durations(), None);
    }

    #[test]
    fn test_phase_durations_absent_for_unfinished_record() {
        let mut record = finished_record(10, 40, 50);
        record.state = LoadState::Loading;
        assert_eq!(record.phase_durations(), None);
    }

    #[test]
    fn test_phase_durations_reject_ordering_violation() {
        // commit stamp before start stamp
        let record = finished_record(40, 10, 50);
        assert_eq!(record.phase_durations(), None);
    }

    #[test]
    fn test_wait_duration_for_active_record() {
        let mut record = finished_record(10, 40, 50);
        record.state = LoadState::Pending;
        assert_eq!(record.wait_duration(ts(120)), Some(120.0));
        // clock skew clamps at zero
        assert_eq!(record.wait_duration(ts(-5)), Some(0.0));
    }

    #[test]
    fn test_wait_duration_absent_for_terminal_record() {
        let record = finished_record(10, 40, 50);
        assert_eq!(record.wait_duration(ts(120)), None);
    }

    #[test]
    fn test_table_key_display() {
        assert_eq!(TableKey::new("sales", "orders").to_string(), "sales.orders");
    }
}
