//! # Phase Duration Analyzer
//!
//! Write/publish/total duration statistics over finished load jobs.
//!
//! ## Overview
//!
//! A finished load splits into a write phase (`started_at` to
//! `committed_at`) and a publish phase (`committed_at` to `finished_at`).
//! This analyzer reduces every eligible record to per-phase mean, min,
//! max, population standard deviation, percent-of-total, and a slow
//! outlier count. The statistics carry no interpretation; insight rules
//! read them afterwards.
//!
//! Eligibility: `state == finished` with all three boundary stamps
//! present and non-negative phase durations. Records that miss any stamp
//! are excluded silently. Zero eligible records means absence, not an
//! error.
//!
//! Slow outlier counting is a second pass: the threshold is
//! `multiplier * phase_mean`, so it only exists once the first pass over
//! the same population has produced the mean.

use serde::{Deserialize, Serialize};

use crate::config::RuleSet;
use crate::models::load_record::LoadRecord;

/// A named sub-interval of a load's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    Write,
    Publish,
    Total,
}

impl LoadPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Publish => "publish",
            Self::Total => "total",
        }
    }
}

impl std::fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive statistics for one phase across the eligible population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseStatistics {
    pub phase: LoadPhase,
    pub count: usize,
    pub mean_seconds: f64,
    pub min_seconds: f64,
    pub max_seconds: f64,
    pub stddev_seconds: f64,
    /// Share of the total-phase mean, in percent; 0 when the total mean
    /// is zero
    pub pct_of_total: f64,
    /// Durations exceeding `slow_threshold_seconds`
    pub slow_count: usize,
    /// `multiplier * mean_seconds`, recorded so report text can show the
    /// cut-off that was applied
    pub slow_threshold_seconds: f64,
}

/// Per-phase statistics for one table's finished loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseBreakdown {
    /// Number of records that passed the eligibility filter
    pub sample_count: usize,
    pub write: PhaseStatistics,
    pub publish: PhaseStatistics,
    pub total: PhaseStatistics,
}

impl PhaseBreakdown {
    /// Phases with at least one slow outlier, in fixed write/publish/total
    /// order.
    pub fn phases_with_outliers(&self) -> Vec<&PhaseStatistics> {
        [&self.write, &self.publish, &self.total]
            .into_iter()
            .filter(|stats| stats.slow_count > 0)
            .collect()
    }
}

/// Compute phase duration statistics over a record set.
///
/// Returns `None` when no record qualifies. The outlier multiplier comes
/// from the supplied rule set.
pub fn analyze(records: &[LoadRecord], rules: &RuleSet) -> Option<PhaseBreakdown> {
    let samples: Vec<(f64, f64, f64)> = records
        .iter()
        .filter_map(LoadRecord::phase_durations)
        .collect();
    if samples.is_empty() {
        return None;
    }

    let writes: Vec<f64> = samples.iter().map(|s| s.0).collect();
    let publishes: Vec<f64> = samples.iter().map(|s| s.1).collect();
    let totals: Vec<f64> = samples.iter().map(|s| s.2).collect();

    let total_mean = mean(&totals);
    let write = phase_statistics(LoadPhase::Write, &writes, total_mean, rules);
    let publish = phase_statistics(LoadPhase::Publish, &publishes, total_mean, rules);
    let total = phase_statistics(LoadPhase::Total, &totals, total_mean, rules);

    Some(PhaseBreakdown {
        sample_count: samples.len(),
        write,
        publish,
        total,
    })
}

fn phase_statistics(
    phase: LoadPhase,
    durations: &[f64],
    total_mean: f64,
    rules: &RuleSet,
) -> PhaseStatistics {
    let phase_mean = mean(durations);
    let variance = durations
        .iter()
        .map(|v| (v - phase_mean).powi(2))
        .sum::<f64>()
        / durations.len() as f64;

    let pct_of_total = if total_mean > 0.0 {
        phase_mean / total_mean * 100.0
    } else {
        0.0
    };

    // second pass: the threshold depends on this population's own mean
    let slow_threshold_seconds = rules.slow_outlier_multiplier * phase_mean;
    let slow_count = durations
        .iter()
        .filter(|&&d| d > slow_threshold_seconds)
        .count();

    PhaseStatistics {
        phase,
        count: durations.len(),
        mean_seconds: phase_mean,
        min_seconds: durations.iter().cloned().fold(f64::INFINITY, f64::min),
        max_seconds: durations.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        stddev_seconds: variance.sqrt(),
        pct_of_total,
        slow_count,
        slow_threshold_seconds,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
