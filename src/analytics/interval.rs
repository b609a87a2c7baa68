//! # Frequency Analyzer
//!
//! Inter-arrival statistics and temporal classification for one table's
//! load timeline.
//!
//! ## Overview
//!
//! Adjacent creation times in a sorted timeline yield intervals; the
//! analyzer reduces them to [`IntervalStatistics`] (mean, population
//! standard deviation, coefficient of variation, min/max) and classifies
//! the result along two axes:
//!
//! - **how often** loads arrive ([`FrequencyTier`] and [`FrequencyLevel`])
//! - **how evenly** they are spaced ([`RegularityTier`] and the parallel
//!   0-100 [`RegularityGrade`] score)
//!
//! ## Two frequency tables
//!
//! Two breakpoint tables exist on purpose. [`FrequencyTier`] buckets mean
//! intervals for ranking many tables at once; [`FrequencyLevel`] buckets
//! load rates for the single-table deep analysis, with finer steps in the
//! sub-minute range. Their boundaries do not line up exactly and they are
//! kept separate; see DESIGN.md before attempting to unify them.
//!
//! Timelines with fewer than two records produce no output at all:
//! absence, not an error. This module never panics on well-formed
//! timelines and never throws.

use serde::{Deserialize, Serialize};

use crate::models::timeline::EntityTimeline;

/// Dispersion statistics over a timeline's inter-arrival intervals.
///
/// Pure value computed in one pass; never mutated afterwards. The
/// coefficient of variation is `stddev / mean * 100`; it is `None` when
/// the mean interval is zero (all records created at the same instant),
/// in which case regularity classification falls back to the most
/// irregular tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalStatistics {
    /// Number of intervals (records - 1)
    pub count: usize,
    pub mean_seconds: f64,
    pub stddev_seconds: f64,
    pub coefficient_of_variation: Option<f64>,
    pub min_seconds: f64,
    pub max_seconds: f64,
}

/// Coarse frequency buckets over the mean interval, used when ranking
/// many tables side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyTier {
    /// More than one load per second
    Extreme,
    /// Mean interval under a minute
    VeryHigh,
    /// Mean interval under 15 minutes
    Frequent,
    /// Mean interval under an hour
    Moderate,
    /// Mean interval under 4 hours
    Hourly,
    /// Mean interval under a day
    Daily,
    /// Multi-day cadence
    LowFrequency,
}

impl FrequencyTier {
    /// Classify a mean inter-arrival interval, most frequent first; the
    /// first matching breakpoint wins.
    pub fn from_mean_interval(mean_seconds: f64) -> Self {
        if mean_seconds < 1.0 {
            Self::Extreme
        } else if mean_seconds < 60.0 {
            Self::VeryHigh
        } else if mean_seconds < 900.0 {
            Self::Frequent
        } else if mean_seconds < 3_600.0 {
            Self::Moderate
        } else if mean_seconds < 14_400.0 {
            Self::Hourly
        } else if mean_seconds < 86_400.0 {
            Self::Daily
        } else {
            Self::LowFrequency
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extreme => "extreme",
            Self::VeryHigh => "very_high",
            Self::Frequent => "frequent",
            Self::Moderate => "moderate",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::LowFrequency => "low_frequency",
        }
    }

    /// Human wording used by the report formatter.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Extreme => "more than one load per second",
            Self::VeryHigh => "multiple loads per minute",
            Self::Frequent => "several loads per hour",
            Self::Moderate => "roughly one load per hour",
            Self::Hourly => "a few loads per day",
            Self::Daily => "about one load per day",
            Self::LowFrequency => "loads arrive days apart",
        }
    }
}

impl std::fmt::Display for FrequencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained frequency buckets over the load rate, used by the
/// single-table deep analysis.
///
/// Breakpoints are tested in declaration order; the first match wins. The
/// `>60/min` breakpoint coincides numerically with `>1/sec` and is kept
/// as a distinct row deliberately (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyLevel {
    /// More than one load per second
    Extreme,
    /// More than 60 loads per minute
    VeryHigh,
    /// More than 4 loads per minute
    High,
    /// More than one load per minute
    Moderate,
    /// More than one load per hour
    Low,
    /// At most one load per hour
    Rare,
}

impl FrequencyLevel {
    /// Classify a load rate expressed in loads per second.
    pub fn from_load_rate(loads_per_second: f64) -> Self {
        let per_minute = loads_per_second * 60.0;
        let per_hour = loads_per_second * 3_600.0;

        if loads_per_second > 1.0 {
            Self::Extreme
        } else if per_minute > 60.0 {
            Self::VeryHigh
        } else if per_minute > 4.0 {
            Self::High
        } else if per_minute > 1.0 {
            Self::Moderate
        } else if per_hour > 1.0 {
            Self::Low
        } else {
            Self::Rare
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extreme => "extreme",
            Self::VeryHigh => "very_high",
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
            Self::Rare => "rare",
        }
    }
}

impl std::fmt::Display for FrequencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Regularity buckets over the coefficient of variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegularityTier {
    /// CV below 20%: near-clockwork spacing
    VeryRegular,
    /// CV below 50%
    Regular,
    /// CV below 100%
    Irregular,
    /// CV at or above 100%, or undefined
    VeryIrregular,
}

impl RegularityTier {
    /// Classify a coefficient of variation (percent). `None` means the
    /// mean interval was zero and CV is undefined; that defaults to the
    /// most irregular tier.
    pub fn from_cv(cv_percent: Option<f64>) -> Self {
        match cv_percent {
            Some(cv) if cv < 20.0 => Self::VeryRegular,
            Some(cv) if cv < 50.0 => Self::Regular,
            Some(cv) if cv < 100.0 => Self::Irregular,
            _ => Self::VeryIrregular,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryRegular => "very_regular",
            Self::Regular => "regular",
            Self::Irregular => "irregular",
            Self::VeryIrregular => "very_irregular",
        }
    }
}

impl std::fmt::Display for RegularityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grade over the 0-100 regularity score (`max(0, 100 - CV)`).
///
/// The score form is what insight and report text reference; both the
/// CV-based tier and this grade are produced for every classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegularityGrade {
    /// Score >= 80
    VeryRegular,
    /// Score >= 60
    Regular,
    /// Score >= 40
    SomewhatRegular,
    /// Score < 40
    Irregular,
}

impl RegularityGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::VeryRegular
        } else if score >= 60.0 {
            Self::Regular
        } else if score >= 40.0 {
            Self::SomewhatRegular
        } else {
            Self::Irregular
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryRegular => "very_regular",
            Self::Regular => "regular",
            Self::SomewhatRegular => "somewhat_regular",
            Self::Irregular => "irregular",
        }
    }
}

impl std::fmt::Display for RegularityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Temporal classification of one timeline along both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyClassification {
    pub tier: FrequencyTier,
    pub level: FrequencyLevel,
    pub regularity: RegularityTier,
    /// 0-100, higher is more evenly spaced
    pub regularity_score: f64,
    pub regularity_grade: RegularityGrade,
}

impl FrequencyClassification {
    /// Derive the classification from interval statistics. Stateless:
    /// recomputed from the statistics on every call.
    pub fn from_statistics(stats: &IntervalStatistics) -> Self {
        let tier = FrequencyTier::from_mean_interval(stats.mean_seconds);
        let rate = if stats.mean_seconds > 0.0 {
            1.0 / stats.mean_seconds
        } else {
            // all records share one instant; any finite rate
            // underestimates it, so classify straight to the top
            f64::INFINITY
        };
        let level = FrequencyLevel::from_load_rate(rate);

        let regularity = RegularityTier::from_cv(stats.coefficient_of_variation);
        let regularity_score = stats
            .coefficient_of_variation
            .map(|cv| (100.0 - cv).max(0.0))
            .unwrap_or(0.0);
        let regularity_grade = RegularityGrade::from_score(regularity_score);

        Self {
            tier,
            level,
            regularity,
            regularity_score,
            regularity_grade,
        }
    }
}

/// Frequency analysis output for one timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyAnalysis {
    pub statistics: IntervalStatistics,
    pub classification: FrequencyClassification,
}

/// Compute interval statistics and classification for a timeline.
///
/// Returns `None` for timelines with fewer than two records. Never
/// panics in release builds; the sorted-input precondition is checked
/// with a debug assertion because the collector is the only producer of
/// timelines.
pub fn analyze(timeline: &EntityTimeline) -> Option<FrequencyAnalysis> {
    let statistics = interval_statistics(timeline)?;
    let classification = FrequencyClassification::from_statistics(&statistics);
    Some(FrequencyAnalysis {
        statistics,
        classification,
    })
}

/// Reduce a timeline's adjacent creation-time gaps to dispersion
/// statistics. `None` when fewer than two records exist.
pub fn interval_statistics(timeline: &EntityTimeline) -> Option<IntervalStatistics> {
    if !timeline.is_analyzable() {
        return None;
    }
    debug_assert!(timeline.is_sorted(), "timeline not sorted by creation time");

    let intervals: Vec<f64> = timeline
        .records
        .windows(2)
        .map(|pair| {
            let gap = (pair[1].created_at - pair[0].created_at).num_milliseconds() as f64 / 1000.0;
            debug_assert!(gap >= 0.0, "negative inter-arrival interval");
            gap
        })
        .collect();

    let count = intervals.len();
    let mean = intervals.iter().sum::<f64>() / count as f64;

    // population variance: divide by N, matching threshold calibration
    let variance = intervals
        .iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / count as f64;
    let stddev = variance.sqrt();

    let coefficient_of_variation = if mean > 0.0 {
        Some(stddev / mean * 100.0)
    } else {
        None
    };

    let min = intervals.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = intervals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    Some(IntervalStatistics {
        count,
        mean_seconds: mean,
        stddev_seconds: stddev,
        coefficient_of_variation,
        min_seconds: min,
        max_seconds: max,
    })
}
