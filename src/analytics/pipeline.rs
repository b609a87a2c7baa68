//! # Analysis Pipeline
//!
//! End-to-end entry points and the tagged result envelope.
//!
//! ## Overview
//!
//! One analysis call processes one materialized row batch sequentially:
//! collect, reduce, classify, synthesize, render. No state survives the
//! call and identical batches produce identical results for the same
//! clock reading.
//!
//! The result is a tagged variant, one per outcome shape:
//!
//! - `completed` - statistics, classification, insights, and a report
//! - `no_data` - zero usable records after normalization; distinct from
//!   failure by design
//! - `error` - the row-fetch collaborator failed; carries the upstream
//!   message and nothing else
//!
//! Rendering dispatches on the tag with one formatter per variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::basic::{self, BasicStatistics};
use crate::analytics::collector;
use crate::analytics::insights::{self, Insight};
use crate::analytics::interval::{self, FrequencyAnalysis, FrequencyTier};
use crate::analytics::phases::{self, PhaseBreakdown};
use crate::clock::Clock;
use crate::config::RuleSet;
use crate::database::{FetchWindow, LoadFetcher, LoadSelector};
use crate::models::load_record::{RawLoadRow, TableKey};
use crate::models::timeline::EntityTimeline;
use crate::report;

/// Coarse classification of one table in the batch, for side-by-side
/// ranking next to the deep-analyzed primary entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub entity: TableKey,
    pub load_count: usize,
    /// Absent for single-record timelines
    pub mean_interval_seconds: Option<f64>,
    pub tier: Option<FrequencyTier>,
}

impl TableSummary {
    fn from_timeline(timeline: &EntityTimeline) -> Self {
        let stats = interval::interval_statistics(timeline);
        Self {
            entity: timeline.entity.clone(),
            load_count: timeline.len(),
            mean_interval_seconds: stats.as_ref().map(|s| s.mean_seconds),
            tier: stats
                .as_ref()
                .map(|s| FrequencyTier::from_mean_interval(s.mean_seconds)),
        }
    }
}

/// Full result of a completed analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedAnalysis {
    /// The deep-analyzed table: the busiest timeline in the batch
    pub entity: TableKey,
    pub basic: BasicStatistics,
    /// Absent when the primary timeline has fewer than two records
    pub frequency: Option<FrequencyAnalysis>,
    /// Absent when no finished record carries all phase stamps
    pub phases: Option<PhaseBreakdown>,
    pub insights: Vec<Insight>,
    /// Every table seen in the batch, coarse-classified
    pub tables: Vec<TableSummary>,
}

/// Zero usable records after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoDataNotice {
    pub message: String,
}

/// The row-fetch collaborator failed; analysis never ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamFailure {
    pub message: String,
}

/// Tagged analysis outcome, one variant per result shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Completed(CompletedAnalysis),
    NoData(NoDataNotice),
    Error(UpstreamFailure),
}

impl AnalysisOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::NoData(_) => "no_data",
            Self::Error(_) => "error",
        }
    }
}

/// Structured outcome plus the rendered text report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadAnalysis {
    pub outcome: AnalysisOutcome,
    pub report: String,
}

/// Analyze one materialized row batch.
///
/// Pure and synchronous: the only inputs are the rows, the rule set, and
/// the clock reading used for pending-wait figures. Calling it twice with
/// identical arguments yields identical results.
pub fn analyze_loads(rows: Vec<RawLoadRow>, rules: &RuleSet, now: DateTime<Utc>) -> LoadAnalysis {
    let timelines = collector::collect(rows);
    let usable: usize = timelines.iter().map(EntityTimeline::len).sum();

    if usable == 0 {
        let outcome = AnalysisOutcome::NoData(NoDataNotice {
            message: "no load activity found in the analysis window".to_string(),
        });
        let report = report::render(&outcome);
        crate::logging::log_analysis_operation("-", outcome.status(), 0, 0, None);
        return LoadAnalysis { outcome, report };
    }

    let primary = primary_timeline(&timelines);
    let basic = basic::compute(&primary.records, now);
    let frequency = interval::analyze(primary);
    let phase_breakdown = phases::analyze(&primary.records, rules);
    let insight_list = insights::synthesize(
        &basic,
        frequency.as_ref().map(|f| &f.classification),
        phase_breakdown.as_ref(),
        rules,
    );
    let tables = timelines.iter().map(TableSummary::from_timeline).collect();

    let completed = CompletedAnalysis {
        entity: primary.entity.clone(),
        basic,
        frequency,
        phases: phase_breakdown,
        insights: insight_list,
        tables,
    };
    crate::logging::log_analysis_operation(
        &completed.entity.to_string(),
        "completed",
        completed.basic.total_loads,
        completed.insights.len(),
        None,
    );

    let outcome = AnalysisOutcome::Completed(completed);
    let report = report::render(&outcome);
    LoadAnalysis { outcome, report }
}

/// Fetch one selector's rows and analyze them.
///
/// A transport failure becomes `status: error` carrying the upstream
/// message; it is never conflated with an empty result set and never
/// aborts the process.
pub async fn analyze_entity(
    fetcher: &dyn LoadFetcher,
    selector: &LoadSelector,
    window: &FetchWindow,
    rules: &RuleSet,
    clock: &dyn Clock,
) -> LoadAnalysis {
    match fetcher.fetch_loads(selector, window).await {
        Ok(rows) => analyze_loads(rows, rules, clock.now()),
        Err(err) => {
            crate::logging::log_fetch_operation(&selector.to_string(), "error", None);
            let outcome = AnalysisOutcome::Error(UpstreamFailure {
                message: err.to_string(),
            });
            let report = report::render(&outcome);
            LoadAnalysis { outcome, report }
        }
    }
}

/// The busiest timeline wins; ties resolve to the first in key order.
fn primary_timeline(timelines: &[EntityTimeline]) -> &EntityTimeline {
    let mut best = &timelines[0];
    for timeline in &timelines[1..] {
        if timeline.len() > best.len() {
            best = timeline;
        }
    }
    best
}
