//! # Load Analytics
//!
//! The analytical core: raw metadata rows flow one way through
//! collection, statistics, classification, and insight synthesis.
//!
//! ```text
//! raw rows → EntityTimeline[] → IntervalStatistics / PhaseBreakdown
//!          → FrequencyClassification → Insight[] → AnalysisOutcome
//! ```
//!
//! Every stage is a pure function over already-materialized data; no stage
//! mutates upstream state, and all derived values live for exactly one
//! analysis call.
//!
//! ## Modules
//!
//! - [`collector`] - normalizes raw rows into sorted per-table timelines
//! - [`interval`] - inter-arrival statistics and frequency/regularity
//!   classification
//! - [`phases`] - write/publish/total duration statistics and slow-outlier
//!   detection
//! - [`basic`] - state counts, success rate, byte volumes, pending waits
//! - [`insights`] - threshold rules producing ranked recommendations
//! - [`pipeline`] - the end-to-end entry points and result envelope

pub mod basic;
pub mod collector;
pub mod insights;
pub mod interval;
pub mod phases;
pub mod pipeline;

pub use basic::{BasicStatistics, WaitStatistics};
pub use collector::collect;
pub use insights::{synthesize, top_insights, Insight, InsightKind, InsightPriority};
pub use interval::{
    FrequencyAnalysis, FrequencyClassification, FrequencyLevel, FrequencyTier, IntervalStatistics,
    RegularityGrade, RegularityTier,
};
pub use phases::{LoadPhase, PhaseBreakdown, PhaseStatistics};
pub use pipeline::{
    analyze_entity, analyze_loads, AnalysisOutcome, CompletedAnalysis, LoadAnalysis, NoDataNotice,
    TableSummary, UpstreamFailure,
};
