//! # Report Formatter
//!
//! Fixed-layout plain-text rendering of an analysis outcome. Purely
//! presentational: one renderer per outcome variant, dispatched on the
//! status tag, with no business logic of its own.
//!
//! Sections with nothing to show (no phase statistics, no insights) are
//! omitted rather than rendered empty; a no-data outcome renders an
//! explicit indicator instead of a blank report.

pub mod format;

use crate::analytics::insights::Insight;
use crate::analytics::pipeline::{
    AnalysisOutcome, CompletedAnalysis, NoDataNotice, UpstreamFailure,
};
use crate::constants::system::REPORT_INSIGHT_LIMIT;

pub use format::{format_bytes, format_duration, format_percent, parse_bytes};

/// Render any outcome into the fixed text layout.
pub fn render(outcome: &AnalysisOutcome) -> String {
    match outcome {
        AnalysisOutcome::Completed(completed) => render_completed(completed),
        AnalysisOutcome::NoData(notice) => render_no_data(notice),
        AnalysisOutcome::Error(failure) => render_error(failure),
    }
}

fn render_no_data(notice: &NoDataNotice) -> String {
    let mut out = String::new();
    out.push_str("=== Load Analysis ===\n\n");
    out.push_str("No load activity found.\n");
    out.push_str(&format!("Detail: {}\n", notice.message));
    out
}

fn render_error(failure: &UpstreamFailure) -> String {
    let mut out = String::new();
    out.push_str("=== Load Analysis ===\n\n");
    out.push_str(&format!("Analysis failed: {}\n", failure.message));
    out
}

fn render_completed(completed: &CompletedAnalysis) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Load Analysis: {} ===\n", completed.entity));

    render_overview(&mut out, completed);
    render_frequency(&mut out, completed);
    render_phases(&mut out, completed);
    render_insights(&mut out, &completed.insights);
    render_tables(&mut out, completed);

    out
}

fn render_overview(out: &mut String, completed: &CompletedAnalysis) {
    let basic = &completed.basic;
    out.push_str("\n-- Overview --\n");
    out.push_str(&format!("Loads analyzed:  {}\n", basic.total_loads));
    out.push_str(&format!(
        "Outcomes:        {} finished, {} cancelled, {} active\n",
        basic.finished_loads,
        basic.cancelled_loads,
        basic.loading_loads + basic.pending_loads
    ));
    out.push_str(&format!(
        "Success rate:    {}\n",
        format_percent(basic.success_rate)
    ));
    out.push_str(&format!(
        "Data volume:     {} total, {} per load\n",
        format_bytes(basic.total_bytes),
        format_bytes(basic.mean_bytes as i64)
    ));
    if let (Some(first), Some(last)) = (basic.first_load_at, basic.last_load_at) {
        out.push_str(&format!(
            "Window:          {} .. {}\n",
            first.format("%Y-%m-%d %H:%M:%S"),
            last.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    if let Some(wait) = &basic.pending_wait {
        let longest = wait.longest_label.as_deref().unwrap_or("unlabeled");
        out.push_str(&format!(
            "Pending waits:   {} active, mean {}, longest {} ({})\n",
            wait.count,
            format_duration(wait.mean_seconds),
            format_duration(wait.max_seconds),
            longest
        ));
    }
}

fn render_frequency(out: &mut String, completed: &CompletedAnalysis) {
    let Some(frequency) = &completed.frequency else {
        return;
    };
    let stats = &frequency.statistics;
    let class = &frequency.classification;

    out.push_str("\n-- Frequency --\n");
    out.push_str(&format!(
        "Mean interval:   {} ({})\n",
        format_duration(stats.mean_seconds),
        class.tier.describe()
    ));
    out.push_str(&format!(
        "Classification:  tier {} / level {}\n",
        class.tier, class.level
    ));
    out.push_str(&format!(
        "Regularity:      {} (score {:.0}/100, grade {})\n",
        class.regularity, class.regularity_score, class.regularity_grade
    ));
    out.push_str(&format!(
        "Interval spread: min {} / max {} / stddev {}\n",
        format_duration(stats.min_seconds),
        format_duration(stats.max_seconds),
        format_duration(stats.stddev_seconds)
    ));
}

fn render_phases(out: &mut String, completed: &CompletedAnalysis) {
    let Some(breakdown) = &completed.phases else {
        return;
    };

    out.push_str("\n-- Phase Durations --\n");
    out.push_str(&format!(
        "{:<8} {:>10} {:>10} {:>10} {:>10} {:>8} {:>6}\n",
        "phase", "mean", "min", "max", "stddev", "share", "slow"
    ));
    for stats in [&breakdown.write, &breakdown.publish, &breakdown.total] {
        out.push_str(&format!(
            "{:<8} {:>10} {:>10} {:>10} {:>10} {:>8} {:>6}\n",
            stats.phase.as_str(),
            format_duration(stats.mean_seconds),
            format_duration(stats.min_seconds),
            format_duration(stats.max_seconds),
            format_duration(stats.stddev_seconds),
            format_percent(stats.pct_of_total),
            stats.slow_count
        ));
    }
    out.push_str(&format!(
        "Sample: {} finished load(s) with complete phase stamps\n",
        breakdown.sample_count
    ));
}

fn render_insights(out: &mut String, insights: &[Insight]) {
    if insights.is_empty() {
        return;
    }

    out.push_str("\n-- Insights --\n");
    for insight in insights.iter().take(REPORT_INSIGHT_LIMIT) {
        out.push_str(&format!("[{}] {}\n", insight.priority, insight.message));
        for recommendation in &insight.recommendations {
            out.push_str(&format!("    -> {recommendation}\n"));
        }
    }
    if insights.len() > REPORT_INSIGHT_LIMIT {
        out.push_str(&format!(
            "({} further insight(s) omitted)\n",
            insights.len() - REPORT_INSIGHT_LIMIT
        ));
    }
}

fn render_tables(out: &mut String, completed: &CompletedAnalysis) {
    if completed.tables.len() < 2 {
        return;
    }

    out.push_str("\n-- Tables in Batch --\n");
    for summary in &completed.tables {
        let tier = summary
            .tier
            .map(|t| t.as_str())
            .unwrap_or(crate::constants::system::UNKNOWN);
        out.push_str(&format!(
            "{}: {} load(s), tier {}\n",
            summary.entity, summary.load_count, tier
        ));
    }
}
