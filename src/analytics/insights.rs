//! # Insight Synthesizer
//!
//! Threshold rules that turn descriptive statistics into ranked,
//! human-readable findings with canned recommendations.
//!
//! ## Rule evaluation
//!
//! Rules are evaluated independently and in declaration order: phase
//! rules first, then frequency, then reliability. A call may emit zero,
//! one, or many insights; no rule short-circuits another, and the
//! synthesizer never re-sorts across priorities. Callers that cap the
//! list use [`top_insights`] for a stable, priority-biased truncation.
//!
//! Recommendation strings are static text keyed by rule, never computed.

use serde::{Deserialize, Serialize};

use crate::analytics::basic::BasicStatistics;
use crate::analytics::interval::{FrequencyClassification, FrequencyTier};
use crate::analytics::phases::PhaseBreakdown;
use crate::config::RuleSet;

/// Insight severity, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightPriority {
    High,
    Medium,
    Info,
}

impl InsightPriority {
    /// Ordinal rank for priority-biased truncation; lower sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Info => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for InsightPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of finding an insight reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    PhaseBottleneck,
    PhaseSlowTasks,
    BalancedPhases,
    ExtremeFrequency,
    PerfectReliability,
    ReliabilityConcern,
}

/// One finding with its canned remediation advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub priority: InsightPriority,
    pub message: String,
    pub recommendations: Vec<String>,
}

mod recommendations {
    pub const WRITE_BOTTLENECK: &[&str] = &[
        "Batch smaller loads together to amortize per-load write cost",
        "Check backend write queue depth and disk throughput on the busiest nodes",
        "Review tablet distribution for write skew toward a few backends",
    ];

    pub const PUBLISH_BOTTLENECK: &[&str] = &[
        "Check version publish backlog on the affected table",
        "Reduce load concurrency so version publishing can keep up",
        "Inspect compaction pressure; a publish stall often follows a compaction stall",
    ];

    pub const SLOW_TASKS: &[&str] = &[
        "Compare the slow loads' labels against cluster events at the same time",
        "Inspect backend logs around the slow loads for retry or timeout entries",
    ];

    pub const BALANCED: &[&str] =
        &["No phase dominates; tune load size or concurrency rather than a single phase"];

    pub const EXTREME_FREQUENCY: &[&str] = &[
        "Monitor memory and compaction on the affected backends; sub-second load cadence stresses both",
        "Batch upstream producers; per-row loads at this rate multiply version counts",
        "Alert on load queue depth for this table",
    ];

    pub const PERFECT_RELIABILITY: &[&str] =
        &["No action needed; keep the current load configuration"];

    pub const RELIABILITY_CONCERN: &[&str] = &[
        "Review failure messages of recent cancelled loads",
        "Check for schema or quality changes in the upstream data around the failures",
    ];

    pub fn owned(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| (*t).to_string()).collect()
    }
}

/// Apply the rule set to one table's statistics.
///
/// Deterministic: the same inputs always produce the same insight list in
/// the same order.
pub fn synthesize(
    basic: &BasicStatistics,
    frequency: Option<&FrequencyClassification>,
    phases: Option<&PhaseBreakdown>,
    rules: &RuleSet,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(breakdown) = phases {
        // rule 1: write phase dominates
        if breakdown.write.pct_of_total > rules.write_bottleneck_pct {
            insights.push(Insight {
                kind: InsightKind::PhaseBottleneck,
                priority: InsightPriority::High,
                message: format!(
                    "Write phase consumes {:.1}% of total load time (threshold {:.0}%)",
                    breakdown.write.pct_of_total, rules.write_bottleneck_pct
                ),
                recommendations: recommendations::owned(recommendations::WRITE_BOTTLENECK),
            });
        }

        // rule 2: publish phase dominates; evaluated even when rule 1 fired
        if breakdown.publish.pct_of_total > rules.publish_bottleneck_pct {
            insights.push(Insight {
                kind: InsightKind::PhaseBottleneck,
                priority: InsightPriority::High,
                message: format!(
                    "Publish phase consumes {:.1}% of total load time (threshold {:.0}%)",
                    breakdown.publish.pct_of_total, rules.publish_bottleneck_pct
                ),
                recommendations: recommendations::owned(recommendations::PUBLISH_BOTTLENECK),
            });
        }

        // rule 3: one insight per phase with slow outliers
        for stats in breakdown.phases_with_outliers() {
            insights.push(Insight {
                kind: InsightKind::PhaseSlowTasks,
                priority: InsightPriority::High,
                message: format!(
                    "{} slow load(s) in the {} phase exceeded {:.1}s ({}x the phase mean)",
                    stats.slow_count,
                    stats.phase,
                    stats.slow_threshold_seconds,
                    rules.slow_outlier_multiplier
                ),
                recommendations: recommendations::owned(recommendations::SLOW_TASKS),
            });
        }

        // rule 4: balanced distribution (mutually exclusive with rules 1-2
        // by range construction, but still evaluated on its own)
        let (write_lo, write_hi) = rules.balanced_write_range;
        let (publish_lo, publish_hi) = rules.balanced_publish_range;
        let write_balanced =
            breakdown.write.pct_of_total > write_lo && breakdown.write.pct_of_total < write_hi;
        let publish_balanced = breakdown.publish.pct_of_total > publish_lo
            && breakdown.publish.pct_of_total < publish_hi;
        if write_balanced && publish_balanced {
            insights.push(Insight {
                kind: InsightKind::BalancedPhases,
                priority: InsightPriority::Info,
                message: format!(
                    "Phase durations are balanced (write {:.1}%, publish {:.1}%)",
                    breakdown.write.pct_of_total, breakdown.publish.pct_of_total
                ),
                recommendations: recommendations::owned(recommendations::BALANCED),
            });
        }
    }

    // rule 5: extreme load cadence
    if let Some(classification) = frequency {
        if classification.tier == FrequencyTier::Extreme {
            insights.push(Insight {
                kind: InsightKind::ExtremeFrequency,
                priority: InsightPriority::High,
                message: format!(
                    "Loads arrive faster than one per second (regularity score {:.0}/100)",
                    classification.regularity_score
                ),
                recommendations: recommendations::owned(recommendations::EXTREME_FREQUENCY),
            });
        }
    }

    // rule 6: perfect reliability
    if basic.total_loads > 0 && basic.success_rate == 100.0 {
        insights.push(Insight {
            kind: InsightKind::PerfectReliability,
            priority: InsightPriority::Info,
            message: "All loads in the analysis window finished successfully".to_string(),
            recommendations: recommendations::owned(recommendations::PERFECT_RELIABILITY),
        });
    }

    // rule 7: reliability concern; the floor itself does not trigger
    if basic.total_loads > 0 && basic.success_rate < rules.reliability_floor_pct {
        insights.push(Insight {
            kind: InsightKind::ReliabilityConcern,
            priority: InsightPriority::Medium,
            message: format!(
                "Success rate is {:.1}% (below {:.0}%)",
                basic.success_rate, rules.reliability_floor_pct
            ),
            recommendations: recommendations::owned(recommendations::RELIABILITY_CONCERN),
        });
    }

    insights
}

/// Stable, priority-biased truncation to at most `n` insights.
///
/// Generation order is preserved within each priority; this helper is for
/// callers that cap the list, the synthesizer itself never re-sorts.
pub fn top_insights(insights: &[Insight], n: usize) -> Vec<Insight> {
    let mut ranked: Vec<&Insight> = insights.iter().collect();
    ranked.sort_by_key(|i| i.priority.rank());
    ranked.into_iter().take(n).cloned().collect()
}
