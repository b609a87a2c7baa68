//! End-to-end scenarios over the analysis pipeline.
//!
//! These tests drive the public entry points only: raw rows in,
//! structured outcome and rendered report out.

mod common;

use async_trait::async_trait;
use common::{base_utc, spaced_rows, LoadRowBuilder};
use loadlens_core::analytics::{analyze_entity, analyze_loads, AnalysisOutcome};
use loadlens_core::clock::FixedClock;
use loadlens_core::config::RuleSet;
use loadlens_core::database::{FetchError, FetchWindow, LoadFetcher, LoadSelector};
use loadlens_core::models::RawLoadRow;
use loadlens_core::{FrequencyTier, InsightKind, RegularityTier};
use chrono::Duration;

fn rules() -> RuleSet {
    RuleSet::default()
}

fn now() -> chrono::DateTime<chrono::Utc> {
    base_utc() + Duration::hours(2)
}

#[test]
fn minute_cadence_classifies_as_frequent_and_very_regular() {
    // 10 records spaced exactly 60 seconds apart
    let analysis = analyze_loads(spaced_rows("orders", 10, 60), &rules(), now());

    let AnalysisOutcome::Completed(completed) = &analysis.outcome else {
        panic!("expected completed outcome, got {}", analysis.outcome.status());
    };
    let frequency = completed.frequency.as_ref().unwrap();
    assert_eq!(frequency.statistics.mean_seconds, 60.0);
    assert_eq!(frequency.statistics.coefficient_of_variation, Some(0.0));
    assert_eq!(frequency.classification.tier, FrequencyTier::Frequent);
    assert_eq!(
        frequency.classification.regularity,
        RegularityTier::VeryRegular
    );
}

#[test]
fn slow_write_outlier_is_counted_exactly_once() {
    // write durations [10,10,10,10,100]: mean 28, threshold 84
    let rows: Vec<RawLoadRow> = [10i64, 10, 10, 10, 100]
        .iter()
        .enumerate()
        .map(|(i, &write)| {
            LoadRowBuilder::new("orders")
                .created_at(i as i64 * 300)
                .with_phases(write, 5)
                .build()
        })
        .collect();

    let analysis = analyze_loads(rows, &rules(), now());
    let AnalysisOutcome::Completed(completed) = &analysis.outcome else {
        panic!("expected completed outcome");
    };
    let phases = completed.phases.as_ref().unwrap();
    assert_eq!(phases.write.mean_seconds, 28.0);
    assert_eq!(phases.write.slow_threshold_seconds, 84.0);
    assert_eq!(phases.write.slow_count, 1);
    assert!(completed
        .insights
        .iter()
        .any(|i| i.kind == InsightKind::PhaseSlowTasks));
}

#[test]
fn empty_batch_reports_no_data_explicitly() {
    let analysis = analyze_loads(vec![], &rules(), now());
    assert_eq!(analysis.outcome.status(), "no_data");
    assert!(analysis.report.contains("No load activity found."));

    let AnalysisOutcome::NoData(_) = &analysis.outcome else {
        panic!("expected no_data variant");
    };
}

#[test]
fn success_rate_boundary_is_exclusive_at_95() {
    // 95 finished + 5 cancelled: success rate exactly 95.0, concern
    // must not fire
    let mut rows = spaced_rows("orders", 95, 60);
    for i in 0..5 {
        rows.push(
            LoadRowBuilder::new("orders")
                .with_state("CANCELLED")
                .created_at(95 * 60 + i * 60)
                .build(),
        );
    }
    let analysis = analyze_loads(rows, &rules(), now());
    let AnalysisOutcome::Completed(completed) = &analysis.outcome else {
        panic!("expected completed outcome");
    };
    assert_eq!(completed.basic.success_rate, 95.0);
    assert!(!completed
        .insights
        .iter()
        .any(|i| i.kind == InsightKind::ReliabilityConcern));

    // one more cancellation pushes the rate below the floor
    let mut rows = spaced_rows("orders", 94, 60);
    for i in 0..6 {
        rows.push(
            LoadRowBuilder::new("orders")
                .with_state("CANCELLED")
                .created_at(94 * 60 + i * 60)
                .build(),
        );
    }
    let analysis = analyze_loads(rows, &rules(), now());
    let AnalysisOutcome::Completed(completed) = &analysis.outcome else {
        panic!("expected completed outcome");
    };
    assert!(completed
        .insights
        .iter()
        .any(|i| i.kind == InsightKind::ReliabilityConcern));
}

#[test]
fn missing_commit_stamp_excludes_record_from_phase_mean() {
    let intact = LoadRowBuilder::new("orders").created_at(0).with_phases(10, 5).build();
    let mut stripped = LoadRowBuilder::new("orders")
        .created_at(600)
        .with_phases(100, 5)
        .build();
    stripped.load_commit_time = None;

    let analysis = analyze_loads(vec![intact, stripped], &rules(), now());
    let AnalysisOutcome::Completed(completed) = &analysis.outcome else {
        panic!("expected completed outcome");
    };
    let phases = completed.phases.as_ref().unwrap();
    // with the stripped record included the mean would be 55
    assert_eq!(phases.sample_count, 1);
    assert_eq!(phases.write.mean_seconds, 10.0);
}

#[test]
fn pipeline_is_idempotent_for_a_pinned_clock() {
    let rows = spaced_rows("orders", 10, 60);
    let first = analyze_loads(rows.clone(), &rules(), now());
    let second = analyze_loads(rows, &rules(), now());

    assert_eq!(first, second);
    assert_eq!(first.report, second.report);
    assert_eq!(
        serde_json::to_string(&first.outcome).unwrap(),
        serde_json::to_string(&second.outcome).unwrap()
    );
}

#[test]
fn pending_waits_use_the_injected_clock() {
    let rows = vec![
        LoadRowBuilder::new("orders").created_at(0).with_phases(10, 5).build(),
        LoadRowBuilder::new("orders")
            .with_state("PENDING")
            .with_label("stuck_load")
            .created_at(60)
            .build(),
    ];
    // pin "now" to 10 minutes past the base instant
    let analysis = analyze_loads(rows, &rules(), base_utc() + Duration::minutes(10));
    let AnalysisOutcome::Completed(completed) = &analysis.outcome else {
        panic!("expected completed outcome");
    };
    let wait = completed.basic.pending_wait.as_ref().unwrap();
    assert_eq!(wait.count, 1);
    assert_eq!(wait.max_seconds, 540.0);
    assert_eq!(wait.longest_label.as_deref(), Some("stuck_load"));
}

/// Fetcher double that either returns canned rows or fails.
struct StubFetcher {
    result: Result<Vec<RawLoadRow>, String>,
}

#[async_trait]
impl LoadFetcher for StubFetcher {
    async fn fetch_loads(
        &self,
        _selector: &LoadSelector,
        _window: &FetchWindow,
    ) -> Result<Vec<RawLoadRow>, FetchError> {
        match &self.result {
            Ok(rows) => Ok(rows.clone()),
            Err(message) => Err(FetchError::Unavailable(message.clone())),
        }
    }
}

#[tokio::test]
async fn transport_failure_maps_to_error_status() {
    let fetcher = StubFetcher {
        result: Err("connection refused".to_string()),
    };
    let analysis = analyze_entity(
        &fetcher,
        &LoadSelector::table("sales", "orders"),
        &FetchWindow::default(),
        &rules(),
        &FixedClock(now()),
    )
    .await;

    assert_eq!(analysis.outcome.status(), "error");
    assert!(analysis.report.contains("connection refused"));
    let AnalysisOutcome::Error(failure) = &analysis.outcome else {
        panic!("expected error variant");
    };
    assert!(failure.message.contains("metadata store unavailable"));
}

#[tokio::test]
async fn empty_fetch_maps_to_no_data_not_error() {
    let fetcher = StubFetcher { result: Ok(vec![]) };
    let analysis = analyze_entity(
        &fetcher,
        &LoadSelector::table("sales", "orders"),
        &FetchWindow::default(),
        &rules(),
        &FixedClock(now()),
    )
    .await;

    assert_eq!(analysis.outcome.status(), "no_data");
}

#[tokio::test]
async fn fetched_rows_flow_through_the_full_pipeline() {
    let fetcher = StubFetcher {
        result: Ok(spaced_rows("orders", 10, 60)),
    };
    let analysis = analyze_entity(
        &fetcher,
        &LoadSelector::table("sales", "orders"),
        &FetchWindow::default(),
        &rules(),
        &FixedClock(now()),
    )
    .await;

    let AnalysisOutcome::Completed(completed) = &analysis.outcome else {
        panic!("expected completed outcome, got {}", analysis.outcome.status());
    };
    assert_eq!(completed.basic.total_loads, 10);
    assert!(analysis.report.contains("-- Frequency --"));
}
