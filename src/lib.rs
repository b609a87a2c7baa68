#![allow(clippy::doc_markdown)] // Allow technical terms like MySQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Loadlens Core
//!
//! Analytics core for diagnosing import and load behavior in distributed
//! analytical database clusters.
//!
//! ## Overview
//!
//! Loadlens answers operational questions about a cluster's load
//! pipeline - "why are loads slow", "is this table loaded too often" -
//! from the cluster's own load metadata. One analysis call reads a batch
//! of load rows, reconstructs the per-table timeline, computes
//! inter-arrival and phase-duration statistics, classifies the temporal
//! pattern, and produces both a structured result and a fixed-layout
//! text report.
//!
//! ## Architecture
//!
//! Data flows one way with no feedback loops:
//!
//! ```text
//! metadata rows -> collector -> interval / phase statistics
//!               -> classification -> insights -> report
//! ```
//!
//! All derived values are created fresh per call and discarded with it;
//! there is no cache and no shared mutable state across calls.
//!
//! ## Module Organization
//!
//! - [`models`] - raw and normalized load records, timelines
//! - [`analytics`] - the analysis pipeline: collector, statistics,
//!   classification, insights
//! - [`database`] - the row-fetch collaborator over the cluster's
//!   metadata tables
//! - [`report`] - plain-text rendering of analysis outcomes
//! - [`config`] - environment loading and the explicit rule-set value
//! - [`clock`] - injectable time source for pending-wait figures
//! - [`error`] - structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use loadlens_core::analytics::analyze_entity;
//! use loadlens_core::clock::SystemClock;
//! use loadlens_core::config::LoadlensConfig;
//! use loadlens_core::database::{FetchWindow, LoadSelector, SqlLoadFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LoadlensConfig::from_env()?;
//! let fetcher = SqlLoadFetcher::connect(&config.database_url).await?;
//!
//! let selector = LoadSelector::table("sales", "orders");
//! let window = FetchWindow::last_hours(chrono::Utc::now(), config.window_hours);
//! let analysis =
//!     analyze_entity(&fetcher, &selector, &window, &config.rules, &SystemClock).await;
//!
//! println!("{}", analysis.report);
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod clock;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod report;

pub use analytics::{
    analyze_entity, analyze_loads, AnalysisOutcome, BasicStatistics, CompletedAnalysis,
    FrequencyAnalysis, FrequencyClassification, FrequencyLevel, FrequencyTier, Insight,
    InsightKind, InsightPriority, IntervalStatistics, LoadAnalysis, LoadPhase, PhaseBreakdown,
    PhaseStatistics, RegularityGrade, RegularityTier, TableSummary, WaitStatistics,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{LoadlensConfig, RuleSet};
pub use database::{FetchError, FetchWindow, LoadFetcher, LoadSelector, SqlLoadFetcher};
pub use error::{LoadlensError, Result};
pub use models::{EntityTimeline, LoadRecord, LoadState, RawLoadRow, TableKey};
