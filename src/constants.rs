//! # System Constants
//!
//! Core constants and state groupings that define the operational
//! boundaries of the load diagnostics core.

use crate::models::load_record::LoadState;

/// System-wide constants
pub mod system {
    /// Unknown value placeholder
    pub const UNKNOWN: &str = "unknown";

    /// Version compatibility marker
    pub const LOADLENS_CORE_VERSION: &str = "0.1.0";

    /// Default lookback window for metadata queries, in hours
    pub const DEFAULT_WINDOW_HOURS: i64 = 168;

    /// Default row cap for a single metadata fetch
    pub const DEFAULT_FETCH_LIMIT: i64 = 10_000;

    /// Number of insights rendered into the text report
    pub const REPORT_INSIGHT_LIMIT: usize = 3;
}

/// Status groupings for validation and logic
pub mod state_groups {
    use super::LoadState;

    /// Load states that indicate the job reached a final outcome
    pub const TERMINAL_LOAD_STATES: &[LoadState] = &[LoadState::Finished, LoadState::Cancelled];

    /// Load states that indicate the job is still being processed
    pub const ACTIVE_LOAD_STATES: &[LoadState] = &[LoadState::Pending, LoadState::Loading];

    /// Load states that count toward the success rate numerator
    pub const SUCCESS_LOAD_STATES: &[LoadState] = &[LoadState::Finished];
}
