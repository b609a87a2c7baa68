//! Clock abstraction for "now"-dependent computations.
//!
//! Pending-wait statistics measure still-active loads against the current
//! time. The analyzers take the reading as an explicit parameter; callers
//! that drive the async pipeline supply a [`Clock`] so tests can pin the
//! reading to a fixed instant.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant. Intended for tests and replay analysis
/// over historical batches.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
