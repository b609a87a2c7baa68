//! # Configuration
//!
//! Environment-derived settings plus the explicit, immutable [`RuleSet`]
//! that every analyzer call receives as a parameter. Rule thresholds are
//! never read from ambient process state inside the analyzers; tests can
//! pass alternate rule sets without touching environment variables.

use crate::error::{LoadlensError, Result};

/// Threshold values driving insight synthesis and outlier detection.
///
/// Immutable for the duration of an analysis call. [`RuleSet::default`]
/// matches the calibrated production thresholds; [`RuleSet::from_env`]
/// applies `LOADLENS_*` overrides on top of the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    /// Write phase share of total duration (percent) above which the write
    /// phase is reported as a bottleneck
    pub write_bottleneck_pct: f64,
    /// Publish phase share of total duration (percent) above which the
    /// publish phase is reported as a bottleneck
    pub publish_bottleneck_pct: f64,
    /// Exclusive write-share range treated as balanced
    pub balanced_write_range: (f64, f64),
    /// Exclusive publish-share range treated as balanced
    pub balanced_publish_range: (f64, f64),
    /// A phase duration above `multiplier * phase_mean` counts as a slow
    /// outlier
    pub slow_outlier_multiplier: f64,
    /// Success rate (percent) strictly below this value raises a
    /// reliability concern
    pub reliability_floor_pct: f64,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            write_bottleneck_pct: 70.0,
            publish_bottleneck_pct: 50.0,
            balanced_write_range: (30.0, 70.0),
            balanced_publish_range: (20.0, 50.0),
            slow_outlier_multiplier: 3.0,
            reliability_floor_pct: 95.0,
        }
    }
}

impl RuleSet {
    pub fn from_env() -> Result<Self> {
        let mut rules = Self::default();

        if let Ok(raw) = std::env::var("LOADLENS_SLOW_OUTLIER_MULTIPLIER") {
            rules.slow_outlier_multiplier = raw.parse().map_err(|e| {
                LoadlensError::ConfigurationError(format!("Invalid slow_outlier_multiplier: {e}"))
            })?;
        }

        if let Ok(raw) = std::env::var("LOADLENS_RELIABILITY_FLOOR_PCT") {
            rules.reliability_floor_pct = raw.parse().map_err(|e| {
                LoadlensError::ConfigurationError(format!("Invalid reliability_floor_pct: {e}"))
            })?;
        }

        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<()> {
        if self.slow_outlier_multiplier <= 1.0 {
            return Err(LoadlensError::ConfigurationError(format!(
                "slow_outlier_multiplier must exceed 1.0, got {}",
                self.slow_outlier_multiplier
            )));
        }
        if !(0.0..=100.0).contains(&self.reliability_floor_pct) {
            return Err(LoadlensError::ConfigurationError(format!(
                "reliability_floor_pct must be within 0..=100, got {}",
                self.reliability_floor_pct
            )));
        }
        let (write_lo, write_hi) = self.balanced_write_range;
        let (publish_lo, publish_hi) = self.balanced_publish_range;
        if write_lo >= write_hi || publish_lo >= publish_hi {
            return Err(LoadlensError::ConfigurationError(
                "balanced ranges must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration for callers that own the metadata connection.
#[derive(Debug, Clone)]
pub struct LoadlensConfig {
    pub database_url: String,
    pub window_hours: i64,
    pub fetch_limit: i64,
    pub rules: RuleSet,
}

impl Default for LoadlensConfig {
    fn default() -> Self {
        Self {
            database_url: "mysql://root@localhost:9030/information_schema".to_string(),
            window_hours: crate::constants::system::DEFAULT_WINDOW_HOURS,
            fetch_limit: crate::constants::system::DEFAULT_FETCH_LIMIT,
            rules: RuleSet::default(),
        }
    }
}

impl LoadlensConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(db_url) = std::env::var("DATABASE_URL") {
            config.database_url = db_url;
        }

        if let Ok(raw) = std::env::var("LOADLENS_WINDOW_HOURS") {
            config.window_hours = raw.parse().map_err(|e| {
                LoadlensError::ConfigurationError(format!("Invalid window_hours: {e}"))
            })?;
        }

        if let Ok(raw) = std::env::var("LOADLENS_FETCH_LIMIT") {
            config.fetch_limit = raw.parse().map_err(|e| {
                LoadlensError::ConfigurationError(format!("Invalid fetch_limit: {e}"))
            })?;
        }

        config.rules = RuleSet::from_env()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_set_is_valid() {
        assert!(RuleSet::default().validate().is_ok());
    }

    #[test]
    fn test_rule_set_rejects_low_multiplier() {
        let rules = RuleSet {
            slow_outlier_multiplier: 0.5,
            ..RuleSet::default()
        };
        assert!(matches!(
            rules.validate(),
            Err(LoadlensError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_rule_set_rejects_out_of_range_floor() {
        let rules = RuleSet {
            reliability_floor_pct: 120.0,
            ..RuleSet::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_rule_set_rejects_empty_balanced_range() {
        let rules = RuleSet {
            balanced_write_range: (70.0, 30.0),
            ..RuleSet::default()
        };
        assert!(rules.validate().is_err());
    }
}
