//! Analysis configuration.
//!
//! All detector thresholds are tunable; the defaults match the engine's
//! documented behavior. Configuration is validated once before an analysis
//! runs; the analysis itself never fails on well-formed input.

use crate::error::{ForensicsError, Result};
use serde::{Deserialize, Serialize};

/// Tunable parameters for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Distinct-counterparty threshold for fan-in / fan-out hubs.
    pub fan_threshold: usize,

    /// Temporal clustering window for the burstiness factor, in seconds.
    pub temporal_window_secs: u64,

    /// Inclusive range of `total_transactions` that marks an account as a
    /// low-activity shell candidate.
    pub shell_low_activity: (usize, usize),

    /// Inclusive range of simple-cycle lengths to enumerate.
    pub cycle_len: (usize, usize),

    /// Maximum hops explored by the shell-chain path search.
    pub path_hop_cutoff: usize,

    /// Minimum hops for a shell chain.
    pub path_min_hops: usize,

    /// Suspicion score at or above which an account is reported.
    pub suspicious_score_threshold: f64,

    /// Amount coefficient-of-variation below which a hub's flow looks
    /// regularized (false-positive filter).
    pub fp_amount_cv: f64,

    /// Inter-arrival coefficient-of-variation below which a hub's timing
    /// looks scheduled (false-positive filter).
    pub fp_delta_cv: f64,

    /// Minimum relevant-side transaction count before the false-positive
    /// filter may suppress a hub.
    pub fp_min_count: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fan_threshold: 10,
            temporal_window_secs: 72 * 3600,
            shell_low_activity: (2, 3),
            cycle_len: (3, 5),
            path_hop_cutoff: 6,
            path_min_hops: 3,
            suspicious_score_threshold: 50.0,
            fp_amount_cv: 0.1,
            fp_delta_cv: 0.2,
            fp_min_count: 20,
        }
    }
}

impl AnalysisConfig {
    /// Create a configuration with the default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fan-in / fan-out hub threshold.
    #[must_use]
    pub fn with_fan_threshold(mut self, threshold: usize) -> Self {
        self.fan_threshold = threshold;
        self
    }

    /// Set the temporal clustering window in seconds.
    #[must_use]
    pub fn with_temporal_window_secs(mut self, secs: u64) -> Self {
        self.temporal_window_secs = secs;
        self
    }

    /// Set the low-activity transaction-count range for shell accounts.
    #[must_use]
    pub fn with_shell_low_activity(mut self, min: usize, max: usize) -> Self {
        self.shell_low_activity = (min, max);
        self
    }

    /// Set the cycle length range.
    #[must_use]
    pub fn with_cycle_len(mut self, min: usize, max: usize) -> Self {
        self.cycle_len = (min, max);
        self
    }

    /// Set the shell-chain hop cutoff.
    #[must_use]
    pub fn with_path_hop_cutoff(mut self, cutoff: usize) -> Self {
        self.path_hop_cutoff = cutoff;
        self
    }

    /// Set the reporting threshold for suspicion scores.
    #[must_use]
    pub fn with_suspicious_score_threshold(mut self, threshold: f64) -> Self {
        self.suspicious_score_threshold = threshold;
        self
    }

    /// Check that ranges are well-formed and thresholds are usable.
    pub fn validate(&self) -> Result<()> {
        if self.fan_threshold == 0 {
            return Err(ForensicsError::config("fan_threshold must be at least 1"));
        }
        if self.shell_low_activity.0 > self.shell_low_activity.1 {
            return Err(ForensicsError::config(format!(
                "shell_low_activity range is inverted: {}..={}",
                self.shell_low_activity.0, self.shell_low_activity.1
            )));
        }
        if self.cycle_len.0 < 3 {
            return Err(ForensicsError::config(
                "cycle_len minimum must be at least 3 (mutual pairs are excluded)",
            ));
        }
        if self.cycle_len.0 > self.cycle_len.1 {
            return Err(ForensicsError::config(format!(
                "cycle_len range is inverted: {}..={}",
                self.cycle_len.0, self.cycle_len.1
            )));
        }
        if self.path_min_hops > self.path_hop_cutoff {
            return Err(ForensicsError::config(format!(
                "path_min_hops {} exceeds path_hop_cutoff {}",
                self.path_min_hops, self.path_hop_cutoff
            )));
        }
        if !self.suspicious_score_threshold.is_finite() {
            return Err(ForensicsError::config(
                "suspicious_score_threshold must be finite",
            ));
        }
        Ok(())
    }
}
