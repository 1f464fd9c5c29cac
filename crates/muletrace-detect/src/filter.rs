//! False-positive filter for smurfing candidates.
//!
//! Payroll, merchant settlement, and scheduled disbursement flows
//! concentrate fan-in or fan-out just like smurfing does, but they are
//! near-constant in amount and near-uniform in timing. Genuine smurfing
//! carries the amount and timing variance of ad-hoc human coordination.
//! A hub whose relevant-side flow is regularized on both axes, with enough
//! volume to trust the statistics, is dropped before scoring.

use muletrace_core::config::AnalysisConfig;
use muletrace_core::stats;

/// Regularity test applied to fan-in / fan-out hubs before scoring.
#[derive(Debug, Clone, Copy)]
pub struct FalsePositiveFilter;

impl FalsePositiveFilter {
    /// Returns true if the hub's relevant-side flow looks legitimate:
    /// amount CV below `fp_amount_cv`, inter-arrival CV below
    /// `fp_delta_cv`, and at least `fp_min_count` transactions.
    #[must_use]
    pub fn is_legitimate(amounts: &[f64], timestamps: &[u64], config: &AnalysisConfig) -> bool {
        if amounts.len() < config.fp_min_count {
            return false;
        }

        let amount_cv = stats::coefficient_of_variation(amounts);
        if amount_cv >= config.fp_amount_cv {
            return false;
        }

        let mut sorted = timestamps.to_vec();
        sorted.sort_unstable();
        let deltas = stats::inter_arrival_deltas(&sorted);
        let delta_cv = stats::coefficient_of_variation(&deltas);

        delta_cv < config.fp_delta_cv
    }
}
