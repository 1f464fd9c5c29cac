//! Circular fund routing detector.
//!
//! Money routed through a closed loop of accounts returns to its origin
//! with the trail split across hops. Every simple directed cycle of 3 to 5
//! accounts in the aggregated graph is reported as one ring; overlapping
//! cycles are deliberately all surfaced, since shared members reveal
//! structure worth investigating.

use crate::types::PatternHit;
use muletrace_core::config::AnalysisConfig;
use muletrace_core::detector::{DetectorMetadata, PatternDetector};
use muletrace_core::types::PatternKind;
use muletrace_graph::{enumerate_cycles, TransactionGraph};

/// Circular fund routing detector.
#[derive(Debug, Clone)]
pub struct CycleRouting {
    metadata: DetectorMetadata,
}

impl Default for CycleRouting {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleRouting {
    /// Create a new cycle routing detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("detect/cycle-routing")
                .with_description("Simple directed cycle enumeration (3-5 members)"),
        }
    }

    /// Enumerate cycle hits over the aggregated graph.
    ///
    /// Emitted in canonical order: each cycle starts at its smallest
    /// account id, cycles ordered by their rooting id. Cycles do not
    /// consult timestamps; the temporal factor is always 1.0.
    #[must_use]
    pub fn compute(graph: &TransactionGraph, config: &AnalysisConfig) -> Vec<PatternHit> {
        let (min_len, max_len) = config.cycle_len;
        enumerate_cycles(graph, min_len, max_len)
            .into_iter()
            .map(|members| PatternHit::new(PatternKind::Cycle, members))
            .collect()
    }
}

impl PatternDetector for CycleRouting {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}
