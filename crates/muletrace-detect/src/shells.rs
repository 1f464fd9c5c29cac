//! Layered shell chain detector.
//!
//! Layering passes funds through freshly opened pass-through accounts that
//! barely transact otherwise. A shell chain is a simple path of 3 to 6
//! hops whose interior accounts are all low-activity (2-3 total
//! transactions by default); the endpoints carry no activity constraint.
//! Only maximal chains are reported: a chain that is a contiguous segment
//! of a longer detected chain adds no information and would double-score
//! its interiors.

use crate::types::PatternHit;
use muletrace_core::config::AnalysisConfig;
use muletrace_core::detector::{DetectorMetadata, PatternDetector};
use muletrace_core::types::PatternKind;
use muletrace_graph::{enumerate_chains, NodeId, TransactionGraph};

/// Layered shell network detector.
#[derive(Debug, Clone)]
pub struct ShellChainDetector {
    metadata: DetectorMetadata,
}

impl Default for ShellChainDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellChainDetector {
    /// Create a new shell chain detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("detect/shell-chains")
                .with_description("Bounded paths through low-activity intermediaries"),
        }
    }

    /// Enumerate maximal shell chains.
    ///
    /// Emission order is (source, target) ascending by account id, with
    /// depth-first order inside a pair. Interior nodes are the scoring
    /// members; the temporal factor is always 1.0.
    #[must_use]
    pub fn compute(graph: &TransactionGraph, config: &AnalysisConfig) -> Vec<PatternHit> {
        let (low_min, low_max) = config.shell_low_activity;
        let chains = enumerate_chains(
            graph,
            config.path_min_hops,
            config.path_hop_cutoff,
            |node: NodeId| {
                let total = graph.node(node).total_transactions;
                total >= low_min && total <= low_max
            },
        );
        let maximal = retain_maximal(chains);

        tracing::debug!(chains = maximal.len(), "shell chain detection complete");
        maximal
            .into_iter()
            .map(|members| PatternHit::new(PatternKind::Shell, members))
            .collect()
    }
}

impl PatternDetector for ShellChainDetector {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}

/// Drop every chain that is a contiguous segment of a longer chain,
/// preserving the emission order of the survivors.
fn retain_maximal(chains: Vec<Vec<NodeId>>) -> Vec<Vec<NodeId>> {
    chains
        .iter()
        .filter(|chain| {
            !chains
                .iter()
                .any(|other| other.len() > chain.len() && contains_segment(other, chain))
        })
        .cloned()
        .collect()
}

fn contains_segment(longer: &[NodeId], segment: &[NodeId]) -> bool {
    longer.windows(segment.len()).any(|w| w == segment)
}
