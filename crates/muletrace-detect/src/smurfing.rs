//! Smurfing (fan-in / fan-out) detector.
//!
//! An account that concentrates transfers from many distinct senders, or
//! disperses to many distinct receivers, is a structuring hub candidate.
//! Timestamp clustering sharpens the signal: coordinated muling tends to
//! move funds within a tight window, so the densest 72-hour cluster scales
//! the hub's score by up to 1.5x. Regularized flows (payroll, settlement)
//! are removed by the false-positive filter before a hit is emitted.

use crate::filter::FalsePositiveFilter;
use crate::types::PatternHit;
use muletrace_core::config::AnalysisConfig;
use muletrace_core::detector::{DetectorMetadata, PatternDetector};
use muletrace_core::types::PatternKind;
use muletrace_graph::{NodeId, TransactionGraph};

/// Which side of a hub's edges a pass examines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Incoming,
    Outgoing,
}

/// Fan-in / fan-out hub detector.
#[derive(Debug, Clone)]
pub struct SmurfingDetector {
    metadata: DetectorMetadata,
}

impl Default for SmurfingDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SmurfingDetector {
    /// Create a new smurfing detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("detect/smurfing")
                .with_description("Fan-in/fan-out concentration with temporal burstiness"),
        }
    }

    /// Detect fan-in and fan-out hubs.
    ///
    /// Returns the two hit lists separately so the assembler can keep the
    /// fixed class order (all fan-ins before all fan-outs). A node may
    /// appear in both. Self-loop edges never contribute: not to the
    /// counterparty count, not to the timestamp pool.
    #[must_use]
    pub fn compute(
        graph: &TransactionGraph,
        config: &AnalysisConfig,
    ) -> (Vec<PatternHit>, Vec<PatternHit>) {
        let mut fan_in = Vec::new();
        let mut fan_out = Vec::new();

        for node in 0..graph.node_count() as NodeId {
            if let Some(hit) = Self::hub_hit(graph, config, node, Side::Incoming) {
                fan_in.push(hit);
            }
            if let Some(hit) = Self::hub_hit(graph, config, node, Side::Outgoing) {
                fan_out.push(hit);
            }
        }

        tracing::debug!(
            fan_in = fan_in.len(),
            fan_out = fan_out.len(),
            "smurfing detection complete"
        );
        (fan_in, fan_out)
    }

    /// Evaluate one node on one side. Returns a hit if the node clears the
    /// distinctness threshold and survives the false-positive filter.
    fn hub_hit(
        graph: &TransactionGraph,
        config: &AnalysisConfig,
        hub: NodeId,
        side: Side,
    ) -> Option<PatternHit> {
        let mut counterparties: Vec<NodeId> = Vec::new();
        let mut amounts: Vec<f64> = Vec::new();
        let mut timestamps: Vec<u64> = Vec::new();

        let edges: Vec<&muletrace_graph::AggregatedEdge> = match side {
            Side::Incoming => graph.in_edges(hub).collect(),
            Side::Outgoing => graph.out_edges(hub).collect(),
        };
        for edge in edges {
            if edge.is_self_loop() {
                continue;
            }
            counterparties.push(match side {
                Side::Incoming => edge.src,
                Side::Outgoing => edge.dst,
            });
            amounts.extend_from_slice(&edge.amounts);
            timestamps.extend_from_slice(&edge.timestamps);
        }

        if counterparties.len() < config.fan_threshold {
            return None;
        }

        if FalsePositiveFilter::is_legitimate(&amounts, &timestamps, config) {
            tracing::debug!(
                hub = graph.account_id(hub),
                side = ?side,
                count = amounts.len(),
                "hub suppressed as regularized flow"
            );
            return None;
        }

        timestamps.sort_unstable();
        let fraction = clustering_fraction(&timestamps, config.temporal_window_secs);
        let temporal_factor = (1.0 + 0.5 * fraction).clamp(1.0, 1.5);

        // Hub first, then counterparties; edge iteration is already
        // id-ascending.
        let mut members = Vec::with_capacity(counterparties.len() + 1);
        members.push(hub);
        members.extend(counterparties);

        Some(PatternHit {
            kind: match side {
                Side::Incoming => PatternKind::FanIn,
                Side::Outgoing => PatternKind::FanOut,
            },
            members,
            temporal_factor,
        })
    }
}

impl PatternDetector for SmurfingDetector {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}

/// Fraction of timestamps inside the densest window.
///
/// Two-pointer sweep over the sorted sequence: for each left index the
/// right pointer advances while the span stays within the window; the
/// largest cluster size over the total count is the density. All-equal
/// timestamps give 1.0 (maximum clustering).
#[must_use]
pub fn clustering_fraction(sorted_timestamps: &[u64], window_secs: u64) -> f64 {
    if sorted_timestamps.is_empty() {
        return 0.0;
    }
    let mut best = 1usize;
    let mut right = 0usize;
    for left in 0..sorted_timestamps.len() {
        if right < left {
            right = left;
        }
        while right + 1 < sorted_timestamps.len()
            && sorted_timestamps[right + 1] - sorted_timestamps[left] <= window_secs
        {
            right += 1;
        }
        best = best.max(right - left + 1);
    }
    best as f64 / sorted_timestamps.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use muletrace_core::types::Transaction;

    const HOUR: u64 = 3600;
    const BASE: u64 = 1_700_000_000;

    fn fan_in_batch(hub: &str, senders: usize, spread_hours: u64) -> Vec<Transaction> {
        (0..senders)
            .map(|i| {
                Transaction::new(
                    format!("TX_{i}"),
                    format!("SND_{i:02}"),
                    hub,
                    1_000.0 + 137.0 * i as f64,
                    BASE + (i as u64 * spread_hours * HOUR) / senders as u64,
                )
            })
            .collect()
    }

    #[test]
    fn test_metadata() {
        let detector = SmurfingDetector::new();
        assert_eq!(detector.id(), "detect/smurfing");
    }

    #[test]
    fn test_fan_in_hub_detected() {
        let graph = TransactionGraph::build(&fan_in_batch("HUB", 12, 10));
        let (fan_in, fan_out) = SmurfingDetector::compute(&graph, &AnalysisConfig::default());

        assert_eq!(fan_in.len(), 1);
        assert!(fan_out.is_empty());

        let hit = &fan_in[0];
        assert_eq!(hit.kind, PatternKind::FanIn);
        assert_eq!(graph.account_id(hit.members[0]), "HUB");
        assert_eq!(hit.members.len(), 13);
        // Only the hub scores.
        assert_eq!(hit.scoring_members(), &hit.members[..1]);
        // Counterparties sorted by id.
        let ids: Vec<&str> = hit.members[1..]
            .iter()
            .map(|&n| graph.account_id(n))
            .collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_below_threshold_not_detected() {
        let graph = TransactionGraph::build(&fan_in_batch("HUB", 9, 10));
        let (fan_in, _) = SmurfingDetector::compute(&graph, &AnalysisConfig::default());
        assert!(fan_in.is_empty());
    }

    #[test]
    fn test_bursty_window_maximizes_factor() {
        // Everything inside 10 hours: the densest 72h window holds all.
        let graph = TransactionGraph::build(&fan_in_batch("HUB", 12, 10));
        let (fan_in, _) = SmurfingDetector::compute(&graph, &AnalysisConfig::default());
        assert!((fan_in[0].temporal_factor - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_spread_timestamps_lower_factor() {
        // One transaction per week: no 72h window holds more than one.
        let txs: Vec<Transaction> = (0..12)
            .map(|i| {
                Transaction::new(
                    format!("TX_{i}"),
                    format!("SND_{i:02}"),
                    "HUB",
                    500.0 + 31.0 * i as f64,
                    BASE + i as u64 * 7 * 24 * HOUR,
                )
            })
            .collect();
        let graph = TransactionGraph::build(&txs);
        let (fan_in, _) = SmurfingDetector::compute(&graph, &AnalysisConfig::default());

        let expected = 1.0 + 0.5 / 12.0;
        assert!((fan_in[0].temporal_factor - expected).abs() < 1e-12);
    }

    #[test]
    fn test_fan_out_hub_detected() {
        let txs: Vec<Transaction> = (0..11)
            .map(|i| {
                Transaction::new(
                    format!("TX_{i}"),
                    "DISPERSER",
                    format!("RCV_{i:02}"),
                    3_000.0 + 250.0 * i as f64,
                    BASE + i as u64 * HOUR,
                )
            })
            .collect();
        let graph = TransactionGraph::build(&txs);
        let (fan_in, fan_out) = SmurfingDetector::compute(&graph, &AnalysisConfig::default());

        assert!(fan_in.is_empty());
        assert_eq!(fan_out.len(), 1);
        assert_eq!(fan_out[0].kind, PatternKind::FanOut);
        assert_eq!(graph.account_id(fan_out[0].members[0]), "DISPERSER");
    }

    #[test]
    fn test_node_can_be_both_hubs() {
        let mut txs = fan_in_batch("HUB", 10, 10);
        for i in 0..10 {
            txs.push(Transaction::new(
                format!("TX_OUT_{i}"),
                "HUB",
                format!("RCV_{i:02}"),
                900.0 + 77.0 * i as f64,
                BASE + 100 * HOUR + i as u64 * HOUR,
            ));
        }
        let graph = TransactionGraph::build(&txs);
        let (fan_in, fan_out) = SmurfingDetector::compute(&graph, &AnalysisConfig::default());

        assert_eq!(fan_in.len(), 1);
        assert_eq!(fan_out.len(), 1);
        assert_eq!(graph.account_id(fan_in[0].members[0]), "HUB");
        assert_eq!(graph.account_id(fan_out[0].members[0]), "HUB");
    }

    #[test]
    fn test_self_loop_does_not_feed_hub() {
        // 9 real senders plus a self-transfer: still below the threshold.
        let mut txs = fan_in_batch("HUB", 9, 10);
        txs.push(Transaction::new("TX_SELF", "HUB", "HUB", 10.0, BASE));
        let graph = TransactionGraph::build(&txs);
        let (fan_in, _) = SmurfingDetector::compute(&graph, &AnalysisConfig::default());
        assert!(fan_in.is_empty());
    }

    #[test]
    fn test_regularized_hub_suppressed() {
        // 25 receivers, 300 scheduled payments of a constant amount.
        let txs: Vec<Transaction> = (0..300u64)
            .map(|k| {
                Transaction::new(
                    format!("TX_{k}"),
                    "PAYROLL",
                    format!("EMP_{:02}", k % 25),
                    2_500.0,
                    BASE + k * 86_400,
                )
            })
            .collect();
        let graph = TransactionGraph::build(&txs);
        let (_, fan_out) = SmurfingDetector::compute(&graph, &AnalysisConfig::default());
        assert!(fan_out.is_empty());
    }

    #[test]
    fn test_clustering_fraction() {
        assert_eq!(clustering_fraction(&[], 100), 0.0);
        assert_eq!(clustering_fraction(&[5], 100), 1.0);
        // All equal: degenerate timestamps cluster fully.
        assert_eq!(clustering_fraction(&[7, 7, 7, 7], 100), 1.0);
        // Two tight pairs far apart.
        let ts = [0, 10, 1_000_000, 1_000_020];
        assert_eq!(clustering_fraction(&ts, 100), 0.5);
        // Window spans everything.
        assert_eq!(clustering_fraction(&ts, 2_000_000), 1.0);
    }
}
