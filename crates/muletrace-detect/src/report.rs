//! Report builder.
//!
//! Projects the assembly output into the contractual report shape. Every
//! ordering here is pinned: suspicious accounts sort by score descending
//! then id ascending, rings keep assignment order, and the graph
//! projection follows handle (== lexicographic id) order.

use crate::scoring::{Assembly, RingAssembler};
use crate::types::{
    AnalysisReport, AnalysisSummary, FraudRing, GraphData, GraphEdge, GraphNode,
    SuspiciousAccount,
};
use muletrace_core::config::AnalysisConfig;
use muletrace_graph::{NodeId, TransactionGraph};

/// Builds the final `AnalysisReport`.
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder;

impl ReportBuilder {
    /// Assemble the report from the scored graph.
    #[must_use]
    pub fn build(
        graph: &TransactionGraph,
        assembly: &Assembly,
        elapsed_secs: f64,
        config: &AnalysisConfig,
    ) -> AnalysisReport {
        let threshold = config.suspicious_score_threshold;

        let mut suspicious_accounts: Vec<SuspiciousAccount> = (0..graph.node_count() as NodeId)
            .filter(|&n| assembly.accounts[n as usize].is_suspicious(threshold))
            .map(|n| {
                let state = &assembly.accounts[n as usize];
                SuspiciousAccount {
                    account_id: graph.account_id(n).to_string(),
                    suspicion_score: round2(state.score),
                    patterns: state.kinds.iter().map(|k| k.label().to_string()).collect(),
                    ring_ids: state.ring_ids.clone(),
                }
            })
            .collect();
        // Stable sort: entries start in id order, so ties keep id order.
        suspicious_accounts.sort_by(|a, b| {
            b.suspicion_score
                .partial_cmp(&a.suspicion_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let fraud_rings: Vec<FraudRing> = assembly
            .rings
            .iter()
            .map(|ring| FraudRing {
                ring_id: ring.ring_id.clone(),
                pattern_type: ring.kind.label().to_string(),
                member_accounts: ring
                    .members
                    .iter()
                    .map(|&m| graph.account_id(m).to_string())
                    .collect(),
                risk_score: RingAssembler::ring_risk(ring, &assembly.accounts),
            })
            .collect();

        let summary = AnalysisSummary {
            total_accounts_analyzed: graph.node_count(),
            suspicious_accounts_flagged: suspicious_accounts.len(),
            fraud_rings_detected: fraud_rings.len(),
            processing_time_seconds: round2(elapsed_secs),
        };

        let graph_data = Self::project_graph(graph, assembly, threshold);

        AnalysisReport {
            suspicious_accounts,
            fraud_rings,
            summary,
            graph_data,
        }
    }

    /// Visualization projection: every node and aggregated edge, annotated
    /// with the suspicion flags.
    fn project_graph(graph: &TransactionGraph, assembly: &Assembly, threshold: f64) -> GraphData {
        let nodes = (0..graph.node_count() as NodeId)
            .map(|n| {
                let attrs = graph.node(n);
                let state = &assembly.accounts[n as usize];
                GraphNode {
                    id: graph.account_id(n).to_string(),
                    in_degree: attrs.in_degree,
                    out_degree: attrs.out_degree,
                    total_transactions: attrs.total_transactions,
                    suspicious: state.is_suspicious(threshold),
                    patterns: state.kinds.iter().map(|k| k.label().to_string()).collect(),
                    ring_ids: state.ring_ids.clone(),
                }
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| GraphEdge {
                source: graph.account_id(edge.src).to_string(),
                target: graph.account_id(edge.dst).to_string(),
                total_amount: edge.total_amount,
                count: edge.count(),
            })
            .collect();

        GraphData { nodes, edges }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
