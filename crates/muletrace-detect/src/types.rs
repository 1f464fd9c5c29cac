//! Detection results and the contractual report types.

use muletrace_core::types::PatternKind;
use muletrace_graph::NodeId;
use serde::{Deserialize, Serialize};

// ============================================================================
// Pattern Hits
// ============================================================================

/// One detector finding, before scoring.
///
/// Member order is significant: cycles are rotation-canonicalized to start
/// at the smallest account id, shell chains are in traversal order, and
/// smurfing hits list the hub first, then its counterparties sorted by id.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternHit {
    /// Behavior class.
    pub kind: PatternKind,
    /// Ordered member handles.
    pub members: Vec<NodeId>,
    /// Burstiness multiplier in [1.0, 1.5]; 1.0 for kinds that do not
    /// consult timestamps.
    pub temporal_factor: f64,
}

impl PatternHit {
    /// Create a hit with no temporal weighting.
    #[must_use]
    pub fn new(kind: PatternKind, members: Vec<NodeId>) -> Self {
        Self {
            kind,
            members,
            temporal_factor: 1.0,
        }
    }

    /// Base score contributed to each scoring member.
    #[must_use]
    pub fn base_score(&self) -> f64 {
        self.kind.base_score()
    }

    /// The members that accrue this hit's score:
    /// - cycle: every member
    /// - fan-in / fan-out: the hub only
    /// - shell: interior nodes only
    #[must_use]
    pub fn scoring_members(&self) -> &[NodeId] {
        match self.kind {
            PatternKind::Cycle => &self.members,
            PatternKind::FanIn | PatternKind::FanOut => &self.members[..1],
            PatternKind::Shell => {
                if self.members.len() < 3 {
                    &[]
                } else {
                    &self.members[1..self.members.len() - 1]
                }
            }
        }
    }
}

// ============================================================================
// Report Types
// ============================================================================

/// A reported account with suspicion score at or above the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    /// Account id.
    pub account_id: String,
    /// Accumulated suspicion score, capped at 100.
    pub suspicion_score: f64,
    /// Deduplicated pattern labels that contributed score, in class order.
    pub patterns: Vec<String>,
    /// Rings the account appears in, in assignment order.
    pub ring_ids: Vec<String>,
}

/// A named group of accounts emitted by one detector hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRing {
    /// Stable ring id ("RING_<n>", assigned in detection order).
    pub ring_id: String,
    /// Human-readable pattern label.
    pub pattern_type: String,
    /// Ordered member account ids.
    pub member_accounts: Vec<String>,
    /// Mean suspicion score of the ring's scoring members, 1 decimal.
    pub risk_score: f64,
}

/// Whole-batch statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Every account seen in the batch.
    pub total_accounts_analyzed: usize,
    /// Accounts at or above the suspicion threshold.
    pub suspicious_accounts_flagged: usize,
    /// Assembled rings.
    pub fraud_rings_detected: usize,
    /// Wall time of the analysis, rounded to 2 decimals.
    pub processing_time_seconds: f64,
}

/// Node entry in the visualization projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Account id.
    pub id: String,
    /// Distinct predecessor count.
    pub in_degree: usize,
    /// Distinct successor count.
    pub out_degree: usize,
    /// Raw transaction count over all adjacent edges.
    pub total_transactions: usize,
    /// Whether the account met the suspicion threshold.
    pub suspicious: bool,
    /// Pattern labels that contributed score.
    pub patterns: Vec<String>,
    /// Rings the account appears in.
    pub ring_ids: Vec<String>,
}

/// Edge entry in the visualization projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Sender account id.
    pub source: String,
    /// Receiver account id.
    pub target: String,
    /// Aggregated amount.
    pub total_amount: f64,
    /// Aggregated transaction count.
    pub count: usize,
}

/// Visualization-friendly projection of the aggregated graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    /// One entry per account.
    pub nodes: Vec<GraphNode>,
    /// One entry per aggregated edge.
    pub edges: Vec<GraphEdge>,
}

/// The full analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Flagged accounts, score descending then id ascending.
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    /// Rings in ring-id order.
    pub fraud_rings: Vec<FraudRing>,
    /// Batch statistics.
    pub summary: AnalysisSummary,
    /// Graph projection.
    pub graph_data: GraphData,
}
