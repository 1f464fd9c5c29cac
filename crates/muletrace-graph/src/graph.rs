//! Aggregated transaction graph.
//!
//! One pass folds the transaction batch into a directed multigraph
//! aggregated by (sender, receiver). Edges retain per-transaction amounts
//! and timestamps; nodes carry distinct-neighbor degrees and raw
//! transaction counts. The graph is immutable once built; detectors take
//! read-only views.

use muletrace_core::types::Transaction;
use std::collections::BTreeMap;

/// Dense account handle. Handles are assigned in ascending lexicographic
/// order of account id.
pub type NodeId = u32;

/// A directed (sender, receiver) relationship aggregating every individual
/// transaction between that pair.
///
/// The per-transaction records are sorted by (timestamp, amount) so that
/// batches differing only in row order build identical edges, including the
/// floating-point summation order of `total_amount`.
#[derive(Debug, Clone)]
pub struct AggregatedEdge {
    /// Sender handle.
    pub src: NodeId,
    /// Receiver handle.
    pub dst: NodeId,
    /// Sum of all transaction amounts on this edge (saturating).
    pub total_amount: f64,
    /// Per-transaction amounts, parallel to `timestamps`.
    pub amounts: Vec<f64>,
    /// Per-transaction timestamps (Unix epoch seconds), ascending.
    pub timestamps: Vec<u64>,
}

impl AggregatedEdge {
    /// Number of individual transactions aggregated into this edge.
    #[must_use]
    pub fn count(&self) -> usize {
        self.amounts.len()
    }

    /// Returns true for a self-transfer edge. Stored in the graph but
    /// skipped by every detector.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.src == self.dst
    }
}

/// Per-account attributes computed after the aggregation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountNode {
    /// Count of distinct predecessor accounts.
    pub in_degree: usize,
    /// Count of distinct successor accounts.
    pub out_degree: usize,
    /// Raw transactions summed over all adjacent edges. A self-transfer
    /// contributes on both sides.
    pub total_transactions: usize,
}

/// Directed multigraph aggregated by (sender, receiver).
#[derive(Debug, Clone)]
pub struct TransactionGraph {
    ids: Vec<String>,
    nodes: Vec<AccountNode>,
    edges: Vec<AggregatedEdge>,
    out_edges: Vec<Vec<usize>>,
    in_edges: Vec<Vec<usize>>,
}

impl TransactionGraph {
    /// Build the aggregated graph from a transaction batch.
    #[must_use]
    pub fn build(transactions: &[Transaction]) -> Self {
        // Intern account ids in sorted order so handle order is id order.
        let mut id_set: Vec<&str> = transactions
            .iter()
            .flat_map(|tx| [tx.sender.as_str(), tx.receiver.as_str()])
            .collect();
        id_set.sort_unstable();
        id_set.dedup();
        let ids: Vec<String> = id_set.iter().map(|s| (*s).to_string()).collect();

        let handle_of = |id: &str| -> NodeId {
            // Interning covered every id; the lookup cannot miss.
            id_set.binary_search(&id).expect("account id was interned") as NodeId
        };

        // Aggregate by (src, dst); BTreeMap keeps edges sorted by key.
        let mut edge_map: BTreeMap<(NodeId, NodeId), Vec<(u64, f64)>> = BTreeMap::new();
        for tx in transactions {
            let src = handle_of(&tx.sender);
            let dst = handle_of(&tx.receiver);
            edge_map
                .entry((src, dst))
                .or_default()
                .push((tx.timestamp, tx.amount));
        }

        let edges: Vec<AggregatedEdge> = edge_map
            .into_iter()
            .map(|((src, dst), mut records)| {
                records.sort_by(|a, b| {
                    a.0.cmp(&b.0)
                        .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
                });
                let amounts: Vec<f64> = records.iter().map(|r| r.1).collect();
                let timestamps: Vec<u64> = records.iter().map(|r| r.0).collect();
                AggregatedEdge {
                    src,
                    dst,
                    total_amount: saturating_sum(&amounts),
                    amounts,
                    timestamps,
                }
            })
            .collect();

        let n = ids.len();
        let mut out_edges: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut in_edges: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (idx, edge) in edges.iter().enumerate() {
            out_edges[edge.src as usize].push(idx);
            in_edges[edge.dst as usize].push(idx);
        }

        let mut nodes = vec![AccountNode::default(); n];
        for (v, node) in nodes.iter_mut().enumerate() {
            node.out_degree = out_edges[v].len();
            node.in_degree = in_edges[v].len();
            node.total_transactions = out_edges[v]
                .iter()
                .chain(in_edges[v].iter())
                .map(|&e| edges[e].count())
                .sum();
        }

        tracing::debug!(
            accounts = n,
            edges = edges.len(),
            transactions = transactions.len(),
            "built transaction graph"
        );

        Self {
            ids,
            nodes,
            edges,
            out_edges,
            in_edges,
        }
    }

    /// Number of accounts.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Number of aggregated edges (including self-loops).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Account id for a handle.
    #[must_use]
    pub fn account_id(&self, node: NodeId) -> &str {
        &self.ids[node as usize]
    }

    /// All account ids in lexicographic (== handle) order.
    #[must_use]
    pub fn account_ids(&self) -> &[String] {
        &self.ids
    }

    /// Handle for an account id, if present.
    #[must_use]
    pub fn handle(&self, id: &str) -> Option<NodeId> {
        self.ids
            .binary_search_by(|probe| probe.as_str().cmp(id))
            .ok()
            .map(|i| i as NodeId)
    }

    /// Node attributes for a handle.
    #[must_use]
    pub fn node(&self, node: NodeId) -> &AccountNode {
        &self.nodes[node as usize]
    }

    /// All aggregated edges, sorted by (src, dst).
    #[must_use]
    pub fn edges(&self) -> &[AggregatedEdge] {
        &self.edges
    }

    /// Outgoing edges of a node, destination ascending.
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = &AggregatedEdge> {
        self.out_edges[node as usize].iter().map(|&e| &self.edges[e])
    }

    /// Incoming edges of a node, source ascending.
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = &AggregatedEdge> {
        self.in_edges[node as usize].iter().map(|&e| &self.edges[e])
    }

    /// Distinct successors of a node, ascending, self excluded.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges(node)
            .filter(|e| !e.is_self_loop())
            .map(|e| e.dst)
    }

    /// Distinct predecessors of a node, ascending, self excluded.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.in_edges(node)
            .filter(|e| !e.is_self_loop())
            .map(|e| e.src)
    }
}

/// Sum that clamps +inf to f64::MAX instead of propagating it.
fn saturating_sum(values: &[f64]) -> f64 {
    let sum: f64 = values.iter().sum();
    if sum.is_infinite() {
        f64::MAX
    } else {
        sum
    }
}
