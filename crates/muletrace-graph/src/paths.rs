//! Bounded simple-path enumeration with an interior-node predicate.
//!
//! The shell-chain detector needs every simple path of `min_hops` to
//! `max_hops` hops whose interior nodes all satisfy a predicate (in the
//! engine: low activity). The search prunes the moment a node that would
//! become interior fails the predicate, which is what keeps the
//! enumeration tractable; endpoints are unconstrained.

use crate::graph::{NodeId, TransactionGraph};

/// Enumerate simple directed paths with hop count in
/// `[min_hops, max_hops]` whose interior nodes all satisfy `is_interior`.
///
/// Paths are emitted grouped by (source, target) in ascending handle
/// order, depth-first within a pair.
#[must_use]
pub fn enumerate_chains<F>(
    graph: &TransactionGraph,
    min_hops: usize,
    max_hops: usize,
    is_interior: F,
) -> Vec<Vec<NodeId>>
where
    F: Fn(NodeId) -> bool,
{
    let n = graph.node_count();
    if n == 0 || min_hops > max_hops {
        return Vec::new();
    }

    let mut chains = Vec::new();
    let mut path: Vec<NodeId> = Vec::with_capacity(max_hops + 1);

    for source in 0..n as NodeId {
        let mut from_source = Vec::new();
        path.push(source);
        extend_chain(graph, min_hops, max_hops, &is_interior, &mut path, &mut from_source);
        path.pop();

        // DFS discovers paths in neighbor order; a stable sort on the
        // target groups them per (source, target) pair without disturbing
        // the within-pair order.
        from_source.sort_by_key(|chain: &Vec<NodeId>| *chain.last().expect("chain is non-empty"));
        chains.append(&mut from_source);
    }

    tracing::debug!(chains = chains.len(), "bounded path enumeration complete");
    chains
}

fn extend_chain<F>(
    graph: &TransactionGraph,
    min_hops: usize,
    max_hops: usize,
    is_interior: &F,
    path: &mut Vec<NodeId>,
    out: &mut Vec<Vec<NodeId>>,
) where
    F: Fn(NodeId) -> bool,
{
    let v = *path.last().expect("path holds at least the source");
    for w in graph.successors(v) {
        if path.contains(&w) {
            continue;
        }
        path.push(w);
        let hops = path.len() - 1;
        if hops >= min_hops {
            out.push(path.clone());
        }
        // Continuing through w would make it an interior node.
        if hops < max_hops && is_interior(w) {
            extend_chain(graph, min_hops, max_hops, is_interior, path, out);
        }
        path.pop();
    }
}
