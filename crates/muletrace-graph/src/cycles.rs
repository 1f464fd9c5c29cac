//! Simple directed cycle enumeration with length bounds.
//!
//! Tarjan's SCC decomposition narrows the search to non-trivial strongly
//! connected components; within each component a bounded DFS enumerates
//! simple cycles rooted at their smallest handle. Rooting at the smallest
//! handle makes the emitted form rotation-canonical (a cycle is reported
//! once, starting at its lexicographically smallest account id), and
//! ascending root/neighbor order makes the emission order deterministic.

use crate::graph::{NodeId, TransactionGraph};

/// Enumerate all simple directed cycles with length in
/// `[min_len, max_len]` (node count == edge count for a cycle).
///
/// Self-loops never participate; a `min_len` of 3 excludes mutual pairs.
#[must_use]
pub fn enumerate_cycles(
    graph: &TransactionGraph,
    min_len: usize,
    max_len: usize,
) -> Vec<Vec<NodeId>> {
    let n = graph.node_count();
    if n == 0 || min_len > max_len {
        return Vec::new();
    }

    // Deduplicated successor lists, self-loops dropped, ascending.
    let succs: Vec<Vec<NodeId>> = (0..n)
        .map(|v| graph.successors(v as NodeId).collect())
        .collect();

    let scc_of = tarjan_scc(&succs);
    let mut scc_size = vec![0usize; n];
    for &scc in &scc_of {
        scc_size[scc as usize] += 1;
    }

    let mut cycles = Vec::new();
    let mut path: Vec<NodeId> = Vec::with_capacity(max_len);

    for root in 0..n as NodeId {
        // A cycle of length >= min_len needs that many nodes in one SCC.
        if scc_size[scc_of[root as usize] as usize] < min_len {
            continue;
        }
        path.push(root);
        extend_cycle(&succs, &scc_of, root, min_len, max_len, &mut path, &mut cycles);
        path.pop();
    }

    tracing::debug!(cycles = cycles.len(), "cycle enumeration complete");
    cycles
}

/// DFS extension step. Only handles greater than the root are explored, so
/// each cycle is discovered exactly once, rooted at its smallest member.
fn extend_cycle(
    succs: &[Vec<NodeId>],
    scc_of: &[u32],
    root: NodeId,
    min_len: usize,
    max_len: usize,
    path: &mut Vec<NodeId>,
    cycles: &mut Vec<Vec<NodeId>>,
) {
    let v = *path.last().expect("path holds at least the root");
    for &w in &succs[v as usize] {
        if w == root {
            if path.len() >= min_len {
                cycles.push(path.clone());
            }
        } else if w > root
            && scc_of[w as usize] == scc_of[root as usize]
            && path.len() < max_len
            && !path.contains(&w)
        {
            path.push(w);
            extend_cycle(succs, scc_of, root, min_len, max_len, path, cycles);
            path.pop();
        }
    }
}

/// Iterative Tarjan SCC. Returns the component id of every node.
///
/// An explicit frame stack avoids call-stack overflow on long chains,
/// which real transaction batches do produce.
fn tarjan_scc(succs: &[Vec<NodeId>]) -> Vec<u32> {
    const UNVISITED: usize = usize::MAX;

    let n = succs.len();
    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut scc_of = vec![0u32; n];
    let mut next_index = 0usize;
    let mut scc_count = 0u32;

    for start in 0..n {
        if index[start] != UNVISITED {
            continue;
        }
        let mut frames: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some(&(v, i)) = frames.last() {
            if i == 0 {
                index[v] = next_index;
                lowlink[v] = next_index;
                next_index += 1;
                stack.push(v);
                on_stack[v] = true;
            }
            if i < succs[v].len() {
                frames.last_mut().expect("frame exists").1 += 1;
                let w = succs[v][i] as usize;
                if index[w] == UNVISITED {
                    frames.push((w, 0));
                } else if on_stack[w] {
                    lowlink[v] = lowlink[v].min(index[w]);
                }
            } else {
                frames.pop();
                if let Some(&(parent, _)) = frames.last() {
                    lowlink[parent] = lowlink[parent].min(lowlink[v]);
                }
                if lowlink[v] == index[v] {
                    loop {
                        let w = stack.pop().expect("SCC stack is non-empty");
                        on_stack[w] = false;
                        scc_of[w] = scc_count;
                        if w == v {
                            break;
                        }
                    }
                    scc_count += 1;
                }
            }
        }
    }

    scc_of
}
