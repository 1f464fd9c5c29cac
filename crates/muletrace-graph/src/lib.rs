//! # Muletrace Graph
//!
//! Directed transaction-graph machinery for the forensics engine:
//! - `TransactionGraph` - multigraph aggregated by (sender, receiver) with
//!   interned account handles
//! - Simple-cycle enumeration (Tarjan SCC narrowing + bounded DFS)
//! - Bounded simple-path search with an interior-node predicate
//!
//! Account ids are interned to dense `u32` handles assigned in ascending
//! lexicographic order, so iterating handles in numeric order is identical
//! to iterating ids in lexicographic order. Every traversal in this crate
//! follows handle order, which makes enumeration output deterministic.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cycles;
pub mod graph;
pub mod paths;

pub use cycles::enumerate_cycles;
pub use graph::{AccountNode, AggregatedEdge, NodeId, TransactionGraph};
pub use paths::enumerate_chains;
