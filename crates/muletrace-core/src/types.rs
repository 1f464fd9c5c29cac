//! Core transaction and pattern types.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Transaction Types
// ============================================================================

/// A single financial transaction, as delivered by the ingress layer.
///
/// The engine consumes a validated, typed stream; schema and parse failures
/// are handled upstream. Self-transfers (`sender == receiver`) may appear
/// and are retained in the graph but skipped by every detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID. Duplicates are not rejected; each row counts.
    pub id: String,
    /// Sending account ID.
    pub sender: String,
    /// Receiving account ID.
    pub receiver: String,
    /// Transaction amount (non-negative).
    pub amount: f64,
    /// Timestamp (Unix epoch seconds).
    pub timestamp: u64,
}

impl Transaction {
    /// Create a new transaction.
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: f64,
        timestamp: u64,
    ) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
            timestamp,
        }
    }

    /// Returns true if sender and receiver are the same account.
    #[must_use]
    pub fn is_self_transfer(&self) -> bool {
        self.sender == self.receiver
    }
}

// ============================================================================
// Pattern Kinds
// ============================================================================

/// The muling behavior classes the engine detects.
///
/// The declaration order is the canonical class order used for ring-id
/// assignment and pattern-label listing: cycles, then fan-ins, then
/// fan-outs, then shell chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Circular fund routing (simple directed cycle, 3-5 members).
    Cycle,
    /// Smurfing fan-in (many senders into one aggregator).
    FanIn,
    /// Smurfing fan-out (one disperser to many receivers).
    FanOut,
    /// Layered shell chain through low-activity intermediaries.
    Shell,
}

impl PatternKind {
    /// All kinds in canonical class order.
    pub const ALL: &'static [PatternKind] = &[
        PatternKind::Cycle,
        PatternKind::FanIn,
        PatternKind::FanOut,
        PatternKind::Shell,
    ];

    /// Base suspicion score contributed by one hit of this kind.
    #[must_use]
    pub const fn base_score(&self) -> f64 {
        match self {
            PatternKind::Cycle => 85.0,
            PatternKind::FanIn | PatternKind::FanOut => 65.0,
            PatternKind::Shell => 75.0,
        }
    }

    /// Human-readable pattern label used in reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            PatternKind::Cycle => "Circular Fund Routing",
            PatternKind::FanIn => "Smurfing (Fan-in)",
            PatternKind::FanOut => "Smurfing (Fan-out)",
            PatternKind::Shell => "Layered Shell Network",
        }
    }

    /// Short machine name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Cycle => "cycle",
            PatternKind::FanIn => "fan_in",
            PatternKind::FanOut => "fan_out",
            PatternKind::Shell => "shell",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
