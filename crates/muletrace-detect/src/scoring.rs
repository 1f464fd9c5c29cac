//! Suspicion scoring and fraud-ring assembly.
//!
//! Hits arrive concatenated in the fixed class order (cycles, fan-ins,
//! fan-outs, shells) and keep each detector's emission order inside a
//! class. Ring ids are assigned across the concatenation, so the numbering
//! is deterministic for a given batch. Scores accumulate additively
//! (base score x temporal factor per hit) and are capped at 100 once,
//! after every hit has been applied.

use crate::types::PatternHit;
use muletrace_core::types::PatternKind;
use muletrace_graph::NodeId;

/// Per-account accumulation state.
#[derive(Debug, Clone, Default)]
pub struct AccountState {
    /// Accumulated suspicion score, capped at 100 after assembly.
    pub score: f64,
    /// Pattern kinds that contributed score, in class order.
    pub kinds: Vec<PatternKind>,
    /// Rings the account appears in (any position), in assignment order.
    pub ring_ids: Vec<String>,
}

impl AccountState {
    /// Whether the account clears the reporting threshold.
    #[must_use]
    pub fn is_suspicious(&self, threshold: f64) -> bool {
        self.score >= threshold
    }
}

/// One assembled ring, still in handle space.
#[derive(Debug, Clone)]
pub struct RingDraft {
    /// Stable ring id.
    pub ring_id: String,
    /// Behavior class of the originating hit.
    pub kind: PatternKind,
    /// Ordered members.
    pub members: Vec<NodeId>,
    /// The members that accrued this ring's score.
    pub scoring_members: Vec<NodeId>,
}

/// Output of the assembly pass.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Per-account state, indexed by handle.
    pub accounts: Vec<AccountState>,
    /// Rings in ring-id order.
    pub rings: Vec<RingDraft>,
}

/// Scoring and ring assembly stage.
#[derive(Debug, Clone, Copy)]
pub struct RingAssembler;

impl RingAssembler {
    /// Fold the ordered hit list into account scores and rings.
    #[must_use]
    pub fn assemble(node_count: usize, hits: &[PatternHit]) -> Assembly {
        let mut accounts = vec![AccountState::default(); node_count];
        let mut rings = Vec::with_capacity(hits.len());

        for (index, hit) in hits.iter().enumerate() {
            let ring_id = format!("RING_{}", index + 1);

            for &member in &hit.members {
                let state = &mut accounts[member as usize];
                if !state.ring_ids.contains(&ring_id) {
                    state.ring_ids.push(ring_id.clone());
                }
            }

            let contribution = hit.base_score() * hit.temporal_factor;
            for &member in hit.scoring_members() {
                let state = &mut accounts[member as usize];
                state.score += contribution;
                if !state.kinds.contains(&hit.kind) {
                    state.kinds.push(hit.kind);
                }
            }

            rings.push(RingDraft {
                ring_id,
                kind: hit.kind,
                members: hit.members.clone(),
                scoring_members: hit.scoring_members().to_vec(),
            });
        }

        // Single cap after full accumulation.
        for state in &mut accounts {
            state.score = state.score.min(100.0);
        }

        tracing::debug!(rings = rings.len(), "ring assembly complete");
        Assembly { accounts, rings }
    }

    /// Ring risk: mean suspicion score of the scoring members, rounded to
    /// one decimal place.
    #[must_use]
    pub fn ring_risk(ring: &RingDraft, accounts: &[AccountState]) -> f64 {
        if ring.scoring_members.is_empty() {
            return 0.0;
        }
        let total: f64 = ring
            .scoring_members
            .iter()
            .map(|&m| accounts[m as usize].score)
            .sum();
        round1(total / ring.scoring_members.len() as f64)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
