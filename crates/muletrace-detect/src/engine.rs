//! Batch analysis engine.
//!
//! One `analyze` call is a pure function from a transaction batch to an
//! `AnalysisReport`: build the aggregated graph, run the three detectors,
//! merge their hits in the fixed class order, score, assemble rings, and
//! project the report. No state survives between calls, and identical
//! input yields byte-identical output (the wall-clock summary field
//! aside).

use crate::cycles::CycleRouting;
use crate::report::ReportBuilder;
use crate::scoring::RingAssembler;
use crate::shells::ShellChainDetector;
use crate::smurfing::SmurfingDetector;
use crate::types::{AnalysisReport, PatternHit};
use muletrace_core::config::AnalysisConfig;
use muletrace_core::error::Result;
use muletrace_core::types::Transaction;
use muletrace_graph::TransactionGraph;
use std::time::Instant;

/// The forensics engine: configuration plus the batch entry point.
#[derive(Debug, Clone)]
pub struct ForensicsEngine {
    config: AnalysisConfig,
}

impl Default for ForensicsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ForensicsEngine {
    /// Engine with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    /// Engine with a custom, validated configuration.
    pub fn with_config(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one transaction batch.
    #[must_use]
    pub fn analyze(&self, transactions: &[Transaction]) -> AnalysisReport {
        let started = Instant::now();
        let span = tracing::info_span!("analyze", transactions = transactions.len());
        let _guard = span.enter();

        let graph = TransactionGraph::build(transactions);

        let cycle_hits = CycleRouting::compute(&graph, &self.config);
        let (fan_in_hits, fan_out_hits) = SmurfingDetector::compute(&graph, &self.config);
        let shell_hits = ShellChainDetector::compute(&graph, &self.config);

        tracing::info!(
            cycles = cycle_hits.len(),
            fan_in = fan_in_hits.len(),
            fan_out = fan_out_hits.len(),
            shells = shell_hits.len(),
            "detection passes complete"
        );

        // Fixed class order; ring ids are assigned across the merge.
        let hits: Vec<PatternHit> = cycle_hits
            .into_iter()
            .chain(fan_in_hits)
            .chain(fan_out_hits)
            .chain(shell_hits)
            .collect();

        let assembly = RingAssembler::assemble(graph.node_count(), &hits);
        let report =
            ReportBuilder::build(&graph, &assembly, started.elapsed().as_secs_f64(), &self.config);

        tracing::info!(
            accounts = report.summary.total_accounts_analyzed,
            flagged = report.summary.suspicious_accounts_flagged,
            rings = report.summary.fraud_rings_detected,
            "analysis complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: u64 = 3600;
    const BASE: u64 = 1_704_103_200; // 2024-01-01 10:00:00 UTC

    fn tx(id: &str, sender: &str, receiver: &str, amount: f64, timestamp: u64) -> Transaction {
        Transaction::new(id, sender, receiver, amount, timestamp)
    }

    fn analyze(transactions: &[Transaction]) -> AnalysisReport {
        ForensicsEngine::new().analyze(transactions)
    }

    /// Strip the wall-clock field so reports compare structurally.
    fn untimed(mut report: AnalysisReport) -> AnalysisReport {
        report.summary.processing_time_seconds = 0.0;
        report
    }

    // ------------------------------------------------------------------
    // The six end-to-end scenarios.
    // ------------------------------------------------------------------

    #[test]
    fn test_pure_three_cycle() {
        let batch = vec![
            tx("TX_1", "ACC_001", "ACC_002", 100.0, BASE),
            tx("TX_2", "ACC_002", "ACC_003", 100.0, BASE + 600),
            tx("TX_3", "ACC_003", "ACC_001", 100.0, BASE + 1_200),
        ];
        let report = analyze(&batch);

        assert_eq!(report.summary.fraud_rings_detected, 1);
        assert_eq!(report.summary.suspicious_accounts_flagged, 3);

        let ring = &report.fraud_rings[0];
        assert_eq!(ring.ring_id, "RING_1");
        assert_eq!(ring.pattern_type, "Circular Fund Routing");
        assert_eq!(ring.member_accounts, vec!["ACC_001", "ACC_002", "ACC_003"]);
        assert_eq!(ring.risk_score, 85.0);

        for account in &report.suspicious_accounts {
            assert_eq!(account.suspicion_score, 85.0);
            assert_eq!(account.patterns, vec!["Circular Fund Routing"]);
            assert_eq!(account.ring_ids, vec!["RING_1"]);
        }
    }

    #[test]
    fn test_bursty_fan_in() {
        // 12 senders into one hub, differing amounts, all within 10 hours.
        let batch: Vec<Transaction> = (0..12)
            .map(|i| {
                tx(
                    &format!("TX_{i}"),
                    &format!("ACC_S{i:02}"),
                    "ACC_HUB",
                    1_500.0 + 211.0 * i as f64,
                    BASE + (i as u64 * 10 * HOUR) / 12,
                )
            })
            .collect();
        let report = analyze(&batch);

        assert_eq!(report.summary.fraud_rings_detected, 1);
        let ring = &report.fraud_rings[0];
        assert_eq!(ring.pattern_type, "Smurfing (Fan-in)");
        assert_eq!(ring.member_accounts[0], "ACC_HUB");
        assert_eq!(ring.member_accounts.len(), 13);
        assert_eq!(ring.risk_score, 97.5);

        // The hub alone is flagged: 65 * 1.5 = 97.5.
        assert_eq!(report.summary.suspicious_accounts_flagged, 1);
        let hub = &report.suspicious_accounts[0];
        assert_eq!(hub.account_id, "ACC_HUB");
        assert_eq!(hub.suspicion_score, 97.5);
    }

    #[test]
    fn test_payroll_fan_out_suppressed() {
        // Scheduled disbursement: constant amount, constant cadence, 300
        // payments cycling 25 receivers.
        let batch: Vec<Transaction> = (0..300u64)
            .map(|k| {
                tx(
                    &format!("TX_{k}"),
                    "ACC_PAYROLL",
                    &format!("ACC_EMP{:02}", k % 25),
                    2_500.0,
                    BASE + k * 24 * HOUR,
                )
            })
            .collect();
        let report = analyze(&batch);

        assert_eq!(report.summary.fraud_rings_detected, 0);
        assert_eq!(report.summary.suspicious_accounts_flagged, 0);
        assert_eq!(report.summary.total_accounts_analyzed, 26);
    }

    #[test]
    fn test_shell_chain_scores_interiors() {
        let mut batch = vec![
            tx("TX_0", "ACC_A", "ACC_M1", 9_000.0, BASE),
            tx("TX_1", "ACC_M1", "ACC_M2", 8_800.0, BASE + HOUR),
            tx("TX_2", "ACC_M2", "ACC_M3", 8_600.0, BASE + 2 * HOUR),
            tx("TX_3", "ACC_M3", "ACC_B", 8_400.0, BASE + 3 * HOUR),
        ];
        // Endpoint activity: A and B are ordinary busy accounts.
        for i in 0..4 {
            batch.push(tx(
                &format!("TX_A{i}"),
                &format!("ACC_P{i}"),
                "ACC_A",
                200.0,
                BASE + (10 + i as u64) * HOUR,
            ));
            batch.push(tx(
                &format!("TX_B{i}"),
                "ACC_B",
                &format!("ACC_Q{i}"),
                300.0,
                BASE + (20 + i as u64) * HOUR,
            ));
        }
        let report = analyze(&batch);

        assert_eq!(report.summary.fraud_rings_detected, 1);
        let ring = &report.fraud_rings[0];
        assert_eq!(ring.pattern_type, "Layered Shell Network");
        assert_eq!(
            ring.member_accounts,
            vec!["ACC_A", "ACC_M1", "ACC_M2", "ACC_M3", "ACC_B"]
        );
        assert_eq!(ring.risk_score, 75.0);

        assert_eq!(report.summary.suspicious_accounts_flagged, 3);
        for account in &report.suspicious_accounts {
            assert!(account.account_id.starts_with("ACC_M"));
            assert_eq!(account.suspicion_score, 75.0);
            assert_eq!(account.patterns, vec!["Layered Shell Network"]);
        }
    }

    #[test]
    fn test_overlapping_cycle_and_shell() {
        // Cycle X -> Y -> Z -> X; chain W -> Z -> X -> Y rides two of its
        // edges, so X and Z are shell interiors as well as cycle members.
        let batch = vec![
            tx("TX_0", "ACC_X", "ACC_Y", 4_000.0, BASE),
            tx("TX_1", "ACC_Y", "ACC_Z", 3_900.0, BASE + HOUR),
            tx("TX_2", "ACC_Z", "ACC_X", 3_800.0, BASE + 2 * HOUR),
            tx("TX_3", "ACC_W", "ACC_Z", 4_100.0, BASE + 3 * HOUR),
        ];
        let report = analyze(&batch);

        assert_eq!(report.summary.fraud_rings_detected, 2);
        assert_eq!(report.fraud_rings[0].pattern_type, "Circular Fund Routing");
        assert_eq!(
            report.fraud_rings[0].member_accounts,
            vec!["ACC_X", "ACC_Y", "ACC_Z"]
        );
        assert_eq!(report.fraud_rings[1].pattern_type, "Layered Shell Network");
        assert_eq!(
            report.fraud_rings[1].member_accounts,
            vec!["ACC_W", "ACC_Z", "ACC_X", "ACC_Y"]
        );

        let x = report
            .suspicious_accounts
            .iter()
            .find(|a| a.account_id == "ACC_X")
            .expect("ACC_X is flagged");
        // 85 + 75 capped at 100.
        assert_eq!(x.suspicion_score, 100.0);
        assert_eq!(
            x.patterns,
            vec!["Circular Fund Routing", "Layered Shell Network"]
        );
        assert_eq!(x.ring_ids, vec!["RING_1", "RING_2"]);
    }

    #[test]
    fn test_empty_input() {
        let report = analyze(&[]);
        assert!(report.suspicious_accounts.is_empty());
        assert!(report.fraud_rings.is_empty());
        assert_eq!(report.summary.total_accounts_analyzed, 0);
        assert_eq!(report.summary.suspicious_accounts_flagged, 0);
        assert_eq!(report.summary.fraud_rings_detected, 0);
        assert!(report.graph_data.nodes.is_empty());
        assert!(report.graph_data.edges.is_empty());
    }

    // ------------------------------------------------------------------
    // Cross-cutting properties.
    // ------------------------------------------------------------------

    /// Mixed batch exercising all three detectors at once.
    fn mixed_batch() -> Vec<Transaction> {
        let mut batch = vec![
            tx("TX_C0", "ACC_001", "ACC_002", 5_000.0, BASE),
            tx("TX_C1", "ACC_002", "ACC_003", 4_900.0, BASE + HOUR),
            tx("TX_C2", "ACC_003", "ACC_001", 4_800.0, BASE + 2 * HOUR),
        ];
        for i in 0..11 {
            batch.push(tx(
                &format!("TX_F{i}"),
                &format!("ACC_S{i:02}"),
                "ACC_AGG",
                2_000.0 + 173.0 * i as f64,
                BASE + 5 * HOUR + i as u64 * 1_800,
            ));
        }
        batch.extend([
            tx("TX_L0", "ACC_SRC", "ACC_SH1", 12_000.0, BASE + 30 * HOUR),
            tx("TX_L1", "ACC_SH1", "ACC_SH2", 11_800.0, BASE + 31 * HOUR),
            tx("TX_L2", "ACC_SH2", "ACC_SH3", 11_600.0, BASE + 32 * HOUR),
            tx("TX_L3", "ACC_SH3", "ACC_DST", 11_400.0, BASE + 33 * HOUR),
        ]);
        for i in 0..4 {
            batch.push(tx(
                &format!("TX_E{i}"),
                &format!("ACC_BG{i}"),
                "ACC_SRC",
                150.0,
                BASE + (40 + i as u64) * HOUR,
            ));
            batch.push(tx(
                &format!("TX_G{i}"),
                "ACC_DST",
                &format!("ACC_BH{i}"),
                175.0,
                BASE + (50 + i as u64) * HOUR,
            ));
        }
        batch
    }

    #[test]
    fn test_mixed_batch_class_order() {
        let report = analyze(&mixed_batch());

        let types: Vec<&str> = report
            .fraud_rings
            .iter()
            .map(|r| r.pattern_type.as_str())
            .collect();
        assert_eq!(
            types,
            vec![
                "Circular Fund Routing",
                "Smurfing (Fan-in)",
                "Layered Shell Network"
            ]
        );
        let ids: Vec<&str> = report.fraud_rings.iter().map(|r| r.ring_id.as_str()).collect();
        assert_eq!(ids, vec!["RING_1", "RING_2", "RING_3"]);
    }

    #[test]
    fn test_report_invariants() {
        let report = analyze(&mixed_batch());
        let node_ids: Vec<&str> = report.graph_data.nodes.iter().map(|n| n.id.as_str()).collect();

        // Every ring member is a node in the graph.
        for ring in &report.fraud_rings {
            for member in &ring.member_accounts {
                assert!(node_ids.contains(&member.as_str()));
            }
        }
        // Scores bounded, flagged count consistent.
        for account in &report.suspicious_accounts {
            assert!(account.suspicion_score >= 0.0 && account.suspicion_score <= 100.0);
            assert!(!account.ring_ids.is_empty());
        }
        assert_eq!(
            report.summary.suspicious_accounts_flagged,
            report.suspicious_accounts.len()
        );
        assert_eq!(report.summary.fraud_rings_detected, report.fraud_rings.len());
        // Ring risk is bounded too.
        for ring in &report.fraud_rings {
            assert!(ring.risk_score >= 0.0 && ring.risk_score <= 100.0);
        }
    }

    #[test]
    fn test_determinism() {
        let batch = mixed_batch();
        let first = untimed(analyze(&batch));
        let second = untimed(analyze(&batch));
        assert_eq!(first, second);
    }

    #[test]
    fn test_input_order_irrelevant() {
        let batch = mixed_batch();
        let mut reversed = batch.clone();
        reversed.reverse();

        assert_eq!(untimed(analyze(&batch)), untimed(analyze(&reversed)));
    }

    #[test]
    fn test_disjoint_addition_is_monotone() {
        let mut batch = vec![
            tx("TX_1", "ACC_001", "ACC_002", 100.0, BASE),
            tx("TX_2", "ACC_002", "ACC_003", 100.0, BASE + 600),
            tx("TX_3", "ACC_003", "ACC_001", 100.0, BASE + 1_200),
        ];
        let before = analyze(&batch);

        batch.push(tx("TX_X", "ACC_NEW1", "ACC_NEW2", 42.0, BASE + 9_000));
        let after = analyze(&batch);

        for account in &before.suspicious_accounts {
            let later = after
                .suspicious_accounts
                .iter()
                .find(|a| a.account_id == account.account_id)
                .expect("still flagged");
            assert!(later.suspicion_score >= account.suspicion_score);
        }
        assert_eq!(after.summary.total_accounts_analyzed, 5);
    }

    #[test]
    fn test_custom_config_threshold() {
        let config = AnalysisConfig::default().with_fan_threshold(5);
        let engine = ForensicsEngine::with_config(config).unwrap();

        let batch: Vec<Transaction> = (0..6)
            .map(|i| {
                tx(
                    &format!("TX_{i}"),
                    &format!("ACC_S{i}"),
                    "ACC_HUB",
                    900.0 + 50.0 * i as f64,
                    BASE + i as u64 * HOUR,
                )
            })
            .collect();
        let report = engine.analyze(&batch);
        assert_eq!(report.summary.fraud_rings_detected, 1);

        // Default threshold would not flag this hub.
        let default_report = analyze(&batch);
        assert_eq!(default_report.summary.fraud_rings_detected, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalysisConfig::default().with_cycle_len(2, 5);
        assert!(ForensicsEngine::with_config(config).is_err());
    }
}
