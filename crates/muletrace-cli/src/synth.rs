//! Synthetic batch generator.
//!
//! Plants one instance of every muling pattern the engine detects, plus
//! legitimate background traffic, and writes the batch as a CSV the
//! `analyze` command accepts. Seeded, so a batch is reproducible.

use chrono::DateTime;
use muletrace_core::error::Result;
use muletrace_core::types::Transaction;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

const HOUR: u64 = 3600;
const BASE: u64 = 1_704_103_200; // 2024-01-01 10:00:00 UTC

/// Generate a batch with planted patterns:
/// - cycles of 3, 4, and 5 accounts
/// - a 15-sender fan-in and a 12-receiver fan-out
/// - a 4-hop shell chain whose interiors stay low-activity
/// - `background` legitimate transfers among 20 ordinary accounts
#[must_use]
pub fn generate(seed: u64, background: usize) -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut txs: Vec<Transaction> = Vec::new();
    let mut next_id = 1usize;

    let push = |txs: &mut Vec<Transaction>,
                    next_id: &mut usize,
                    sender: String,
                    receiver: String,
                    amount: f64,
                    timestamp: u64| {
        txs.push(Transaction::new(
            format!("TX_{:06}", *next_id),
            sender,
            receiver,
            (amount * 100.0).round() / 100.0,
            timestamp,
        ));
        *next_id += 1;
    };

    // Circular routing: 3, 4, and 5 member loops.
    let rings: [&[&str]; 3] = [
        &["ACC_001", "ACC_002", "ACC_003"],
        &["ACC_011", "ACC_012", "ACC_013", "ACC_014"],
        &["ACC_701", "ACC_702", "ACC_703", "ACC_704", "ACC_705"],
    ];
    for (r, ring) in rings.iter().enumerate() {
        for i in 0..ring.len() {
            let amount = rng.gen_range(5_000.0..20_000.0);
            push(
                &mut txs,
                &mut next_id,
                ring[i].to_string(),
                ring[(i + 1) % ring.len()].to_string(),
                amount,
                BASE + (r as u64 * 5 + i as u64) * HOUR,
            );
        }
    }

    // Fan-in: 15 senders into one aggregator inside a day.
    for i in 0..15 {
        let amount = rng.gen_range(2_000.0..5_000.0);
        push(
            &mut txs,
            &mut next_id,
            format!("ACC_{}", 200 + i),
            "ACC_101".to_string(),
            amount,
            BASE + 10 * HOUR + i as u64 * 20 * 60,
        );
    }

    // Fan-out: one disperser to 12 receivers.
    for i in 0..12 {
        let amount = rng.gen_range(3_000.0..7_000.0);
        push(
            &mut txs,
            &mut next_id,
            "ACC_301".to_string(),
            format!("ACC_{}", 400 + i),
            amount,
            BASE + 15 * HOUR + i as u64 * 15 * 60,
        );
    }

    // Shell chain: 4 hops through three pass-through accounts, each given
    // one extra small transfer so they stay inside the low-activity band.
    let chain = ["ACC_501", "ACC_502", "ACC_503", "ACC_504", "ACC_505"];
    for i in 0..chain.len() - 1 {
        let amount = rng.gen_range(10_000.0..25_000.0);
        push(
            &mut txs,
            &mut next_id,
            chain[i].to_string(),
            chain[i + 1].to_string(),
            amount,
            BASE + (20 + i as u64) * HOUR,
        );
    }
    for (i, shell) in chain[1..chain.len() - 1].iter().enumerate() {
        let amount = rng.gen_range(100.0..500.0);
        push(
            &mut txs,
            &mut next_id,
            shell.to_string(),
            format!("ACC_{}", 601 + i),
            amount,
            BASE + (26 + i as u64) * HOUR,
        );
    }

    // Legitimate background traffic.
    for _ in 0..background {
        let sender = rng.gen_range(0..20);
        let mut receiver = rng.gen_range(0..20);
        while receiver == sender {
            receiver = rng.gen_range(0..20);
        }
        let amount = rng.gen_range(100.0..1_000.0);
        let offset = rng.gen_range(0..48 * HOUR);
        push(
            &mut txs,
            &mut next_id,
            format!("ACC_{}", 800 + sender),
            format!("ACC_{}", 800 + receiver),
            amount,
            BASE + offset,
        );
    }

    txs
}

/// Generate a batch and write it as CSV. Returns the row count.
pub fn write_batch(path: &Path, seed: u64, background: usize) -> Result<usize> {
    let txs = generate(seed, background);

    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| muletrace_core::error::ForensicsError::ingest(e.to_string()))?;
    writer
        .write_record([
            "transaction_id",
            "sender_id",
            "receiver_id",
            "amount",
            "timestamp",
        ])
        .map_err(|e| muletrace_core::error::ForensicsError::ingest(e.to_string()))?;
    for tx in &txs {
        let when = DateTime::from_timestamp(tx.timestamp as i64, 0)
            .expect("generated timestamps are valid")
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        writer
            .write_record([
                tx.id.as_str(),
                tx.sender.as_str(),
                tx.receiver.as_str(),
                &format!("{:.2}", tx.amount),
                &when,
            ])
            .map_err(|e| muletrace_core::error::ForensicsError::ingest(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| muletrace_core::error::ForensicsError::ingest(e.to_string()))?;

    Ok(txs.len())
}
