//! CSV ingress shim.
//!
//! Validates the schema (required columns by name, extra columns ignored)
//! and parses rows into typed transactions. All schema and parse failures
//! surface here; the engine downstream only ever sees well-formed input.

use chrono::{DateTime, NaiveDateTime};
use muletrace_core::error::{ForensicsError, Result};
use muletrace_core::types::Transaction;
use std::io::Read;
use std::path::Path;

/// Columns a batch must carry, in no particular order.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "transaction_id",
    "sender_id",
    "receiver_id",
    "amount",
    "timestamp",
];

/// Read and validate a transaction CSV from disk.
pub fn read_csv(path: &Path) -> Result<Vec<Transaction>> {
    let file = std::fs::File::open(path)?;
    parse_csv(file)
}

/// Parse a transaction CSV from any reader.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| ForensicsError::ingest(format!("cannot read CSV header: {e}")))?
        .clone();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| (*col).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ForensicsError::MissingColumns(missing));
    }

    let column_index = |name: &str| -> usize {
        headers
            .iter()
            .position(|h| h == name)
            .expect("required column was just verified")
    };
    let idx_id = column_index("transaction_id");
    let idx_sender = column_index("sender_id");
    let idx_receiver = column_index("receiver_id");
    let idx_amount = column_index("amount");
    let idx_timestamp = column_index("timestamp");

    let mut transactions = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        // Header is line 1; data starts at line 2.
        let line = row + 2;
        let record =
            record.map_err(|e| ForensicsError::ingest(format!("line {line}: {e}")))?;

        let field = |idx: usize| -> Result<&str> {
            record
                .get(idx)
                .ok_or_else(|| ForensicsError::ingest(format!("line {line}: truncated row")))
        };

        let amount: f64 = field(idx_amount)?.trim().parse().map_err(|_| {
            ForensicsError::ingest(format!(
                "line {line}: invalid amount {:?}",
                field(idx_amount).unwrap_or_default()
            ))
        })?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(ForensicsError::ingest(format!(
                "line {line}: amount must be non-negative, got {amount}"
            )));
        }

        let timestamp = parse_timestamp(field(idx_timestamp)?.trim())
            .ok_or_else(|| {
                ForensicsError::ingest(format!(
                    "line {line}: unrecognized timestamp {:?}",
                    field(idx_timestamp).unwrap_or_default()
                ))
            })?;

        transactions.push(Transaction::new(
            field(idx_id)?.trim(),
            field(idx_sender)?.trim(),
            field(idx_receiver)?.trim(),
            amount,
            timestamp,
        ));
    }

    tracing::debug!(rows = transactions.len(), "CSV batch parsed");
    Ok(transactions)
}

/// Accepts Unix epoch seconds, `%Y-%m-%d %H:%M:%S` (assumed UTC), or
/// RFC 3339. Pre-epoch instants are rejected.
fn parse_timestamp(value: &str) -> Option<u64> {
    if let Ok(epoch) = value.parse::<i64>() {
        return u64::try_from(epoch).ok();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return u64::try_from(naive.and_utc().timestamp()).ok();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return u64::try_from(dt.timestamp()).ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "\
transaction_id,sender_id,receiver_id,amount,timestamp
TX_000001,ACC_001,ACC_002,5000.00,2024-01-01 10:00:00
TX_000002,ACC_002,ACC_003,4900.50,2024-01-01 11:00:00
";

    #[test]
    fn test_valid_batch() {
        let txs = parse_csv(VALID.as_bytes()).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].id, "TX_000001");
        assert_eq!(txs[0].sender, "ACC_001");
        assert_eq!(txs[0].receiver, "ACC_002");
        assert_eq!(txs[0].amount, 5000.0);
        assert_eq!(txs[1].timestamp - txs[0].timestamp, 3600);
    }

    #[test]
    fn test_missing_columns_named() {
        let csv = "id,from,to,value\n1,A,B,100\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        match err {
            ForensicsError::MissingColumns(cols) => {
                assert_eq!(cols.len(), 5);
                assert!(cols.contains(&"amount".to_string()));
            }
            other => panic!("expected MissingColumns, got {other}"),
        }
    }

    #[test]
    fn test_column_order_is_irrelevant() {
        let csv = "\
amount,timestamp,transaction_id,receiver_id,sender_id
100.0,1704103200,TX_1,ACC_B,ACC_A
";
        let txs = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(txs[0].sender, "ACC_A");
        assert_eq!(txs[0].receiver, "ACC_B");
        assert_eq!(txs[0].timestamp, 1_704_103_200);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = "\
transaction_id,sender_id,receiver_id,amount,timestamp,memo
TX_1,ACC_A,ACC_B,10.0,1704103200,rent
";
        let txs = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(txs.len(), 1);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let csv = "\
transaction_id,sender_id,receiver_id,amount,timestamp
TX_1,ACC_A,ACC_B,-5.0,1704103200
";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let csv = "\
transaction_id,sender_id,receiver_id,amount,timestamp
TX_1,ACC_A,ACC_B,5.0,yesterday
";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_rfc3339_timestamps() {
        let csv = "\
transaction_id,sender_id,receiver_id,amount,timestamp
TX_1,ACC_A,ACC_B,5.0,2024-01-01T10:00:00+00:00
";
        let txs = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(txs[0].timestamp, 1_704_103_200);
    }

    #[test]
    fn test_empty_batch_is_fine() {
        let csv = "transaction_id,sender_id,receiver_id,amount,timestamp\n";
        let txs = parse_csv(csv.as_bytes()).unwrap();
        assert!(txs.is_empty());
    }
}
