//! # Muletrace Detect
//!
//! The forensic analysis pipeline:
//! - `CycleRouting` - circular fund routing (simple cycles, 3-5 members)
//! - `SmurfingDetector` - fan-in / fan-out hubs with a burstiness factor
//! - `FalsePositiveFilter` - suppresses regularized bulk payers/receivers
//! - `ShellChainDetector` - layered chains through low-activity accounts
//! - `RingAssembler` - suspicion scoring and fraud-ring assembly
//! - `ReportBuilder` - the contractual report projection
//! - `ForensicsEngine` - the batch entry point tying it together
//!
//! The engine is a pure function from a transaction batch to a report:
//! identical input produces byte-identical output, including ring-id
//! assignment and every list ordering.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cycles;
pub mod engine;
pub mod filter;
pub mod report;
pub mod scoring;
pub mod shells;
pub mod smurfing;
pub mod types;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cycles::CycleRouting;
    pub use crate::engine::ForensicsEngine;
    pub use crate::filter::FalsePositiveFilter;
    pub use crate::report::ReportBuilder;
    pub use crate::scoring::RingAssembler;
    pub use crate::shells::ShellChainDetector;
    pub use crate::smurfing::SmurfingDetector;
    pub use crate::types::{AnalysisReport, FraudRing, PatternHit, SuspiciousAccount};
}

pub use engine::ForensicsEngine;
pub use types::{AnalysisReport, AnalysisSummary, FraudRing, PatternHit, SuspiciousAccount};
