//! Detector metadata and trait definitions.
//!
//! Each pattern detector carries a small metadata record identifying it in
//! logs and diagnostics. Detectors run in a fixed class order; the trait
//! exposes identity only, not execution (each detector has its own typed
//! `compute` entry point).

use serde::{Deserialize, Serialize};

/// Identity of a pattern detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorMetadata {
    /// Unique detector identifier (e.g., "detect/cycle-routing").
    pub id: String,

    /// Human-readable description.
    pub description: String,
}

impl DetectorMetadata {
    /// Create metadata for a detector.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Base trait for all pattern detectors.
pub trait PatternDetector: Send + Sync {
    /// Returns the detector metadata.
    fn metadata(&self) -> &DetectorMetadata;

    /// Returns the detector ID.
    fn id(&self) -> &str {
        &self.metadata().id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct DummyDetector {
        metadata: DetectorMetadata,
    }

    impl PatternDetector for DummyDetector {
        fn metadata(&self) -> &DetectorMetadata {
            &self.metadata
        }
    }

    #[test]
    fn test_metadata_builder() {
        let detector = DummyDetector {
            metadata: DetectorMetadata::new("detect/dummy").with_description("does nothing"),
        };
        assert_eq!(detector.id(), "detect/dummy");
        assert_eq!(detector.metadata().description, "does nothing");
    }
}
