use serde::{Deserialize, Serialize};

use crate::error::{SynchError, SynchResult};

/// Alignment algorithm used to compute opcodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignAlgorithm {
    #[default]
    Myers,
    Patience,
    Lcs,
}

impl From<AlignAlgorithm> for similar::Algorithm {
    fn from(alg: AlignAlgorithm) -> Self {
        match alg {
            AlignAlgorithm::Myers => similar::Algorithm::Myers,
            AlignAlgorithm::Patience => similar::Algorithm::Patience,
            AlignAlgorithm::Lcs => similar::Algorithm::Lcs,
        }
    }
}

/// When the applier compares the source digest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCheck {
    /// Reject a mismatched source before touching the working buffer.
    #[default]
    BeforeApply,
    /// Replay first, then compare the source digest. The replayed string is
    /// still discarded on mismatch.
    AfterApply,
}

/// Configuration shared by the builder and the applier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynchConfig {
    /// Number of `(source, target)` pairs the builder memoizes. `0` disables
    /// the cache.
    pub cache_capacity: usize,
    /// Alignment algorithm.
    pub algorithm: AlignAlgorithm,
    /// Soft deadline for a single alignment, in milliseconds. Past it the
    /// aligner settles for a coarser diff; a deadline result that does not
    /// validate is recomputed without one.
    pub deadline_ms: Option<u64>,
    /// Ordering of the source digest check during apply.
    pub source_check: SourceCheck,
}

impl Default for SynchConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 128,
            algorithm: AlignAlgorithm::Myers,
            deadline_ms: None,
            source_check: SourceCheck::BeforeApply,
        }
    }
}

impl SynchConfig {
    /// Default settings with memoization turned off.
    pub fn uncached() -> Self {
        Self {
            cache_capacity: 0,
            ..Default::default()
        }
    }

    /// Parse from TOML text. Missing keys take their defaults.
    pub fn from_toml(s: &str) -> SynchResult<Self> {
        toml::from_str(s).map_err(|e| SynchError::Config(e.to_string()))
    }
}
