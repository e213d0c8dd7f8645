//! Error types for the diff crate.

use std::fmt;

use synch_types::{Digest, ScriptError};

/// Which digest comparison failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegrityStage {
    /// The string handed to `apply` is not the one the script was built from.
    Source,
    /// Replaying the script did not produce the intended target.
    Target,
}

impl fmt::Display for IntegrityStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityStage::Source => f.write_str("source"),
            IntegrityStage::Target => f.write_str("target"),
        }
    }
}

/// Errors that can occur while building or applying edit scripts.
#[derive(Debug, thiserror::Error)]
pub enum SynchError {
    /// The alignment primitive failed or returned an unusable opcode list.
    #[error("alignment failed: {0}")]
    Alignment(String),

    /// The script violated a structural invariant.
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// A digest did not match.
    #[error("{stage} digest mismatch: expected {expected}, got {actual}")]
    Integrity {
        stage: IntegrityStage,
        expected: Digest,
        actual: Digest,
    },

    /// An operation's range does not fit the working buffer.
    #[error("operation {index} range [{start}, {end}) out of bounds for buffer of length {len}")]
    OutOfBounds {
        index: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl SynchError {
    /// Returns `true` for digest mismatches at either stage.
    pub fn is_integrity(&self) -> bool {
        matches!(self, SynchError::Integrity { .. })
    }
}

/// Convenience alias for diff results.
pub type SynchResult<T> = Result<T, SynchError>;
