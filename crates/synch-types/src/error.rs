use thiserror::Error;

/// Errors produced while constructing or decoding edit scripts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A structural invariant of an in-memory operation list was violated.
    #[error("malformed edit script: {0}")]
    Malformed(String),

    /// A serialized metadata record failed validation.
    #[error("invalid metadata at record {index}: {reason}")]
    InvalidMetadata { index: usize, reason: String },

    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("json error: {0}")]
    Json(String),
}

/// Convenience alias for script results.
pub type ScriptResult<T> = Result<T, ScriptError>;
