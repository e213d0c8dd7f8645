//! Diff engine for string synchronization.
//!
//! Builds compact, replayable edit scripts between two versions of a string
//! and replays them with digest checks on both ends.
//!
//! # Key Types
//!
//! - [`EditScriptBuilder`] -- Diffs two strings into an [`EditScript`], with optional LRU memoization
//! - [`EditScriptApplier`] -- Replays a script against its source and verifies the result
//! - [`Aligner`] / [`SimilarAligner`] -- The opcode primitive the builder is layered on
//! - [`SynchConfig`] -- Cache size, alignment algorithm, and source check ordering
//!
//! ```
//! use synch_diff::{apply, build};
//!
//! let script = build("hello world", "hello there world").unwrap();
//! assert_eq!(apply("hello world", &script).unwrap(), "hello there world");
//! ```

pub mod align;
pub mod applier;
pub mod builder;
pub mod cache;
pub mod config;
pub mod error;

pub use align::{Aligner, Opcode, OpcodeTag, SimilarAligner};
pub use applier::{apply, Compose, EditScriptApplier};
pub use builder::{build, EditScriptBuilder};
pub use cache::{CacheStats, ScriptCache};
pub use config::{AlignAlgorithm, SourceCheck, SynchConfig};
pub use error::{IntegrityStage, SynchError, SynchResult};

pub use synch_types::{Digest, EditOperation, EditScript, MetadataRecord, ScriptError};
