//! Foundation types for string synchronization.
//!
//! An [`EditScript`] describes how to turn one string into another. It is
//! produced by `synch-diff`, shipped in its [`MetadataRecord`] form, and
//! replayed against the original string on the other side.
//!
//! # Key Types
//!
//! - [`Digest`] — SHA-256 value carried by the checksum record
//! - [`EditOperation`] — Delete / Insert / Replace / Checksum
//! - [`EditScript`] — Validated, immutable operation list
//! - [`MetadataRecord`] — Serialized `(tag, field1, field2, field3)` tuple

pub mod digest;
pub mod error;
pub mod metadata;
pub mod operation;
pub mod script;

pub use digest::{Digest, DIGEST_LEN};
pub use error::{ScriptError, ScriptResult};
pub use metadata::MetadataRecord;
pub use operation::EditOperation;
pub use script::EditScript;
