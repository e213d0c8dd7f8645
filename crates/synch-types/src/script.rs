//! The edit script: an immutable, ordered list of operations ending in a
//! single checksum record.
//!
//! Operations are stored from the highest source index to the lowest, so
//! replaying them in stored order never shifts a range that has yet to be
//! applied. Consumers must not reorder them.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::Digest;
use crate::error::{ScriptError, ScriptResult};
use crate::metadata::MetadataRecord;
use crate::operation::EditOperation;

/// A validated edit script.
///
/// Cloning is cheap: the operation list is shared.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EditScript {
    ops: Arc<[EditOperation]>,
}

impl EditScript {
    /// Build a script from an operation list, enforcing its invariants:
    /// non-empty, exactly one checksum, and the checksum in last place.
    pub fn new(ops: Vec<EditOperation>) -> ScriptResult<Self> {
        let Some(last) = ops.last() else {
            return Err(ScriptError::Malformed("script is empty".into()));
        };
        if !last.is_checksum() {
            return Err(ScriptError::Malformed(format!(
                "last operation is a {}, expected a checksum",
                last.kind_name()
            )));
        }
        if let Some(pos) = ops[..ops.len() - 1].iter().position(|op| op.is_checksum()) {
            return Err(ScriptError::Malformed(format!(
                "extra checksum at position {pos}"
            )));
        }
        Ok(Self { ops: ops.into() })
    }

    /// Reconstruct a script from its serialized records.
    pub fn from_metadata(records: Vec<MetadataRecord>) -> ScriptResult<Self> {
        let Some(last_index) = records.len().checked_sub(1) else {
            return Err(ScriptError::InvalidMetadata {
                index: 0,
                reason: "metadata is empty".into(),
            });
        };

        let mut ops = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if index < last_index && record.is_checksum() {
                return Err(ScriptError::InvalidMetadata {
                    index,
                    reason: "checksum record must be the last record".into(),
                });
            }
            let op = record.to_operation(index)?;
            if index == last_index && !op.is_checksum() {
                return Err(ScriptError::InvalidMetadata {
                    index,
                    reason: format!("last record has tag {:?}, expected \"h\"", record.tag()),
                });
            }
            ops.push(op);
        }

        Ok(Self { ops: ops.into() })
    }

    /// Serialize into records, in stored order.
    pub fn to_metadata(&self) -> Vec<MetadataRecord> {
        self.ops.iter().map(EditOperation::to_record).collect()
    }

    /// Encode as a JSON array of 4-element arrays.
    pub fn to_json(&self) -> ScriptResult<String> {
        serde_json::to_string(&self.to_metadata()).map_err(|e| ScriptError::Json(e.to_string()))
    }

    /// Decode from JSON, applying the same validation as [`Self::from_metadata`].
    pub fn from_json(s: &str) -> ScriptResult<Self> {
        let records: Vec<MetadataRecord> =
            serde_json::from_str(s).map_err(|e| ScriptError::Json(e.to_string()))?;
        Self::from_metadata(records)
    }

    /// All operations, checksum included, in stored order.
    pub fn operations(&self) -> &[EditOperation] {
        &self.ops
    }

    /// The mutating operations (everything but the trailing checksum).
    pub fn edits(&self) -> &[EditOperation] {
        &self.ops[..self.ops.len() - 1]
    }

    /// `(source_digest, target_digest)` from the checksum record.
    pub fn checksum(&self) -> (&Digest, &Digest) {
        match &self.ops[self.ops.len() - 1] {
            EditOperation::Checksum {
                source_digest,
                target_digest,
            } => (source_digest, target_digest),
            // Construction guarantees the last operation is a checksum.
            _ => unreachable!("edit script without trailing checksum"),
        }
    }

    pub fn source_digest(&self) -> &Digest {
        self.checksum().0
    }

    pub fn target_digest(&self) -> &Digest {
        self.checksum().1
    }

    /// Number of records, checksum included.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Always `false`; a valid script holds at least its checksum.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns `true` if the script changes nothing.
    pub fn is_identity(&self) -> bool {
        self.edits().is_empty()
    }

    pub fn deletions(&self) -> usize {
        self.count(|op| matches!(op, EditOperation::Delete { .. }))
    }

    pub fn insertions(&self) -> usize {
        self.count(|op| matches!(op, EditOperation::Insert { .. }))
    }

    pub fn replacements(&self) -> usize {
        self.count(|op| matches!(op, EditOperation::Replace { .. }))
    }

    fn count(&self, pred: impl Fn(&EditOperation) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl std::fmt::Debug for EditScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditScript")
            .field("edits", &self.edits())
            .field("source", self.source_digest())
            .field("target", self.target_digest())
            .finish()
    }
}

impl Serialize for EditScript {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_metadata().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EditScript {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<MetadataRecord>::deserialize(deserializer)?;
        EditScript::from_metadata(records).map_err(serde::de::Error::custom)
    }
}
