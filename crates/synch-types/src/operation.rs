//! Edit operations: the records that make up an edit script.
//!
//! Index ranges count Unicode scalar values (`char`s) of the working buffer,
//! not bytes.

use serde_json::Value;

use crate::digest::Digest;
use crate::metadata::MetadataRecord;

/// A single step of an edit script.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EditOperation {
    /// Remove the half-open range `[start, end)`.
    Delete { start: usize, end: usize },
    /// Splice `text` in at `start`. `end` is carried for symmetry and does
    /// not take part in the splice.
    Insert {
        start: usize,
        end: usize,
        text: String,
    },
    /// Remove `[start, end)` and put `text` in its place.
    Replace {
        start: usize,
        end: usize,
        text: String,
    },
    /// Digests of the source and the intended target. Never mutates.
    Checksum {
        source_digest: Digest,
        target_digest: Digest,
    },
}

impl EditOperation {
    pub const DELETE_TAG: char = 'd';
    pub const INSERT_TAG: char = 'i';
    pub const REPLACE_TAG: char = 'r';
    pub const CHECKSUM_TAG: char = 'h';

    /// The single-character wire tag.
    pub fn tag(&self) -> char {
        match self {
            EditOperation::Delete { .. } => Self::DELETE_TAG,
            EditOperation::Insert { .. } => Self::INSERT_TAG,
            EditOperation::Replace { .. } => Self::REPLACE_TAG,
            EditOperation::Checksum { .. } => Self::CHECKSUM_TAG,
        }
    }

    /// Returns `true` for the checksum record.
    pub fn is_checksum(&self) -> bool {
        matches!(self, EditOperation::Checksum { .. })
    }

    /// Human-readable name, used in error messages and logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            EditOperation::Delete { .. } => "delete",
            EditOperation::Insert { .. } => "insert",
            EditOperation::Replace { .. } => "replace",
            EditOperation::Checksum { .. } => "checksum",
        }
    }

    /// The `[start, end)` range of a mutating operation.
    pub fn range(&self) -> Option<(usize, usize)> {
        match self {
            EditOperation::Delete { start, end }
            | EditOperation::Insert { start, end, .. }
            | EditOperation::Replace { start, end, .. } => Some((*start, *end)),
            EditOperation::Checksum { .. } => None,
        }
    }

    /// Convert to the serialized 4-tuple form.
    pub fn to_record(&self) -> MetadataRecord {
        let tag = self.tag().to_string();
        match self {
            EditOperation::Delete { start, end } => {
                MetadataRecord(tag, Value::from(*start), Value::from(*end), Value::Null)
            }
            EditOperation::Insert { start, end, text }
            | EditOperation::Replace { start, end, text } => MetadataRecord(
                tag,
                Value::from(*start),
                Value::from(*end),
                Value::String(text.clone()),
            ),
            EditOperation::Checksum {
                source_digest,
                target_digest,
            } => MetadataRecord(
                tag,
                Value::String(source_digest.to_hex()),
                Value::String(target_digest.to_hex()),
                Value::Null,
            ),
        }
    }
}
