//! Serialized form of an edit script.
//!
//! Each record is a 4-tuple `(tag, field1, field2, field3)`:
//!
//! | tag | field1 | field2 | field3 |
//! |-----|--------|--------|--------|
//! | `"d"` | start | end | `null` |
//! | `"i"` | start | end | text |
//! | `"r"` | start | end | text |
//! | `"h"` | source digest (hex) | target digest (hex) | `null` |
//!
//! Fields stay raw JSON values until [`MetadataRecord::to_operation`] checks
//! them and produces an [`EditOperation`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::digest::Digest;
use crate::error::{ScriptError, ScriptResult};
use crate::operation::EditOperation;

/// One serialized record. Encodes as a JSON array of four elements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord(pub String, pub Value, pub Value, pub Value);

impl MetadataRecord {
    /// The record's tag.
    pub fn tag(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this record carries the checksum tag.
    pub fn is_checksum(&self) -> bool {
        self.0.len() == 1 && self.0.starts_with(EditOperation::CHECKSUM_TAG)
    }

    /// Validate the fields of this record and convert it into an operation.
    ///
    /// `index` is only used to label errors. Positional rules (exactly one
    /// checksum, in last place) are checked by `EditScript::from_metadata`.
    pub fn to_operation(&self, index: usize) -> ScriptResult<EditOperation> {
        let invalid = |reason: String| ScriptError::InvalidMetadata { index, reason };

        match self.0.as_str() {
            "d" => {
                let (start, end) = parse_range(&self.1, &self.2).map_err(invalid)?;
                expect_null(&self.3, "d").map_err(invalid)?;
                Ok(EditOperation::Delete { start, end })
            }
            "i" | "r" => {
                let (start, end) = parse_range(&self.1, &self.2).map_err(invalid)?;
                let text = self
                    .3
                    .as_str()
                    .ok_or_else(|| invalid(format!("tag {:?} requires string text", self.0)))?
                    .to_owned();
                if self.0 == "i" {
                    Ok(EditOperation::Insert { start, end, text })
                } else {
                    Ok(EditOperation::Replace { start, end, text })
                }
            }
            "h" => {
                let (Some(source), Some(target)) = (self.1.as_str(), self.2.as_str()) else {
                    return Err(invalid("checksum digests must both be strings".into()));
                };
                let source_digest =
                    Digest::from_hex(source).map_err(|e| invalid(format!("source digest: {e}")))?;
                let target_digest =
                    Digest::from_hex(target).map_err(|e| invalid(format!("target digest: {e}")))?;
                expect_null(&self.3, "h").map_err(invalid)?;
                Ok(EditOperation::Checksum {
                    source_digest,
                    target_digest,
                })
            }
            other => Err(invalid(format!("unknown tag {other:?}"))),
        }
    }
}

fn parse_index(value: &Value, name: &str) -> Result<usize, String> {
    value
        .as_u64()
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| format!("{name} must be a non-negative integer, got {value}"))
}

fn parse_range(start: &Value, end: &Value) -> Result<(usize, usize), String> {
    let start = parse_index(start, "start")?;
    let end = parse_index(end, "end")?;
    if start > end {
        return Err(format!("start {start} exceeds end {end}"));
    }
    Ok((start, end))
}

fn expect_null(value: &Value, tag: &str) -> Result<(), String> {
    if value.is_null() {
        Ok(())
    } else {
        Err(format!("tag {tag:?} requires a null fourth field, got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> MetadataRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_delete() {
        let op = record(json!(["d", 0, 3, null])).to_operation(0).unwrap();
        assert_eq!(op, EditOperation::Delete { start: 0, end: 3 });
    }

    #[test]
    fn parses_insert_and_replace() {
        let op = record(json!(["i", 5, 5, " there"])).to_operation(0).unwrap();
        assert_eq!(op, EditOperation::Insert { start: 5, end: 5, text: " there".into() });

        let op = record(json!(["r", 1, 2, "x"])).to_operation(0).unwrap();
        assert_eq!(op, EditOperation::Replace { start: 1, end: 2, text: "x".into() });
    }

    #[test]
    fn parses_checksum() {
        let src = "aa".repeat(32);
        let dst = "bb".repeat(32);
        let op = record(json!(["h", src, dst, null])).to_operation(0).unwrap();
        assert!(op.is_checksum());
    }

    #[test]
    fn unknown_tag_rejected() {
        let err = record(json!(["x", 0, 1, null])).to_operation(4).unwrap_err();
        match err {
            ScriptError::InvalidMetadata { index, reason } => {
                assert_eq!(index, 4);
                assert!(reason.contains("\"x\""));
            }
            other => panic!("expected InvalidMetadata, got {:?}", other),
        }
    }

    #[test]
    fn non_string_digest_rejected() {
        let err = record(json!(["h", 1, "aa", null])).to_operation(0).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidMetadata { .. }));
    }

    #[test]
    fn short_digest_rejected() {
        let err = record(json!(["h", "aa", "bb", null])).to_operation(0).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidMetadata { .. }));
    }

    #[test]
    fn negative_index_rejected() {
        let err = record(json!(["d", -1, 2, null])).to_operation(0).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidMetadata { .. }));
    }

    #[test]
    fn inverted_range_rejected() {
        let err = record(json!(["r", 4, 2, "x"])).to_operation(0).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidMetadata { .. }));
    }

    #[test]
    fn insert_without_text_rejected() {
        let err = record(json!(["i", 0, 0, null])).to_operation(0).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidMetadata { .. }));
    }

    #[test]
    fn delete_with_text_rejected() {
        let err = record(json!(["d", 0, 1, "oops"])).to_operation(0).unwrap_err();
        assert!(matches!(err, ScriptError::InvalidMetadata { .. }));
    }

    #[test]
    fn checksum_tag_detection() {
        assert!(record(json!(["h", "a", "b", null])).is_checksum());
        assert!(!record(json!(["hh", "a", "b", null])).is_checksum());
        assert!(!record(json!(["d", 0, 0, null])).is_checksum());
    }
}
