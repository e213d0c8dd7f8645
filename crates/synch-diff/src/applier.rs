//! Edit script replay with digest verification.

use synch_crypto::ContentHasher;
use synch_types::{Digest, EditOperation, EditScript};
use tracing::{debug, warn};

use crate::config::{SourceCheck, SynchConfig};
use crate::error::{IntegrityStage, SynchError, SynchResult};

/// Reconstructs targets from a source string and an edit script.
#[derive(Clone, Debug, Default)]
pub struct EditScriptApplier {
    source_check: SourceCheck,
}

impl EditScriptApplier {
    pub fn new(config: &SynchConfig) -> Self {
        Self {
            source_check: config.source_check,
        }
    }

    /// Replay `script` against `source`.
    ///
    /// Returns the target only if both the source and the result match the
    /// script's digests. On any error no partial result escapes.
    pub fn apply(&self, source: &str, script: &EditScript) -> SynchResult<String> {
        let (source_digest, target_digest) = script.checksum();

        if self.source_check == SourceCheck::BeforeApply {
            check_digest(IntegrityStage::Source, source_digest, source)?;
        }

        let result = replay(source, script.edits())?;

        if self.source_check == SourceCheck::AfterApply {
            check_digest(IntegrityStage::Source, source_digest, source)?;
        }
        check_digest(IntegrityStage::Target, target_digest, &result)?;

        debug!(
            edits = script.edits().len(),
            target = %target_digest.short_hex(),
            "applied edit script"
        );
        Ok(result)
    }
}

fn check_digest(stage: IntegrityStage, expected: &Digest, text: &str) -> SynchResult<()> {
    if ContentHasher::verify(text, expected) {
        return Ok(());
    }
    let actual = ContentHasher::digest(text);
    warn!(
        %stage,
        expected = %expected.short_hex(),
        actual = %actual.short_hex(),
        "digest mismatch"
    );
    Err(SynchError::Integrity {
        stage,
        expected: *expected,
        actual,
    })
}

/// Apply `edits` in stored order to a char buffer built from `source`.
fn replay(source: &str, edits: &[EditOperation]) -> SynchResult<String> {
    let mut buf: Vec<char> = source.chars().collect();

    for (index, op) in edits.iter().enumerate() {
        let out_of_bounds = |start: usize, end: usize, len: usize| SynchError::OutOfBounds {
            index,
            start,
            end,
            len,
        };
        match op {
            EditOperation::Delete { start, end } => {
                if *start > *end || *end > buf.len() {
                    return Err(out_of_bounds(*start, *end, buf.len()));
                }
                buf.drain(*start..*end);
            }
            EditOperation::Insert { start, end, text } => {
                if *start > buf.len() {
                    return Err(out_of_bounds(*start, *end, buf.len()));
                }
                buf.splice(*start..*start, text.chars());
            }
            EditOperation::Replace { start, end, text } => {
                if *start > *end || *end > buf.len() {
                    return Err(out_of_bounds(*start, *end, buf.len()));
                }
                buf.splice(*start..*end, text.chars());
            }
            // Only the trailing record is a checksum and it is not passed in.
            EditOperation::Checksum { .. } => {}
        }
    }

    Ok(buf.into_iter().collect())
}

/// Apply with a default applier.
pub fn apply(source: &str, script: &EditScript) -> SynchResult<String> {
    EditScriptApplier::default().apply(source, script)
}

/// Composition sugar over [`apply`], usable from either side.
///
/// ```ignore
/// let target = source.compose(&script)?;
/// let target = script.compose(source)?;
/// ```
pub trait Compose<Rhs: ?Sized> {
    fn compose(&self, rhs: &Rhs) -> SynchResult<String>;
}

impl Compose<EditScript> for str {
    fn compose(&self, script: &EditScript) -> SynchResult<String> {
        apply(self, script)
    }
}

impl Compose<str> for EditScript {
    fn compose(&self, source: &str) -> SynchResult<String> {
        apply(source, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build, EditScriptBuilder};
    use crate::config::AlignAlgorithm;

    fn script_with(edits: Vec<EditOperation>, source: &str, target: &str) -> EditScript {
        let mut ops = edits;
        ops.push(EditOperation::Checksum {
            source_digest: ContentHasher::digest(source),
            target_digest: ContentHasher::digest(target),
        });
        EditScript::new(ops).unwrap()
    }

    #[test]
    fn inserts_text() {
        let a = "hello world";
        let b = "hello there world";
        assert_eq!(apply(a, &build(a, b).unwrap()).unwrap(), b);
    }

    #[test]
    fn nested_json_reshape() {
        let a = r#"{"name": "davis", "other": {"age": 18}}"#;
        let b = r#"{"name": "davis", "age": 18}"#;
        let script = build(a, b).unwrap();
        assert!(script.edits().len() > 1);
        assert_eq!(apply(a, &script).unwrap(), b);
    }

    #[test]
    fn empty_source() {
        let script = build("", "new content").unwrap();
        assert_eq!(apply("", &script).unwrap(), "new content");
    }

    #[test]
    fn empty_target() {
        let script = build("abc", "").unwrap();
        assert_eq!(apply("abc", &script).unwrap(), "");
    }

    #[test]
    fn identity() {
        let script = build("same", "same").unwrap();
        assert_eq!(apply("same", &script).unwrap(), "same");
    }

    #[test]
    fn multibyte_text() {
        let a = "naïve café ☃";
        let b = "naive café ☃☃ ok";
        assert_eq!(apply(a, &build(a, b).unwrap()).unwrap(), b);
    }

    #[test]
    fn short_corpus_every_algorithm() {
        let pairs = [
            ("xy", "yxx"),
            ("aຌ", "baa"),
            ("a  ", " a "),
            ("", ""),
            ("", "x"),
            ("x", ""),
            ("ab", "ba"),
            ("aaa", "a"),
            ("abcabc", "cbacba"),
        ];
        for algorithm in [AlignAlgorithm::Myers, AlignAlgorithm::Patience, AlignAlgorithm::Lcs] {
            for deadline_ms in [None, Some(0)] {
                let builder = EditScriptBuilder::new(&SynchConfig {
                    algorithm,
                    deadline_ms,
                    ..SynchConfig::uncached()
                });
                for (a, b) in pairs {
                    let script = builder.build(a, b).unwrap_or_else(|e| {
                        panic!("{algorithm:?} {deadline_ms:?} {a:?} -> {b:?}: {e}")
                    });
                    assert_eq!(apply(a, &script).unwrap(), b, "{algorithm:?} {deadline_ms:?}");
                }
            }
        }
    }

    #[test]
    fn wrong_source_rejected() {
        let script = build("hello world", "hello there world").unwrap();
        let err = apply("hello World", &script).unwrap_err();
        assert!(matches!(
            err,
            SynchError::Integrity { stage: IntegrityStage::Source, .. }
        ));
    }

    #[test]
    fn wrong_source_rejected_after_replay() {
        let applier = EditScriptApplier::new(&SynchConfig {
            source_check: SourceCheck::AfterApply,
            ..SynchConfig::default()
        });
        let script = build("hello world", "hello there world").unwrap();
        let err = applier.apply("hello World", &script).unwrap_err();
        assert!(matches!(
            err,
            SynchError::Integrity { stage: IntegrityStage::Source, .. }
        ));
    }

    #[test]
    fn after_apply_mode_still_reconstructs() {
        let applier = EditScriptApplier::new(&SynchConfig {
            source_check: SourceCheck::AfterApply,
            ..SynchConfig::default()
        });
        let script = build("abc", "abxc").unwrap();
        assert_eq!(applier.apply("abc", &script).unwrap(), "abxc");
    }

    #[test]
    fn tampered_text_detected() {
        let a = "hello world";
        let script = build(a, "hello there world").unwrap();
        let mut records = script.to_metadata();
        records[0].3 = serde_json::Value::String("XXXX".into());
        let tampered = EditScript::from_metadata(records).unwrap();
        let err = apply(a, &tampered).unwrap_err();
        assert!(matches!(
            err,
            SynchError::Integrity { stage: IntegrityStage::Target, .. }
        ));
    }

    #[test]
    fn out_of_range_delete_detected() {
        let script = script_with(vec![EditOperation::Delete { start: 2, end: 9 }], "abc", "ab");
        let err = apply("abc", &script).unwrap_err();
        match err {
            SynchError::OutOfBounds { index, start, end, len } => {
                assert_eq!((index, start, end, len), (0, 2, 9, 3));
            }
            other => panic!("expected OutOfBounds, got {:?}", other),
        }
    }

    #[test]
    fn out_of_range_insert_detected() {
        let script = script_with(
            vec![EditOperation::Insert { start: 4, end: 4, text: "x".into() }],
            "abc",
            "abcx",
        );
        let err = apply("abc", &script).unwrap_err();
        assert!(matches!(err, SynchError::OutOfBounds { .. }));
    }

    #[test]
    fn hand_written_script_replays_in_stored_order() {
        // "abcdef" -> "aXcdY": replace 'b' and the tail, tail first.
        let script = script_with(
            vec![
                EditOperation::Replace { start: 4, end: 6, text: "Y".into() },
                EditOperation::Replace { start: 1, end: 2, text: "X".into() },
            ],
            "abcdef",
            "aXcdY",
        );
        assert_eq!(apply("abcdef", &script).unwrap(), "aXcdY");
    }

    #[test]
    fn insert_ignores_end() {
        let script = script_with(
            vec![EditOperation::Insert { start: 1, end: 3, text: "-".into() }],
            "abc",
            "a-bc",
        );
        assert_eq!(apply("abc", &script).unwrap(), "a-bc");
    }

    #[test]
    fn compose_from_either_side() {
        let script = build("hello world", "hello there world").unwrap();
        assert_eq!("hello world".compose(&script).unwrap(), "hello there world");
        assert_eq!(script.compose("hello world").unwrap(), "hello there world");
        assert!("nope".compose(&script).is_err());
    }
}
