//! Sequence alignment: the opcode primitive the builder is layered on.
//!
//! The default [`SimilarAligner`] uses the `similar` crate. Any other
//! implementation can be plugged into the builder through [`Aligner`].

use std::ops::Range;
use std::time::{Duration, Instant};

use similar::DiffTag;
use tracing::{debug, warn};

use crate::config::AlignAlgorithm;
use crate::error::{SynchError, SynchResult};

/// Kind of an alignment unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpcodeTag {
    Equal,
    Delete,
    Insert,
    Replace,
}

/// One alignment unit: `old[old]` becomes `new[new]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpcodeTag,
    pub old: Range<usize>,
    pub new: Range<usize>,
}

impl Opcode {
    pub fn new(tag: OpcodeTag, old: Range<usize>, new: Range<usize>) -> Self {
        Self { tag, old, new }
    }
}

/// Computes an opcode sequence turning `old` into `new`.
///
/// Opcodes must be in forward order and together cover both inputs end to
/// end without gaps; the builder rejects anything else.
pub trait Aligner: Send + Sync {
    fn opcodes(&self, old: &[char], new: &[char]) -> SynchResult<Vec<Opcode>>;
}

/// Aligner backed by `similar`.
///
/// `similar` can report stale positions (a trailing delete's new-side index,
/// or overlapping ranges once a deadline has passed). Only the tag and the
/// per-side lengths of its ops are used; positions are recomputed from a
/// running cursor and the result is checked against both inputs. An
/// alignment that still fails the check is retried without the deadline,
/// then replaced by a single whole-range edit.
#[derive(Clone, Debug, Default)]
pub struct SimilarAligner {
    algorithm: AlignAlgorithm,
    deadline: Option<Duration>,
}

impl SimilarAligner {
    pub fn new(algorithm: AlignAlgorithm, deadline: Option<Duration>) -> Self {
        Self {
            algorithm,
            deadline,
        }
    }

    fn capture(&self, old: &[char], new: &[char], deadline: Option<Instant>) -> Vec<Opcode> {
        let ops = similar::capture_diff_slices_deadline(self.algorithm.into(), old, new, deadline);
        let mut old_pos = 0;
        let mut new_pos = 0;
        ops.iter()
            .map(|op| {
                let (tag, old_range, new_range) = op.as_tag_tuple();
                let tag = match tag {
                    DiffTag::Equal => OpcodeTag::Equal,
                    DiffTag::Delete => OpcodeTag::Delete,
                    DiffTag::Insert => OpcodeTag::Insert,
                    DiffTag::Replace => OpcodeTag::Replace,
                };
                let old = old_pos..old_pos + old_range.len();
                let new = new_pos..new_pos + new_range.len();
                old_pos = old.end;
                new_pos = new.end;
                Opcode::new(tag, old, new)
            })
            .collect()
    }
}

impl Aligner for SimilarAligner {
    fn opcodes(&self, old: &[char], new: &[char]) -> SynchResult<Vec<Opcode>> {
        if let Some(limit) = self.deadline {
            let ops = self.capture(old, new, Some(Instant::now() + limit));
            match validate_opcodes(&ops, old, new) {
                Ok(()) => return Ok(ops),
                Err(e) => debug!(error = %e, "deadline alignment rejected; retrying without deadline"),
            }
        }

        let ops = self.capture(old, new, None);
        match validate_opcodes(&ops, old, new) {
            Ok(()) => Ok(ops),
            Err(e) => {
                warn!(error = %e, "alignment rejected; using a whole-range edit");
                Ok(whole_range(old.len(), new.len()))
            }
        }
    }
}

/// The trivial alignment: one opcode covering both inputs entirely.
pub fn whole_range(old_len: usize, new_len: usize) -> Vec<Opcode> {
    let tag = match (old_len, new_len) {
        (0, 0) => return Vec::new(),
        (_, 0) => OpcodeTag::Delete,
        (0, _) => OpcodeTag::Insert,
        _ => OpcodeTag::Replace,
    };
    vec![Opcode::new(tag, 0..old_len, 0..new_len)]
}

/// Check that `opcodes` tile `old` and `new` contiguously, that each tag
/// agrees with its range lengths, and that equal runs really are equal.
pub fn validate_opcodes(opcodes: &[Opcode], old: &[char], new: &[char]) -> SynchResult<()> {
    let mut old_pos = 0;
    let mut new_pos = 0;

    for (i, op) in opcodes.iter().enumerate() {
        if op.old.start != old_pos || op.new.start != new_pos {
            return Err(SynchError::Alignment(format!(
                "opcode {i} starts at ({}, {}), expected ({old_pos}, {new_pos})",
                op.old.start, op.new.start
            )));
        }
        if op.old.end < op.old.start || op.new.end < op.new.start {
            return Err(SynchError::Alignment(format!("opcode {i} has an inverted range")));
        }
        if op.old.end > old.len() || op.new.end > new.len() {
            return Err(SynchError::Alignment(format!(
                "opcode {i} runs past the end of the input"
            )));
        }

        let consistent = match op.tag {
            OpcodeTag::Equal => old[op.old.clone()] == new[op.new.clone()],
            OpcodeTag::Delete => op.new.is_empty() && !op.old.is_empty(),
            OpcodeTag::Insert => op.old.is_empty() && !op.new.is_empty(),
            OpcodeTag::Replace => !op.old.is_empty() && !op.new.is_empty(),
        };
        if !consistent {
            return Err(SynchError::Alignment(format!(
                "opcode {i} ({:?}) does not match ranges {:?} / {:?}",
                op.tag, op.old, op.new
            )));
        }

        old_pos = op.old.end;
        new_pos = op.new.end;
    }

    if old_pos != old.len() || new_pos != new.len() {
        return Err(SynchError::Alignment(format!(
            "opcodes cover ({old_pos}, {new_pos}), inputs are ({}, {})",
            old.len(),
            new.len()
        )));
    }
    Ok(())
}
