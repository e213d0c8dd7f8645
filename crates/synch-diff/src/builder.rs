//! Edit script construction.
//!
//! Opcodes from the aligner are walked from the end of the source toward
//! the start, so the emitted operations can be replayed in stored order
//! without index fix-ups. The checksum record always goes last.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use synch_crypto::ContentHasher;
use synch_types::{Digest, EditOperation, EditScript};
use tracing::debug;

use crate::align::{validate_opcodes, Aligner, Opcode, OpcodeTag, SimilarAligner};
use crate::cache::{CacheStats, ScriptCache};
use crate::config::SynchConfig;
use crate::error::SynchResult;

/// Builds edit scripts between pairs of strings.
pub struct EditScriptBuilder {
    aligner: Arc<dyn Aligner>,
    cache: Option<ScriptCache>,
}

impl EditScriptBuilder {
    /// Builder using the `similar` aligner configured from `config`.
    pub fn new(config: &SynchConfig) -> Self {
        let aligner = SimilarAligner::new(
            config.algorithm,
            config.deadline_ms.map(Duration::from_millis),
        );
        Self::with_aligner(Arc::new(aligner), config)
    }

    /// Builder using a caller-supplied aligner.
    pub fn with_aligner(aligner: Arc<dyn Aligner>, config: &SynchConfig) -> Self {
        Self {
            aligner,
            cache: NonZeroUsize::new(config.cache_capacity).map(ScriptCache::new),
        }
    }

    /// Compute the script turning `source` into `target`.
    pub fn build(&self, source: &str, target: &str) -> SynchResult<EditScript> {
        let source_digest = ContentHasher::digest(source);
        let target_digest = ContentHasher::digest(target);

        if let Some(cache) = &self.cache {
            if let Some(script) = cache.get(&source_digest, &target_digest) {
                debug!(edits = script.edits().len(), "edit script cache hit");
                return Ok(script);
            }
        }

        let script = self.compute(source, target, source_digest, target_digest)?;
        debug!(
            edits = script.edits().len(),
            source = %source_digest.short_hex(),
            target = %target_digest.short_hex(),
            "built edit script"
        );

        if let Some(cache) = &self.cache {
            cache.insert(source_digest, target_digest, script.clone());
        }
        Ok(script)
    }

    /// The memoization cache, if enabled.
    pub fn cache(&self) -> Option<&ScriptCache> {
        self.cache.as_ref()
    }

    /// Cache counters; zero when caching is disabled.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.as_ref().map(ScriptCache::stats).unwrap_or_default()
    }

    fn compute(
        &self,
        source: &str,
        target: &str,
        source_digest: Digest,
        target_digest: Digest,
    ) -> SynchResult<EditScript> {
        let old: Vec<char> = source.chars().collect();
        let new: Vec<char> = target.chars().collect();
        let opcodes = self.aligner.opcodes(&old, &new)?;
        validate_opcodes(&opcodes, &old, &new)?;

        let mut ops = emit_operations(&opcodes, &new);
        ops.push(EditOperation::Checksum {
            source_digest,
            target_digest,
        });
        Ok(EditScript::new(ops)?)
    }
}

impl Default for EditScriptBuilder {
    fn default() -> Self {
        Self::new(&SynchConfig::default())
    }
}

impl std::fmt::Debug for EditScriptBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditScriptBuilder")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Turn forward opcodes into operations, last opcode first.
fn emit_operations(opcodes: &[Opcode], new: &[char]) -> Vec<EditOperation> {
    opcodes
        .iter()
        .rev()
        .filter_map(|op| {
            let (start, end) = (op.old.start, op.old.end);
            match op.tag {
                OpcodeTag::Equal => None,
                OpcodeTag::Delete => Some(EditOperation::Delete { start, end }),
                OpcodeTag::Insert => Some(EditOperation::Insert {
                    start,
                    end,
                    text: new[op.new.clone()].iter().collect(),
                }),
                OpcodeTag::Replace => Some(EditOperation::Replace {
                    start,
                    end,
                    text: new[op.new.clone()].iter().collect(),
                }),
            }
        })
        .collect()
}

/// Build a script with an uncached default builder.
pub fn build(source: &str, target: &str) -> SynchResult<EditScript> {
    EditScriptBuilder::new(&SynchConfig::uncached()).build(source, target)
}
