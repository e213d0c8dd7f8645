use sha2::{Digest as _, Sha256};
use synch_types::Digest;

/// SHA-256 content hasher for text.
///
/// Digests are taken over the UTF-8 encoding of the string with no domain
/// prefix, so they match any other SHA-256 implementation fed the same
/// bytes.
pub struct ContentHasher;

impl ContentHasher {
    /// Digest of a string.
    pub fn digest(text: &str) -> Digest {
        Self::digest_bytes(text.as_bytes())
    }

    /// Digest of raw bytes.
    pub fn digest_bytes(data: &[u8]) -> Digest {
        Digest::from_hash(Sha256::digest(data).into())
    }

    /// Verify that a string produces the expected digest.
    pub fn verify(text: &str, expected: &Digest) -> bool {
        Self::digest(text) == *expected
    }
}
