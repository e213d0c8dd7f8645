//! Integrity digests for string synchronization.
//!
//! Every edit script records the SHA-256 digest of the string it was built
//! from and of the string it produces. This crate computes and checks those
//! digests. It provides integrity, not authenticity: there is no signing.

pub mod hasher;

pub use hasher::ContentHasher;
