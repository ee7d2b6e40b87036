//! The hash-chain primitive.
//!
//! A block's fingerprint covers its own content and its predecessor's
//! fingerprint, so rewriting any block invalidates every block after it:
//!
//! ```text
//! hash = blake2b_256(index_be || timestamp_be || payload || previous_hash)
//! ```
//!
//! Integers are fixed-width big-endian and `previous_hash` is always 32
//! bytes, so the variable-length payload in between cannot be confused with
//! its neighbours. The payload bytes must already be in canonical form.

use crate::hash::blake2b_256_multi;
use ballot_types::{BlockHash, Timestamp};

/// The fields a fingerprint is computed over.
#[derive(Clone, Copy, Debug)]
pub struct FingerprintInput<'a> {
    pub index: u64,
    pub timestamp: Timestamp,
    /// Canonical payload encoding.
    pub payload: &'a [u8],
    pub previous_hash: &'a BlockHash,
}

/// Compute the fingerprint of a block. Pure and infallible.
pub fn fingerprint(input: FingerprintInput<'_>) -> BlockHash {
    let index = input.index.to_be_bytes();
    let timestamp = input.timestamp.as_secs().to_be_bytes();
    BlockHash::new(blake2b_256_multi(&[
        &index,
        &timestamp,
        input.payload,
        input.previous_hash.as_bytes(),
    ]))
}
