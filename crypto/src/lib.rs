//! Hashing primitives for the ballot ledger.
//!
//! - **Blake2b-256** for every digest in the system
//! - **Block fingerprints**: the hash-chain primitive linking each block to
//!   its predecessor

pub mod chain;
pub mod hash;

pub use chain::{fingerprint, FingerprintInput};
pub use hash::{blake2b_256, blake2b_256_multi};
