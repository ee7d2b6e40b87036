//! Fundamental types for the ballot ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! block hashes, timestamps, the clock seam, and the vote identifiers
//! (voter tokens and candidate ids).

pub mod block;
pub mod error;
pub mod hash;
pub mod time;
pub mod vote;

pub use block::BlockHash;
pub use error::BallotError;
pub use hash::short_hex;
pub use time::{Clock, SystemClock, Timestamp};
pub use vote::{CandidateId, VoterToken};
