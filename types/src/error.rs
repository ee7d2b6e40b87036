//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while constructing the shared value types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BallotError {
    #[error("voter token must not be empty")]
    EmptyToken,

    #[error("candidate id must not be empty")]
    EmptyCandidate,
}
