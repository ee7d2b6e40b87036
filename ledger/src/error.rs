use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("corrupt storage at block {index}: {reason}")]
    CorruptStorage { index: u64, reason: String },

    #[error("stale block {index}: ledger head is now at height {height}")]
    StaleBlock { index: u64, height: u64 },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(#[from] ballot_store::StoreError),
}

/// Which of the two per-block checks failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TamperKind {
    /// The stored hash differs from the hash recomputed from the block's fields.
    SelfHashMismatch,
    /// The stored previous-hash differs from the prior block's stored hash.
    ChainLinkMismatch,
}

impl fmt::Display for TamperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TamperKind::SelfHashMismatch => f.write_str("self-hash mismatch"),
            TamperKind::ChainLinkMismatch => f.write_str("chain-link mismatch"),
        }
    }
}

/// The first point of tampering found by [`Ledger::verify`](crate::Ledger::verify).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("tampering detected at block {index}: {kind}")]
pub struct TamperReport {
    /// Chain position of the offending block.
    pub index: u64,
    pub kind: TamperKind,
}
