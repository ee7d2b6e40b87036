//! Ledger blocks and their payloads.
//!
//! A block is immutable once built: its hash is computed in [`Block::new`]
//! and the ledger never hands out mutable access.

use ballot_crypto::{fingerprint, FingerprintInput};
use ballot_types::{BlockHash, CandidateId, Timestamp, VoterToken};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

const GENESIS_TAG: u8 = 0x00;
const VOTE_TAG: u8 = 0x01;

/// One vote: who (by token) voted for whom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotePayload {
    pub voter_token: VoterToken,
    pub candidate_id: CandidateId,
}

/// What a block records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Only ever at index 0. The label identifies the election.
    Genesis { label: String },
    Vote(VotePayload),
}

impl Payload {
    /// Canonical byte encoding fed to the fingerprint.
    ///
    /// A tag byte, then each string as a big-endian `u64` length followed
    /// by its UTF-8 bytes. Independent of serde so that changing the
    /// storage encoding can never change a hash.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64);
        match self {
            Payload::Genesis { label } => {
                out.push(GENESIS_TAG);
                put_str(&mut out, label);
            }
            Payload::Vote(vote) => {
                out.push(VOTE_TAG);
                put_str(&mut out, vote.voter_token.as_str());
                put_str(&mut out, vote.candidate_id.as_str());
            }
        }
        out
    }

    pub fn as_vote(&self) -> Option<&VotePayload> {
        match self {
            Payload::Vote(vote) => Some(vote),
            Payload::Genesis { .. } => None,
        }
    }
}

fn put_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u64).to_be_bytes());
    out.extend_from_slice(s.as_bytes());
}

/// A ledger entry.
///
/// Field order is the persisted field order; bincode encodes structs
/// field by field, so reordering these would break stored ledgers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: Timestamp,
    pub payload: Payload,
    /// Hash of the previous block; [`BlockHash::ZERO`] for genesis.
    pub previous_hash: BlockHash,
    pub hash: BlockHash,
}

impl Block {
    /// Build a block and compute its hash.
    pub fn new(
        index: u64,
        timestamp: Timestamp,
        payload: Payload,
        previous_hash: BlockHash,
    ) -> Self {
        let mut block = Self {
            index,
            timestamp,
            payload,
            previous_hash,
            hash: BlockHash::ZERO,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Recompute the fingerprint from this block's own fields.
    pub fn compute_hash(&self) -> BlockHash {
        let payload = self.payload.canonical_bytes();
        fingerprint(FingerprintInput {
            index: self.index,
            timestamp: self.timestamp,
            payload: &payload,
            previous_hash: &self.previous_hash,
        })
    }

    /// Whether the stored hash matches the recomputed one.
    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn is_genesis(&self) -> bool {
        matches!(self.payload, Payload::Genesis { .. })
    }

    pub fn vote(&self) -> Option<&VotePayload> {
        self.payload.as_vote()
    }

    /// Serialize to the persisted record format (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Decode a persisted record. `index` is the storage key, used only to
    /// label the error.
    pub fn from_bytes(index: u64, bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::CorruptStorage {
            index,
            reason: e.to_string(),
        })
    }
}
