//! Admission policy knobs: token matching and the candidate roster.

use ballot_types::{CandidateId, VoterToken};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How voter tokens are compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPolicy {
    /// When `false`, tokens are ASCII-lowercased before they are checked
    /// and before they are written into the ledger.
    pub case_sensitive: bool,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            case_sensitive: true,
        }
    }
}

impl TokenPolicy {
    /// The form of `token` that is checked and recorded.
    pub fn normalize(&self, token: VoterToken) -> VoterToken {
        if self.case_sensitive {
            token
        } else {
            token.to_ascii_lowercase()
        }
    }
}

/// The candidates a vote may name. An empty roster admits any candidate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateRoster {
    candidates: BTreeSet<CandidateId>,
}

impl CandidateRoster {
    /// A roster that admits every candidate id.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn new(candidates: impl IntoIterator<Item = CandidateId>) -> Self {
        Self {
            candidates: candidates.into_iter().collect(),
        }
    }

    pub fn admits(&self, candidate: &CandidateId) -> bool {
        self.candidates.is_empty() || self.candidates.contains(candidate)
    }

    pub fn candidates(&self) -> impl Iterator<Item = &CandidateId> {
        self.candidates.iter()
    }
}
