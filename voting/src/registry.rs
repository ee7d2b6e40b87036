//! The consumed-token registry.

use std::collections::HashMap;

use ballot_ledger::{Block, Ledger, LedgerError, VotePayload};
use ballot_types::{CandidateId, VoterToken};

use crate::error::VoteError;
use crate::policy::{CandidateRoster, TokenPolicy};

/// Tracks spent voter tokens and admits each token's vote exactly once.
///
/// The registry and the ledger it feeds must be mutated together, under a
/// single writer. Tokens are never removed.
#[derive(Debug)]
pub struct VoteRegistry {
    /// Normalized token -> index of the block holding its vote.
    used: HashMap<VoterToken, u64>,
    policy: TokenPolicy,
    roster: CandidateRoster,
}

impl VoteRegistry {
    pub fn new(policy: TokenPolicy, roster: CandidateRoster) -> Self {
        Self {
            used: HashMap::new(),
            policy,
            roster,
        }
    }

    /// Reconstruct the spent set from a loaded, verified ledger.
    ///
    /// A token that appears in two blocks (after normalization) means the
    /// stored ledger was not produced by this registry, and is rejected.
    pub fn rebuild(
        ledger: &Ledger,
        policy: TokenPolicy,
        roster: CandidateRoster,
    ) -> Result<Self, VoteError> {
        let mut registry = Self::new(policy, roster);
        for (index, vote) in ledger.votes() {
            let token = policy.normalize(vote.voter_token.clone());
            if let Some(&first) = registry.used.get(&token) {
                return Err(VoteError::CorruptStorage {
                    token,
                    first,
                    second: index,
                });
            }
            registry.used.insert(token, index);
        }
        tracing::debug!(tokens = registry.used.len(), "vote registry rebuilt");
        Ok(registry)
    }

    /// Reconstruct the spent set from a ledger that failed verification.
    ///
    /// Repeated tokens are expected in a tampered chain, so the first
    /// block wins and later repeats are only logged. The result is good
    /// enough to answer status queries while the damage is investigated.
    pub fn rebuild_unverified(
        ledger: &Ledger,
        policy: TokenPolicy,
        roster: CandidateRoster,
    ) -> Self {
        let mut registry = Self::new(policy, roster);
        for (index, vote) in ledger.votes() {
            let token = policy.normalize(vote.voter_token.clone());
            if let Some(&first) = registry.used.get(&token) {
                tracing::warn!(first, second = index, "token repeated in unverified ledger");
                continue;
            }
            registry.used.insert(token, index);
        }
        registry
    }

    pub fn is_used(&self, token: &VoterToken) -> bool {
        self.used
            .contains_key(&self.policy.normalize(token.clone()))
    }

    /// Index of the block holding this token's vote.
    pub fn block_of(&self, token: &VoterToken) -> Option<u64> {
        self.used
            .get(&self.policy.normalize(token.clone()))
            .copied()
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    pub fn policy(&self) -> TokenPolicy {
        self.policy
    }

    pub fn roster(&self) -> &CandidateRoster {
        &self.roster
    }

    /// Spend `token` on a vote for `candidate` and append it to `ledger`.
    ///
    /// On `DuplicateVote` or `UnknownCandidate` neither the registry nor
    /// the ledger is touched.
    pub fn register_and_cast(
        &mut self,
        token: VoterToken,
        candidate: CandidateId,
        ledger: &mut Ledger,
    ) -> Result<Block, VoteError> {
        self.register_and_cast_durable(token, candidate, ledger, |_| Ok(()))
    }

    /// Like [`register_and_cast`](Self::register_and_cast), but hands the
    /// new block to `persist` before anything changes in memory.
    ///
    /// If `persist` fails the error is returned and the token stays unused,
    /// so memory never runs ahead of storage.
    pub fn register_and_cast_durable<F>(
        &mut self,
        token: VoterToken,
        candidate: CandidateId,
        ledger: &mut Ledger,
        persist: F,
    ) -> Result<Block, VoteError>
    where
        F: FnOnce(&Block) -> Result<(), LedgerError>,
    {
        let token = self.policy.normalize(token);
        if let Some(&index) = self.used.get(&token) {
            tracing::warn!(block = index, "rejected duplicate vote");
            return Err(VoteError::DuplicateVote);
        }
        if !self.roster.admits(&candidate) {
            tracing::warn!(candidate = %candidate, "rejected vote for unknown candidate");
            return Err(VoteError::UnknownCandidate(candidate));
        }

        let block = ledger.next_block(VotePayload {
            voter_token: token.clone(),
            candidate_id: candidate,
        });
        persist(&block).inspect_err(|e| {
            tracing::error!(index = block.index, error = %e, "failed to persist vote block");
        })?;
        ledger.commit(block.clone())?;
        self.used.insert(token, block.index);
        Ok(block)
    }
}
