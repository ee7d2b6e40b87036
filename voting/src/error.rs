use ballot_ledger::LedgerError;
use ballot_types::{CandidateId, VoterToken};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoteError {
    #[error("voter token has already been used")]
    DuplicateVote,

    #[error("unknown candidate: {0}")]
    UnknownCandidate(CandidateId),

    #[error("vote could not be recorded: {0}")]
    Storage(#[from] LedgerError),

    #[error("stored ledger uses token {token} twice (blocks {first} and {second})")]
    CorruptStorage {
        token: VoterToken,
        first: u64,
        second: u64,
    },
}
