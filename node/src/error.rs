use ballot_ledger::TamperKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("ledger error: {0}")]
    Ledger(#[from] ballot_ledger::LedgerError),

    #[error("vote error: {0}")]
    Vote(#[from] ballot_voting::VoteError),

    #[error("store error: {0}")]
    Store(#[from] ballot_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] ballot_store_lmdb::LmdbError),

    #[error("invalid input: {0}")]
    InvalidInput(#[from] ballot_types::BallotError),

    #[error("ledger integrity check failed at block {index}: {kind}")]
    Tampered { index: u64, kind: TamperKind },

    #[error("config error: {0}")]
    Config(String),
}
