//! Hash-chained vote ledger.
//!
//! A single ordered chain of blocks, one vote per block. Every block's hash
//! covers its own fields and its predecessor's hash, so editing any past
//! vote is detectable by recomputing the chain from genesis.
//!
//! The ledger is a plain owned value; whoever hosts it decides how it is
//! shared and locked.

pub mod audit;
pub mod block;
pub mod chain;
pub mod error;
pub mod genesis;
pub mod persist;

pub use audit::{AuditReport, IntegrityAuditor};
pub use block::{Block, Payload, VotePayload};
pub use chain::{Ledger, LedgerSummary};
pub use error::{LedgerError, TamperKind, TamperReport};
pub use genesis::{create_genesis_block, GenesisConfig, DEFAULT_GENESIS_LABEL};
pub use persist::{decode_records, load_or_init, persist_block};
