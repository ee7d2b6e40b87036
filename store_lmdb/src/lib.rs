//! LMDB storage backend for the ballot ledger.
//!
//! Implements the `ballot-store` traits using the `heed` LMDB bindings.
//! Block records live in a single `blocks` database keyed by big-endian
//! chain index, so LMDB's key order is chain order.

pub mod block;
pub mod environment;
pub mod error;
pub mod integrity;

pub use block::LmdbBlockStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
