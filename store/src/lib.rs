//! Abstract storage traits for the ballot ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits and works
//! with opaque serialized block records.

pub mod block;
pub mod error;

pub use block::BlockStore;
pub use error::StoreError;
