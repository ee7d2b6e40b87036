//! Block storage trait.

use crate::StoreError;

/// Append-only storage of serialized block records, keyed by chain index.
///
/// Implementations must make each [`append_block`](BlockStore::append_block)
/// atomic and durable before returning `Ok`: after a crash the record is
/// either fully present or absent.
pub trait BlockStore: Send + Sync {
    /// Store the record for `index`. Fails with [`StoreError::Duplicate`] if
    /// a record already exists at that index; records are never replaced.
    fn append_block(&self, index: u64, block_bytes: &[u8]) -> Result<(), StoreError>;

    /// All records in ascending index order.
    fn load_blocks(&self) -> Result<Vec<(u64, Vec<u8>)>, StoreError>;

    /// Number of stored records.
    fn block_count(&self) -> Result<u64, StoreError>;
}
