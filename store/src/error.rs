use thiserror::Error;

/// Failures a [`BlockStore`](crate::BlockStore) can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record already exists at this index. Records are write-once.
    #[error("block {0} is already stored")]
    Duplicate(u64),

    #[error("storage backend error: {0}")]
    Backend(String),
}
