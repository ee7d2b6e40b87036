//! Nullable store: thread-safe in-memory block storage for testing.

use ballot_store::{BlockStore, StoreError};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// An in-memory block store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullStore {
    blocks: Mutex<BTreeMap<u64, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            blocks: Mutex::new(BTreeMap::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `append_block` fail with a backend error, as a
    /// full disk or I/O fault would.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Replace a stored record behind the ledger's back. Simulates someone
    /// editing the database directly.
    pub fn overwrite(&self, index: u64, block_bytes: Vec<u8>) {
        self.blocks.lock().unwrap().insert(index, block_bytes);
    }

    /// Raw record at `index`.
    pub fn record(&self, index: u64) -> Option<Vec<u8>> {
        self.blocks.lock().unwrap().get(&index).cloned()
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockStore for NullStore {
    fn append_block(&self, index: u64, block_bytes: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("simulated write failure".into()));
        }
        let mut blocks = self.blocks.lock().unwrap();
        if blocks.contains_key(&index) {
            return Err(StoreError::Duplicate(index));
        }
        blocks.insert(index, block_bytes.to_vec());
        Ok(())
    }

    fn load_blocks(&self) -> Result<Vec<(u64, Vec<u8>)>, StoreError> {
        Ok(self
            .blocks
            .lock()
            .unwrap()
            .iter()
            .map(|(index, bytes)| (*index, bytes.clone()))
            .collect())
    }

    fn block_count(&self) -> Result<u64, StoreError> {
        Ok(self.blocks.lock().unwrap().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_load() {
        let store = NullStore::new();
        store.append_block(1, b"one").unwrap();
        store.append_block(0, b"zero").unwrap();
        let loaded = store.load_blocks().unwrap();
        assert_eq!(loaded, vec![(0, b"zero".to_vec()), (1, b"one".to_vec())]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let store = NullStore::new();
        store.append_block(0, b"a").unwrap();
        assert!(matches!(
            store.append_block(0, b"b"),
            Err(StoreError::Duplicate(0))
        ));
    }

    #[test]
    fn test_fail_writes() {
        let store = NullStore::new();
        store.fail_writes(true);
        assert!(store.append_block(0, b"a").is_err());
        assert_eq!(store.block_count().unwrap(), 0);
        store.fail_writes(false);
        assert!(store.append_block(0, b"a").is_ok());
    }

    #[test]
    fn test_overwrite() {
        let store = NullStore::new();
        store.append_block(0, b"a").unwrap();
        store.overwrite(0, b"b".to_vec());
        assert_eq!(store.record(0), Some(b"b".to_vec()));
    }
}
