//! LMDB implementation of BlockStore.

use ballot_store::{BlockStore, StoreError};
use heed::Env;

use crate::environment::BlocksDb;
use crate::LmdbError;

/// Block records in the `blocks` database. Each append is its own write
/// transaction; LMDB syncs on commit, so `Ok` means durable.
pub struct LmdbBlockStore {
    env: Env,
    blocks: BlocksDb,
}

impl LmdbBlockStore {
    pub(crate) fn new(env: Env, blocks: BlocksDb) -> Self {
        Self { env, blocks }
    }
}

impl BlockStore for LmdbBlockStore {
    fn append_block(&self, index: u64, block_bytes: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .blocks
            .get(&wtxn, &index)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(index));
        }
        self.blocks
            .put(&mut wtxn, &index, block_bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(index, bytes = block_bytes.len(), "block record committed");
        Ok(())
    }

    fn load_blocks(&self) -> Result<Vec<(u64, Vec<u8>)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for entry in self.blocks.iter(&rtxn).map_err(LmdbError::from)? {
            let (index, bytes) = entry.map_err(LmdbError::from)?;
            out.push((index, bytes.to_vec()));
        }
        Ok(out)
    }

    fn block_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.blocks.len(&rtxn).map_err(LmdbError::from)?)
    }
}
