//! LMDB environment setup.

use std::path::Path;

use heed::byteorder::BigEndian;
use heed::types::{Bytes, Str, U64};
use heed::{Database, Env, EnvOpenOptions};

use crate::block::LmdbBlockStore;
use crate::LmdbError;

/// The schema version that the current code writes.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_KEY: &str = "schema_version";

pub(crate) type BlocksDb = Database<U64<BigEndian>, Bytes>;
type MetaDb = Database<Str, Bytes>;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Env,
    blocks: BlocksDb,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// Creates the directory if needed, opens the `blocks` and `meta`
    /// databases, and refuses environments written by a newer schema.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per directory by this
        // process and never by a second `Env` handle concurrently.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let blocks: BlocksDb = env.create_database(&mut wtxn, Some("blocks"))?;
        let meta: MetaDb = env.create_database(&mut wtxn, Some("meta"))?;

        let stored = meta.get(&wtxn, SCHEMA_VERSION_KEY)?.map(decode_version);
        match stored {
            None => {
                meta.put(
                    &mut wtxn,
                    SCHEMA_VERSION_KEY,
                    &CURRENT_SCHEMA_VERSION.to_be_bytes(),
                )?;
                tracing::info!(version = CURRENT_SCHEMA_VERSION, "initialized ledger database");
            }
            Some(found) if found != CURRENT_SCHEMA_VERSION => {
                return Err(LmdbError::SchemaVersion {
                    found,
                    supported: CURRENT_SCHEMA_VERSION,
                });
            }
            Some(_) => {}
        }
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(Self { env, blocks })
    }

    /// Block store backed by this environment.
    pub fn block_store(&self) -> LmdbBlockStore {
        LmdbBlockStore::new(self.env.clone(), self.blocks)
    }

    pub(crate) fn env(&self) -> &Env {
        &self.env
    }

    pub(crate) fn blocks_db(&self) -> BlocksDb {
        self.blocks
    }
}

fn decode_version(raw: &[u8]) -> u32 {
    // A malformed value can never equal the current version, which is all
    // the caller needs to refuse the environment.
    <[u8; 4]>::try_from(raw).map(u32::from_be_bytes).unwrap_or(u32::MAX)
}
