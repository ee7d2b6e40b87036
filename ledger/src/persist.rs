//! Loading and saving the ledger through a [`BlockStore`].
//!
//! Records are bincode-encoded [`Block`]s keyed by index. Loading is strict:
//! every record from 0 up must be present and decodable, otherwise the load
//! fails with [`LedgerError::CorruptStorage`]. Nothing is skipped.

use std::sync::Arc;

use ballot_store::BlockStore;
use ballot_types::Clock;

use crate::block::{Block, Payload};
use crate::chain::Ledger;
use crate::error::LedgerError;
use crate::genesis::GenesisConfig;

/// Durably store one block. Called before the block becomes visible in memory.
pub fn persist_block(store: &dyn BlockStore, block: &Block) -> Result<(), LedgerError> {
    let bytes = block.to_bytes()?;
    store.append_block(block.index, &bytes)?;
    Ok(())
}

/// Decode raw `(index, bytes)` records into blocks, requiring keys 0, 1, 2, ...
pub fn decode_records(records: Vec<(u64, Vec<u8>)>) -> Result<Vec<Block>, LedgerError> {
    let mut blocks = Vec::with_capacity(records.len());
    for (position, (key, bytes)) in records.into_iter().enumerate() {
        let expected = position as u64;
        if key != expected {
            return Err(LedgerError::CorruptStorage {
                index: expected,
                reason: format!("record missing, next stored key is {key}"),
            });
        }
        blocks.push(Block::from_bytes(key, &bytes)?);
    }
    Ok(blocks)
}

/// Open the ledger held by `store`, creating and persisting a genesis block
/// if the store is empty.
pub fn load_or_init(
    store: &dyn BlockStore,
    genesis: &GenesisConfig,
    clock: Arc<dyn Clock>,
) -> Result<Ledger, LedgerError> {
    let records = store.load_blocks()?;
    if records.is_empty() {
        let ledger = Ledger::new(genesis, clock);
        persist_block(store, ledger.genesis())?;
        tracing::info!(
            label = %genesis.label,
            genesis = %ledger.genesis().hash.short(),
            "created new ledger"
        );
        return Ok(ledger);
    }

    let blocks = decode_records(records)?;
    let ledger = Ledger::from_blocks(blocks, clock)?;
    if let Payload::Genesis { label } = &ledger.genesis().payload {
        if label != &genesis.label {
            tracing::warn!(
                stored = %label,
                configured = %genesis.label,
                "stored genesis label differs from configuration"
            );
        }
    }
    tracing::info!(
        height = ledger.height(),
        head = %ledger.head().hash.short(),
        "loaded ledger"
    );
    Ok(ledger)
}
