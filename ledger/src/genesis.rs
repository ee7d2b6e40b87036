//! Genesis block creation: the first block of every ledger.
//!
//! The genesis block has `previous_hash: BlockHash::ZERO` (no predecessor)
//! and carries a label rather than a vote. The label is a configuration
//! point: deployments set it to something that names the election, so two
//! elections never share a genesis hash.

use crate::block::{Block, Payload};
use ballot_types::{BlockHash, Timestamp};

/// Label used when the host does not configure one.
pub const DEFAULT_GENESIS_LABEL: &str = "ballot-genesis";

/// Configuration for creating a genesis block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenesisConfig {
    /// Free-form election label embedded in the genesis payload.
    pub label: String,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_GENESIS_LABEL.to_string(),
        }
    }
}

/// Create the genesis block for a given configuration.
///
/// - `index: 0`
/// - `previous_hash: BlockHash::ZERO`
/// - `payload: Payload::Genesis { label }`
/// - hash computed like any other block
pub fn create_genesis_block(config: &GenesisConfig, timestamp: Timestamp) -> Block {
    Block::new(
        0,
        timestamp,
        Payload::Genesis {
            label: config.label.clone(),
        },
        BlockHash::ZERO,
    )
}
