//! The ledger: an ordered, hash-linked sequence of blocks.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use ballot_types::{BlockHash, CandidateId, Clock, Timestamp};
use serde::{Deserialize, Serialize};

use crate::block::{Block, Payload, VotePayload};
use crate::error::{LedgerError, TamperKind, TamperReport};
use crate::genesis::{create_genesis_block, GenesisConfig};

/// Ordered chain of blocks, genesis first.
///
/// The only mutators are [`append`](Ledger::append) and
/// [`commit`](Ledger::commit); both extend the chain by exactly one block
/// linked to the current head. Blocks are never edited, removed or
/// reordered.
pub struct Ledger {
    blocks: Vec<Block>,
    clock: Arc<dyn Clock>,
}

/// Summary statistics for the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Number of blocks including genesis.
    pub height: u64,
    /// Number of vote blocks.
    pub votes: u64,
    pub head_hash: BlockHash,
    pub head_timestamp: Timestamp,
}

impl Ledger {
    /// A ledger holding only a freshly built genesis block.
    pub fn new(genesis: &GenesisConfig, clock: Arc<dyn Clock>) -> Self {
        let block = create_genesis_block(genesis, clock.now());
        Self {
            blocks: vec![block],
            clock,
        }
    }

    /// Rebuild a ledger from previously persisted blocks, in chain order.
    ///
    /// Hashes are *not* checked here: a tampered chain must still load so
    /// that [`verify`](Ledger::verify) can report where it was altered.
    pub fn from_blocks(blocks: Vec<Block>, clock: Arc<dyn Clock>) -> Result<Self, LedgerError> {
        if blocks.is_empty() {
            return Err(LedgerError::CorruptStorage {
                index: 0,
                reason: "no genesis block".into(),
            });
        }
        Ok(Self { blocks, clock })
    }

    /// Build the block that would follow the current head, without
    /// changing the ledger.
    ///
    /// The new index is the head's position plus one, never the head's
    /// stored `index` field, which a tampered record may have changed.
    /// The timestamp is the clock reading, clamped so it never goes
    /// backwards relative to the head.
    pub fn next_block(&self, vote: VotePayload) -> Block {
        let head = self.head();
        let timestamp = self.clock.now().max(head.timestamp);
        Block::new(self.height(), timestamp, Payload::Vote(vote), head.hash)
    }

    /// Append a vote as a new block and return it. Never fails.
    pub fn append(&mut self, vote: VotePayload) -> Block {
        let block = self.next_block(vote);
        self.blocks.push(block.clone());
        tracing::debug!(index = block.index, hash = %block.hash.short(), "block appended");
        block
    }

    /// Push a block previously built with [`next_block`](Ledger::next_block).
    ///
    /// Rejects the block if it no longer extends the head, which happens
    /// only if something else appended in between.
    pub fn commit(&mut self, block: Block) -> Result<(), LedgerError> {
        let head = self.head();
        if block.index != self.height() || block.previous_hash != head.hash {
            return Err(LedgerError::StaleBlock {
                index: block.index,
                height: self.height(),
            });
        }
        tracing::debug!(index = block.index, hash = %block.hash.short(), "block committed");
        self.blocks.push(block);
        Ok(())
    }

    /// Verify the whole chain from genesis.
    ///
    /// Every block's hash is recomputed from its fields and compared with
    /// the stored hash, then its previous-hash is compared with the prior
    /// block's stored hash (the zero sentinel for genesis). Stops at the
    /// first failure.
    pub fn verify(&self) -> Result<(), TamperReport> {
        let mut expected_previous = BlockHash::ZERO;
        for (position, block) in self.blocks.iter().enumerate() {
            let index = position as u64;
            if block.compute_hash() != block.hash {
                return Err(TamperReport {
                    index,
                    kind: TamperKind::SelfHashMismatch,
                });
            }
            if block.previous_hash != expected_previous {
                return Err(TamperReport {
                    index,
                    kind: TamperKind::ChainLinkMismatch,
                });
            }
            expected_previous = block.hash;
        }
        Ok(())
    }

    /// Vote counts per candidate.
    ///
    /// This trusts the stored payloads. Callers must run
    /// [`verify`](Ledger::verify) (or an audit) first and only present the
    /// result if the chain is intact; the ledger does not check.
    pub fn tally(&self) -> BTreeMap<CandidateId, u64> {
        let mut counts = BTreeMap::new();
        for (_, vote) in self.votes() {
            *counts.entry(vote.candidate_id.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Vote blocks in chain order, with their positions in the chain.
    pub fn votes(&self) -> impl Iterator<Item = (u64, &VotePayload)> {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(position, block)| block.vote().map(|vote| (position as u64, vote)))
    }

    pub fn head(&self) -> &Block {
        // `blocks` always holds at least the genesis block.
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks including genesis.
    pub fn height(&self) -> u64 {
        self.blocks.len() as u64
    }

    pub fn summary(&self) -> LedgerSummary {
        let head = self.head();
        LedgerSummary {
            height: self.height(),
            votes: self.votes().count() as u64,
            head_hash: head.hash,
            head_timestamp: head.timestamp,
        }
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("height", &self.height())
            .field("head", &self.head().hash)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_nullables::NullClock;
    use ballot_types::VoterToken;

    fn vote(token: &str, candidate: &str) -> VotePayload {
        VotePayload {
            voter_token: VoterToken::new(token).unwrap(),
            candidate_id: CandidateId::new(candidate).unwrap(),
        }
    }

    fn ledger_at(secs: u64) -> (Arc<NullClock>, Ledger) {
        let clock = Arc::new(NullClock::new(secs));
        let ledger = Ledger::new(&GenesisConfig::default(), clock.clone());
        (clock, ledger)
    }

    fn candidate(name: &str) -> CandidateId {
        CandidateId::new(name).unwrap()
    }

    #[test]
    fn new_ledger_is_genesis_only_and_verifies() {
        let (_, ledger) = ledger_at(1_000);
        assert_eq!(ledger.height(), 1);
        assert!(ledger.head().is_genesis());
        assert_eq!(ledger.verify(), Ok(()));
        assert!(ledger.tally().is_empty());
    }

    #[test]
    fn append_links_to_head() {
        let (_, mut ledger) = ledger_at(1_000);
        let genesis_hash = ledger.head().hash;
        let block = ledger.append(vote("t1", "Alice"));

        assert_eq!(block.index, 1);
        assert_eq!(block.previous_hash, genesis_hash);
        assert_eq!(ledger.head(), &block);
        assert_eq!(ledger.verify(), Ok(()));
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let (clock, mut ledger) = ledger_at(1_000);
        ledger.append(vote("t1", "Alice"));
        clock.set(500);
        let block = ledger.append(vote("t2", "Bob"));
        assert_eq!(block.timestamp, Timestamp::new(1_000));

        clock.advance(1_000);
        let later = ledger.append(vote("t3", "Bob"));
        assert_eq!(later.timestamp, Timestamp::new(1_500));
    }

    #[test]
    fn tally_counts_votes_not_genesis() {
        let (_, mut ledger) = ledger_at(1_000);
        ledger.append(vote("t1", "A"));
        ledger.append(vote("t2", "A"));
        ledger.append(vote("t3", "B"));

        let tally = ledger.tally();
        assert_eq!(tally.len(), 2);
        assert_eq!(tally[&candidate("A")], 2);
        assert_eq!(tally[&candidate("B")], 1);
    }

    #[test]
    fn verify_is_idempotent() {
        let (_, mut ledger) = ledger_at(1_000);
        ledger.append(vote("t1", "A"));
        assert_eq!(ledger.verify(), Ok(()));
        assert_eq!(ledger.verify(), Ok(()));
    }

    #[test]
    fn edited_payload_is_self_hash_mismatch() {
        let (clock, mut ledger) = ledger_at(1_000);
        ledger.append(vote("t1", "A"));
        ledger.append(vote("t2", "B"));

        let mut blocks = ledger.blocks().to_vec();
        blocks[1].payload = Payload::Vote(vote("t1", "B"));
        let tampered = Ledger::from_blocks(blocks, clock).unwrap();

        assert_eq!(
            tampered.verify(),
            Err(TamperReport {
                index: 1,
                kind: TamperKind::SelfHashMismatch
            })
        );
    }

    #[test]
    fn rehashed_edit_is_chain_link_mismatch_on_successor() {
        let (clock, mut ledger) = ledger_at(1_000);
        ledger.append(vote("t1", "A"));
        ledger.append(vote("t2", "B"));

        let mut blocks = ledger.blocks().to_vec();
        blocks[1].payload = Payload::Vote(vote("t1", "B"));
        blocks[1].hash = blocks[1].compute_hash();
        let tampered = Ledger::from_blocks(blocks, clock).unwrap();

        assert_eq!(
            tampered.verify(),
            Err(TamperReport {
                index: 2,
                kind: TamperKind::ChainLinkMismatch
            })
        );
    }

    #[test]
    fn rehashed_genesis_with_wrong_sentinel_is_caught() {
        let (clock, ledger) = ledger_at(1_000);
        let mut blocks = ledger.blocks().to_vec();
        blocks[0].previous_hash = BlockHash::new([1; 32]);
        blocks[0].hash = blocks[0].compute_hash();
        let tampered = Ledger::from_blocks(blocks, clock).unwrap();

        assert_eq!(
            tampered.verify(),
            Err(TamperReport {
                index: 0,
                kind: TamperKind::ChainLinkMismatch
            })
        );
    }

    #[test]
    fn commit_accepts_prepared_block() {
        let (_, mut ledger) = ledger_at(1_000);
        let block = ledger.next_block(vote("t1", "A"));
        assert_eq!(ledger.height(), 1);
        ledger.commit(block.clone()).unwrap();
        assert_eq!(ledger.head(), &block);
        assert_eq!(ledger.verify(), Ok(()));
    }

    #[test]
    fn commit_rejects_stale_block() {
        let (_, mut ledger) = ledger_at(1_000);
        let stale = ledger.next_block(vote("t1", "A"));
        ledger.append(vote("t2", "B"));
        let err = ledger.commit(stale).unwrap_err();
        assert!(matches!(err, LedgerError::StaleBlock { index: 1, height: 2 }));
        assert_eq!(ledger.height(), 2);
    }

    #[test]
    fn from_blocks_rejects_empty() {
        let clock = Arc::new(NullClock::new(0));
        let err = Ledger::from_blocks(Vec::new(), clock).unwrap_err();
        assert!(matches!(err, LedgerError::CorruptStorage { index: 0, .. }));
    }

    #[test]
    fn successor_index_follows_position_not_stored_index() {
        let (clock, mut ledger) = ledger_at(1_000);
        ledger.append(vote("t1", "A"));
        ledger.append(vote("t2", "B"));

        let mut blocks = ledger.blocks().to_vec();
        blocks[2].index = u64::MAX;
        let tampered = Ledger::from_blocks(blocks, clock).unwrap();

        let next = tampered.next_block(vote("t3", "A"));
        assert_eq!(next.index, 3);
        let positions: Vec<u64> = tampered.votes().map(|(index, _)| index).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[test]
    fn summary_reports_head() {
        let (_, mut ledger) = ledger_at(1_000);
        let block = ledger.append(vote("t1", "A"));
        let summary = ledger.summary();
        assert_eq!(summary.height, 2);
        assert_eq!(summary.votes, 1);
        assert_eq!(summary.head_hash, block.hash);
        assert_eq!(ledger.get(1), Some(&block));
        assert_eq!(ledger.get(2), None);
    }
}
