//! The vote service: one ledger, one registry, one writer.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use ballot_ledger::{
    load_or_init, persist_block, AuditReport, Block, IntegrityAuditor, Ledger, LedgerSummary,
    TamperReport,
};
use ballot_store::BlockStore;
use ballot_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment};
use ballot_types::{BlockHash, CandidateId, Clock, SystemClock, VoterToken};
use ballot_voting::{VoteError, VoteRegistry};

use crate::config::BallotConfig;
use crate::NodeError;

/// Named LMDB databases: `blocks` and `meta`.
const LMDB_MAX_DBS: u32 = 2;

/// Outcome of a cast attempt that reached the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastResult {
    Accepted {
        block_index: u64,
        block_hash: BlockHash,
    },
    Rejected(RejectReason),
}

/// Why a well-formed vote was refused. Nothing was written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    DuplicateVote,
    UnknownCandidate(CandidateId),
}

/// What the ledger knows about one voter token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterStatus {
    pub has_voted: bool,
    pub block_index: Option<u64>,
    pub candidate: Option<CandidateId>,
}

/// Ledger and registry are only ever changed together.
struct BallotState {
    ledger: Ledger,
    registry: VoteRegistry,
}

/// Hosts a ballot ledger for concurrent callers.
///
/// Casts serialize on a write lock covering the duplicate check, the store
/// commit, the ledger append and the token mark. Reads share a read lock
/// and never see a half-applied cast.
///
/// The store commit blocks the calling worker thread, so the service must
/// run on tokio's multi-threaded runtime.
pub struct BallotService {
    state: RwLock<BallotState>,
    store: Arc<dyn BlockStore>,
    auditor: IntegrityAuditor,
    /// First failure found by the audit at open. Casts are refused while
    /// set; appended blocks are always valid, so it never clears or moves.
    damage: Option<TamperReport>,
}

impl BallotService {
    /// Open the ledger held by `store`, creating it if the store is empty.
    ///
    /// The chain is audited first, then the registry is rebuilt from the
    /// stored votes. A failed audit is logged, not fatal: the service
    /// still opens read-only so the report can be inspected, and every
    /// cast is refused with [`NodeError::Tampered`].
    pub fn open(
        config: &BallotConfig,
        store: Arc<dyn BlockStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, NodeError> {
        let ledger = load_or_init(store.as_ref(), &config.genesis(), clock)?;
        let policy = config.token_policy();
        let roster = config.roster()?;

        let auditor = IntegrityAuditor;
        let damage = ledger.verify().err();
        let registry = match damage {
            None => VoteRegistry::rebuild(&ledger, policy, roster)?,
            Some(report) => {
                tracing::error!(
                    first_bad_index = report.index,
                    reason = %report.kind,
                    "ballot ledger opened with integrity failure, casting disabled"
                );
                VoteRegistry::rebuild_unverified(&ledger, policy, roster)
            }
        };

        tracing::info!(
            height = ledger.height(),
            votes = registry.used_count(),
            head = %ledger.head().hash.short(),
            case_sensitive = registry.policy().case_sensitive,
            candidates = registry.roster().candidates().count(),
            "ballot ledger opened"
        );

        Ok(Self {
            state: RwLock::new(BallotState { ledger, registry }),
            store,
            auditor,
            damage,
        })
    }

    /// Open an LMDB-backed service under `config.data_dir`, using the
    /// system clock.
    pub fn open_with_lmdb(config: &BallotConfig) -> Result<Self, NodeError> {
        check_data_dir(&config.data_dir).map_err(NodeError::Config)?;
        let env = LmdbEnvironment::open(&config.data_dir, LMDB_MAX_DBS, config.map_size_bytes())?;

        let report = check_integrity(&env)?;
        if !report.is_healthy() {
            for error in &report.errors {
                tracing::warn!(error = %error, "storage integrity problem");
            }
        }

        let store: Arc<dyn BlockStore> = Arc::new(env.block_store());
        Self::open(config, store, Arc::new(SystemClock))
    }

    /// Cast one vote.
    ///
    /// Duplicate tokens and candidates outside the roster come back as
    /// [`CastResult::Rejected`]. Storage failures are errors, and leave the
    /// token unused so the same vote can be retried. Nothing is appended to
    /// a ledger that failed its audit at open.
    pub async fn cast_vote(
        &self,
        voter_token: &str,
        candidate_id: &str,
    ) -> Result<CastResult, NodeError> {
        let token = VoterToken::new(voter_token)?;
        let candidate = CandidateId::new(candidate_id)?;
        if let Some(report) = self.damage {
            return Err(NodeError::Tampered {
                index: report.index,
                kind: report.kind,
            });
        }

        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let store = self.store.as_ref();
        let outcome = tokio::task::block_in_place(|| {
            state.registry.register_and_cast_durable(
                token,
                candidate,
                &mut state.ledger,
                |block| persist_block(store, block),
            )
        });

        match outcome {
            Ok(block) => {
                tracing::info!(
                    index = block.index,
                    hash = %block.hash.short(),
                    "vote accepted"
                );
                Ok(CastResult::Accepted {
                    block_index: block.index,
                    block_hash: block.hash,
                })
            }
            Err(VoteError::DuplicateVote) => Ok(CastResult::Rejected(RejectReason::DuplicateVote)),
            Err(VoteError::UnknownCandidate(id)) => {
                Ok(CastResult::Rejected(RejectReason::UnknownCandidate(id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Votes per candidate. Only trustworthy when
    /// [`get_integrity_status`](Self::get_integrity_status) reports intact;
    /// use [`certified_results`](Self::certified_results) to get both at once.
    pub async fn get_results(&self) -> BTreeMap<CandidateId, u64> {
        self.state.read().await.ledger.tally()
    }

    /// Audit, then tally under the same read lock.
    pub async fn certified_results(&self) -> Result<BTreeMap<CandidateId, u64>, NodeError> {
        let state = self.state.read().await;
        state
            .ledger
            .verify()
            .map_err(|report| NodeError::Tampered {
                index: report.index,
                kind: report.kind,
            })?;
        Ok(state.ledger.tally())
    }

    pub async fn get_integrity_status(&self) -> AuditReport {
        let state = self.state.read().await;
        self.auditor.audit(&state.ledger)
    }

    pub async fn voter_status(&self, voter_token: &str) -> Result<VoterStatus, NodeError> {
        let token = VoterToken::new(voter_token)?;
        let state = self.state.read().await;
        let block_index = state.registry.block_of(&token);
        let candidate = block_index
            .and_then(|index| state.ledger.get(index))
            .and_then(Block::vote)
            .map(|vote| vote.candidate_id.clone());
        Ok(VoterStatus {
            has_voted: block_index.is_some(),
            block_index,
            candidate,
        })
    }

    /// Snapshot of every block, genesis first.
    pub async fn blocks(&self) -> Vec<Block> {
        self.state.read().await.ledger.blocks().to_vec()
    }

    pub async fn summary(&self) -> LedgerSummary {
        self.state.read().await.ledger.summary()
    }
}

impl std::fmt::Debug for BallotService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BallotService")
            .field("auditor", &self.auditor)
            .field("damage", &self.damage)
            .finish_non_exhaustive()
    }
}
