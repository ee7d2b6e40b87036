use std::sync::Arc;

use proptest::prelude::*;

use ballot_ledger::{GenesisConfig, Ledger, Payload, TamperKind, TamperReport, VotePayload};
use ballot_nullables::NullClock;
use ballot_types::{BlockHash, CandidateId, Timestamp, VoterToken};

fn vote(token: &str, candidate: &str) -> VotePayload {
    VotePayload {
        voter_token: VoterToken::new(token).unwrap(),
        candidate_id: CandidateId::new(candidate).unwrap(),
    }
}

/// Build a ledger with `candidates.len()` votes, advancing the clock by the
/// matching step before each append.
fn build(candidates: &[(u8, u64)]) -> (Arc<NullClock>, Ledger) {
    let clock = Arc::new(NullClock::new(1_700_000_000));
    let mut ledger = Ledger::new(&GenesisConfig::default(), clock.clone());
    for (i, (candidate, step)) in candidates.iter().enumerate() {
        clock.advance(*step);
        ledger.append(vote(&format!("token-{i}"), &format!("cand-{candidate}")));
    }
    (clock, ledger)
}

fn votes_strategy(min: usize) -> impl Strategy<Value = Vec<(u8, u64)>> {
    prop::collection::vec((0u8..4, 0u64..3), min..24)
}

/// Single-field edits a tamperer could make to a stored block.
#[derive(Clone, Copy, Debug)]
enum Edit {
    Index,
    Timestamp,
    Payload,
    PreviousHash,
    Hash,
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        Just(Edit::Index),
        Just(Edit::Timestamp),
        Just(Edit::Payload),
        Just(Edit::PreviousHash),
        Just(Edit::Hash),
    ]
}

fn apply(block: &mut ballot_ledger::Block, edit: Edit) {
    match edit {
        Edit::Index => block.index = block.index.wrapping_add(1),
        Edit::Timestamp => block.timestamp = Timestamp::new(block.timestamp.as_secs() ^ 1),
        Edit::Payload => {
            block.payload = match &block.payload {
                Payload::Genesis { label } => Payload::Genesis {
                    label: format!("{label}!"),
                },
                Payload::Vote(v) => Payload::Vote(VotePayload {
                    voter_token: v.voter_token.clone(),
                    candidate_id: CandidateId::new(format!("{}-x", v.candidate_id)).unwrap(),
                }),
            }
        }
        Edit::PreviousHash => {
            let mut bytes = *block.previous_hash.as_bytes();
            bytes[0] ^= 0x80;
            block.previous_hash = BlockHash::new(bytes);
        }
        Edit::Hash => {
            let mut bytes = *block.hash.as_bytes();
            bytes[31] ^= 0x01;
            block.hash = BlockHash::new(bytes);
        }
    }
}

proptest! {
    /// verify() succeeds after every append of any sequence.
    #[test]
    fn verify_holds_after_each_append(votes in votes_strategy(0)) {
        let clock = Arc::new(NullClock::new(1_700_000_000));
        let mut ledger = Ledger::new(&GenesisConfig::default(), clock.clone());
        prop_assert_eq!(ledger.verify(), Ok(()));
        for (i, (candidate, step)) in votes.iter().enumerate() {
            clock.advance(*step);
            ledger.append(vote(&format!("token-{i}"), &format!("cand-{candidate}")));
            prop_assert_eq!(ledger.verify(), Ok(()));
        }
    }

    /// Every block links to its predecessor, indices step by one and
    /// timestamps never decrease.
    #[test]
    fn chain_link_invariant(votes in votes_strategy(0)) {
        let (_, ledger) = build(&votes);
        let blocks = ledger.blocks();
        prop_assert!(blocks[0].previous_hash.is_zero());
        for pair in blocks.windows(2) {
            prop_assert_eq!(pair[1].previous_hash, pair[0].hash);
            prop_assert_eq!(pair[1].index, pair[0].index + 1);
            prop_assert!(pair[1].timestamp >= pair[0].timestamp);
        }
    }

    /// Tally sums to the number of votes and matches a direct count.
    #[test]
    fn tally_matches_votes(votes in votes_strategy(0)) {
        let (_, ledger) = build(&votes);
        let tally = ledger.tally();
        prop_assert_eq!(tally.values().sum::<u64>(), votes.len() as u64);
        for candidate in 0u8..4 {
            let expected = votes.iter().filter(|(c, _)| *c == candidate).count() as u64;
            let id = CandidateId::new(format!("cand-{candidate}")).unwrap();
            prop_assert_eq!(tally.get(&id).copied().unwrap_or(0), expected);
        }
    }

    /// Any single-field edit of block k is reported at k as a self-hash mismatch.
    #[test]
    fn single_field_edit_detected_at_k(
        votes in votes_strategy(1),
        pick in any::<prop::sample::Index>(),
        edit in edit_strategy(),
    ) {
        let (clock, ledger) = build(&votes);
        let mut blocks = ledger.blocks().to_vec();
        let k = pick.index(blocks.len());
        apply(&mut blocks[k], edit);

        let tampered = Ledger::from_blocks(blocks, clock).unwrap();
        prop_assert_eq!(
            tampered.verify(),
            Err(TamperReport { index: k as u64, kind: TamperKind::SelfHashMismatch })
        );
    }

    /// An edit that also recomputes block k's hash passes k but breaks the
    /// link at k + 1.
    #[test]
    fn rehashed_edit_detected_at_successor(
        votes in votes_strategy(2),
        pick in any::<prop::sample::Index>(),
    ) {
        let (clock, ledger) = build(&votes);
        let mut blocks = ledger.blocks().to_vec();
        let k = pick.index(blocks.len() - 1);
        apply(&mut blocks[k], Edit::Payload);
        blocks[k].hash = blocks[k].compute_hash();

        let tampered = Ledger::from_blocks(blocks, clock).unwrap();
        prop_assert_eq!(
            tampered.verify(),
            Err(TamperReport { index: k as u64 + 1, kind: TamperKind::ChainLinkMismatch })
        );
    }
}
