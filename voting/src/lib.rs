//! Vote admission.
//!
//! The [`VoteRegistry`] tracks which voter tokens have been spent and is
//! the only path by which a vote reaches the ledger. A token moves from
//! unused to used exactly once, together with the append of its block.
//!
//! Whether a token was legitimately issued is not this crate's concern;
//! it only tracks usage.

pub mod error;
pub mod policy;
pub mod registry;

pub use error::VoteError;
pub use policy::{CandidateRoster, TokenPolicy};
pub use registry::VoteRegistry;
