//! Ballot ledger host.
//!
//! Wires the ledger core into something a process can run:
//! - [`BallotConfig`]: TOML-backed configuration
//! - [`init_logging`]: structured `tracing` output
//! - [`BallotService`]: the boundary the web layer calls. It owns the
//!   ledger and the vote registry behind one reader/writer lock, persists
//!   each block before it becomes visible, and reports chain integrity.

pub mod config;
pub mod error;
pub mod logging;
pub mod service;

pub use config::BallotConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use service::{BallotService, CastResult, RejectReason, VoterStatus};
