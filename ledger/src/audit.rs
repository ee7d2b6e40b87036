//! Integrity auditing: turn a chain verification into a report that can
//! leave the process (status pages, CLI output, operator alerts).

use ballot_types::BlockHash;
use serde::{Deserialize, Serialize};

use crate::chain::Ledger;
use crate::error::TamperKind;

/// Result of auditing a ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// `true` iff every block passed both checks.
    pub intact: bool,
    /// Position of the first offending block.
    pub first_bad_index: Option<u64>,
    pub reason: Option<TamperKind>,
    /// Blocks examined, including the offending one.
    pub blocks_checked: u64,
    /// Stored hash of the head block at audit time.
    pub head_hash: BlockHash,
}

/// Stateless auditor over a borrowed ledger.
///
/// Safe to run concurrently with other audits and reads, but the caller
/// must keep appends out while it runs (hold a read lock).
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegrityAuditor;

impl IntegrityAuditor {
    pub fn audit(&self, ledger: &Ledger) -> AuditReport {
        let head_hash = ledger.head().hash;
        match ledger.verify() {
            Ok(()) => AuditReport {
                intact: true,
                first_bad_index: None,
                reason: None,
                blocks_checked: ledger.height(),
                head_hash,
            },
            Err(report) => {
                tracing::warn!(
                    index = report.index,
                    kind = %report.kind,
                    "ledger audit found tampering"
                );
                AuditReport {
                    intact: false,
                    first_bad_index: Some(report.index),
                    reason: Some(report.kind),
                    blocks_checked: report.index + 1,
                    head_hash,
                }
            }
        }
    }
}
