//! LMDB database integrity checks.
//!
//! Run on startup to detect storage-level damage early, before the ledger
//! is rebuilt. These checks look only at record layout (contiguous indices,
//! non-empty values); hash-chain verification happens in the ledger.

use std::path::Path;

use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug)]
pub struct IntegrityReport {
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check the block database on startup.
///
/// Walks every record and reports index gaps and empty values. Read
/// failures of individual records are recorded in the report rather than
/// causing a hard error.
pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        total_entries: 0,
        errors: Vec::new(),
    };

    let rtxn = env.env().read_txn()?;
    let mut expected = 0u64;
    for entry in env.blocks_db().iter(&rtxn)? {
        match entry {
            Ok((index, bytes)) => {
                report.total_entries += 1;
                if index != expected {
                    report
                        .errors
                        .push(format!("index gap: expected block {expected}, found {index}"));
                }
                if bytes.is_empty() {
                    report.errors.push(format!("block {index} has an empty record"));
                }
                expected = index.saturating_add(1);
            }
            Err(e) => {
                report
                    .errors
                    .push(format!("failed to read block after {expected}: {e}"));
            }
        }
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing, which suggests
/// corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(()); // Fresh start
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_store::BlockStore;

    #[test]
    fn check_data_dir_fresh_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_data_dir(&dir.path().join("not-created-yet"));
        assert!(result.is_ok());
    }

    #[test]
    fn check_data_dir_without_data_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_data_dir(dir.path()).is_err());
    }

    #[test]
    fn contiguous_records_are_healthy() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024).unwrap();
        let store = env.block_store();
        store.append_block(0, b"g").unwrap();
        store.append_block(1, b"v").unwrap();

        let report = check_integrity(&env).unwrap();
        assert!(report.is_healthy(), "{:?}", report.errors);
        assert_eq!(report.total_entries, 2);
        assert!(check_data_dir(dir.path()).is_ok());
    }

    #[test]
    fn gap_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024).unwrap();
        let store = env.block_store();
        store.append_block(0, b"g").unwrap();
        store.append_block(2, b"v").unwrap();

        let report = check_integrity(&env).unwrap();
        assert!(!report.is_healthy());
        assert_eq!(report.errors.len(), 1);
    }
}
