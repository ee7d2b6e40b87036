//! Ballot configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use ballot_ledger::{GenesisConfig, DEFAULT_GENESIS_LABEL};
use ballot_types::CandidateId;
use ballot_voting::{CandidateRoster, TokenPolicy};

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for a ballot ledger host.
///
/// Can be loaded from a TOML file via [`BallotConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BallotConfig {
    /// Data directory for ledger storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Label written into the genesis block of a new ledger.
    #[serde(default = "default_genesis_label")]
    pub genesis_label: String,

    /// Whether voter tokens that differ only in ASCII case are distinct.
    #[serde(default = "default_true")]
    pub case_sensitive_tokens: bool,

    /// Admissible candidate ids. Empty admits any candidate.
    #[serde(default)]
    pub candidates: Vec<String>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// LMDB map size in MiB.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./ballot_data")
}

fn default_genesis_label() -> String {
    DEFAULT_GENESIS_LABEL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_map_size_mb() -> usize {
    64
}

// ── Impl ───────────────────────────────────────────────────────────────

impl BallotConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn genesis(&self) -> GenesisConfig {
        GenesisConfig {
            label: self.genesis_label.clone(),
        }
    }

    pub fn token_policy(&self) -> TokenPolicy {
        TokenPolicy {
            case_sensitive: self.case_sensitive_tokens,
        }
    }

    /// The configured roster. An empty candidate name is a config error.
    pub fn roster(&self) -> Result<CandidateRoster, NodeError> {
        let candidates = self
            .candidates
            .iter()
            .map(|name| {
                CandidateId::new(name.clone())
                    .map_err(|e| NodeError::Config(format!("candidates: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CandidateRoster::new(candidates))
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }

    /// LMDB map size in bytes.
    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for BallotConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            genesis_label: default_genesis_label(),
            case_sensitive_tokens: default_true(),
            candidates: Vec::new(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            map_size_mb: default_map_size_mb(),
        }
    }
}
