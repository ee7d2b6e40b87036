//! Ballot daemon: command-line entry point for a ballot ledger.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use ballot_ledger::{AuditReport, Payload};
use ballot_node::{init_logging, BallotConfig, BallotService, CastResult, LogFormat};
use clap::Parser;
use serde_json::json;

#[derive(Parser)]
#[command(name = "ballot-daemon", about = "Tamper-evident ballot ledger")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "BALLOT_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for ledger storage.
    #[arg(long, env = "BALLOT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BALLOT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "BALLOT_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Cast one vote.
    Cast {
        #[arg(long)]
        token: String,
        #[arg(long)]
        candidate: String,
    },
    /// Print the tally.
    Results,
    /// Verify the whole chain. Exits non-zero if tampering is found.
    Audit,
    /// Show whether a token has voted.
    Status {
        #[arg(long)]
        token: String,
    },
    /// List every block, genesis first.
    Blocks,
}

fn load_config(cli: &Cli) -> anyhow::Result<BallotConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            BallotConfig::from_toml_file(&path)
                .with_context(|| format!("failed to load config from {path}"))?
        }
        None => BallotConfig::default(),
    };

    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    Ok(config)
}

fn audit_json(report: &AuditReport) -> serde_json::Value {
    json!({
        "intact": report.intact,
        "first_bad_index": report.first_bad_index,
        "reason": report.reason.map(|kind| kind.to_string()),
        "blocks_checked": report.blocks_checked,
        "head_hash": report.head_hash.to_string(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let format: LogFormat = config.log_format()?;
    init_logging(format, &config.log_level)?;
    if let Some(path) = &cli.config {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    let service = BallotService::open_with_lmdb(&config)
        .with_context(|| format!("failed to open ledger at {}", config.data_dir.display()))?;

    match cli.command {
        Command::Cast { token, candidate } => match service.cast_vote(&token, &candidate).await? {
            CastResult::Accepted {
                block_index,
                block_hash,
            } => {
                println!(
                    "{}",
                    json!({
                        "accepted": true,
                        "block_index": block_index,
                        "block_hash": block_hash.to_string(),
                    })
                );
            }
            CastResult::Rejected(reason) => {
                println!(
                    "{}",
                    json!({ "accepted": false, "reason": format!("{reason:?}") })
                );
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Results => {
            let report = service.get_integrity_status().await;
            if !report.intact {
                tracing::error!("refusing to report results from a tampered ledger");
                println!("{}", serde_json::to_string_pretty(&audit_json(&report))?);
                return Ok(ExitCode::FAILURE);
            }
            let results = service.get_results().await;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Audit => {
            let report = service.get_integrity_status().await;
            println!("{}", serde_json::to_string_pretty(&audit_json(&report))?);
            if !report.intact {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Status { token } => {
            let status = service.voter_status(&token).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::Blocks => {
            for block in service.blocks().await {
                let payload = match &block.payload {
                    Payload::Genesis { label } => format!("genesis {label:?}"),
                    Payload::Vote(vote) => {
                        format!("vote {} -> {}", vote.voter_token, vote.candidate_id)
                    }
                };
                println!(
                    "{:>6}  {}  {}  prev={}  {}",
                    block.index,
                    block.timestamp.as_secs(),
                    block.hash,
                    block.previous_hash.short(),
                    payload
                );
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
