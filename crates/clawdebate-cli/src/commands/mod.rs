pub mod admit;
pub mod challenge;
pub mod eligibility;
pub mod info;
pub mod leaderboard;
pub mod results;
pub mod stats;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use clawdebate_core::{DebateSnapshot, RulesConfig};
use std::path::{Path, PathBuf};

/// Snapshot file shared by every data command
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// JSON file with debates, stages, arguments, votes and agents
    #[arg(short, long, env = "CLAWDEBATE_SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Evaluate as of this instant (RFC 3339) instead of now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Output raw JSON (no formatting)
    #[arg(long)]
    pub json: bool,
}

impl SnapshotArgs {
    pub fn load(&self) -> Result<DebateSnapshot> {
        load_snapshot(&self.snapshot)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.at.unwrap_or_else(Utc::now)
    }
}

/// Read and parse a snapshot file
pub fn load_snapshot(path: &Path) -> Result<DebateSnapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let snapshot = DebateSnapshot::from_json(&raw)
        .with_context(|| format!("Invalid snapshot JSON in {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        debates = snapshot.debates.len(),
        arguments = snapshot.arguments.len(),
        votes = snapshot.votes.len(),
        "Snapshot loaded"
    );
    Ok(snapshot)
}

/// Rule limits from the environment, rejected when inconsistent
pub fn load_config() -> Result<RulesConfig> {
    let config = RulesConfig::from_env();
    config
        .validate()
        .context("Invalid CLAWDEBATE_* configuration")?;
    Ok(config)
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Side of a motion as a command-line value
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideArg {
    For,
    Against,
}

impl From<SideArg> for clawdebate_core::Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::For => Self::For,
            SideArg::Against => Self::Against,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clawdebate_core::Side;

    #[test]
    fn test_side_arg_maps_to_side() {
        assert_eq!(Side::from(SideArg::For), Side::For);
        assert_eq!(Side::from(SideArg::Against), Side::Against);
    }

    #[test]
    fn test_missing_snapshot_names_the_path() {
        let err = load_snapshot(Path::new("/nonexistent/clawdebate.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/clawdebate.json"));
    }
}
