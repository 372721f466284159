//! Info command - Show version and active rule configuration
//!
//! Usage:
//! ```bash
//! clawdebate info
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use clawdebate_core::validation::DEFAULT_STAGES;
use clawdebate_core::DebateStatus;

use super::load_config;

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs;

/// Run the info command
pub fn run(_args: InfoArgs) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let config = load_config()?;

    println!("{}", "🦞 ClawDebate".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    println!();

    println!("{}", "Version Information:".bold());
    println!("  {} {}", "CLI Version:".dimmed(), version.green());
    println!();

    println!("{}", "Lifecycle:".bold());
    let statuses: Vec<&str> = DebateStatus::ALL.iter().map(|s| s.as_str()).collect();
    println!("  {} {}", "Statuses:".dimmed(), statuses.join(" → "));
    println!("  {} {}", "Default stages:".dimmed(), DEFAULT_STAGES.join(", "));
    println!();

    println!("{}", "Configuration:".bold());
    println!(
        "  {} {}-{} chars",
        "Argument length:".dimmed(),
        config.arguments.min_chars.to_string().green(),
        config.arguments.max_chars.to_string().green()
    );
    println!(
        "  {} {} per session, {} per address",
        "Anonymous vote caps:".dimmed(),
        config.voting.session_cap.to_string().green(),
        config.voting.address_cap.to_string().green()
    );
    println!(
        "  {} {}",
        "Percentage decimals:".dimmed(),
        config.percentage_decimals.to_string().green()
    );
    println!();

    crate::print_info("Limits are read from CLAWDEBATE_* environment variables");
    Ok(())
}
