//! Admit command - Check an argument against the admission rules
//!
//! Usage:
//! ```bash
//! clawdebate admit -s data.json --debate <ID> --stage <ID> --agent <ID> --side for --content-file arg.txt
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use clawdebate_core::{clean_text, AgentId, DebateId, StageId};
use clawdebate_rules::{can_submit_argument, ArgumentProposal};

use super::{load_config, print_json, SideArg, SnapshotArgs};

/// Arguments for the admit command
#[derive(Args)]
pub struct AdmitArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,

    /// Debate the argument is posted to
    #[arg(long)]
    debate: DebateId,

    /// Stage the argument is posted to
    #[arg(long)]
    stage: StageId,

    /// Posting agent
    #[arg(long)]
    agent: AgentId,

    /// Side the argument takes
    #[arg(long, value_enum)]
    side: SideArg,

    /// Argument body
    #[arg(long, conflicts_with = "content_file", required_unless_present = "content_file")]
    content: Option<String>,

    /// Read the argument body from a file
    #[arg(long)]
    content_file: Option<PathBuf>,
}

/// Run the admit command
pub fn run(args: AdmitArgs) -> Result<()> {
    let config = load_config()?;
    let snapshot = args.snapshot.load()?;

    let raw = match (&args.content, &args.content_file) {
        (Some(content), _) => content.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => String::new(),
    };
    let body = argument_body(&raw);

    let debate = snapshot.debate(args.debate)?;
    let stage = snapshot.stage(args.stage)?;
    let proposal = ArgumentProposal {
        agent_id: args.agent,
        side: args.side.into(),
        body: &body,
    };

    let admission = can_submit_argument(
        debate,
        stage,
        &proposal,
        &snapshot.arguments,
        args.snapshot.now(),
        &config.arguments,
    );

    if args.snapshot.json {
        return print_json(&admission);
    }

    println!(
        "{} {} {}",
        snapshot.agent_name(args.agent).green(),
        "→".dimmed(),
        format!("{} / {}", debate.title, stage.label).bold()
    );
    println!(
        "  {} {} chars (allowed {}-{})",
        "Length:".dimmed(),
        body.chars().count(),
        config.arguments.min_chars,
        config.arguments.max_chars
    );
    println!();

    match admission.reason() {
        None => crate::print_success("Argument would be admitted"),
        Some(reason) => crate::print_error(&format!("Argument denied: {}", reason)),
    }

    Ok(())
}

/// Body as the engine would store it, so the length shown matches what is checked
fn argument_body(raw: &str) -> String {
    clean_text(raw, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_body_drops_control_chars() {
        let raw = format!("  {}\x00\x07\n\t{}\x1b  ", "a".repeat(250), "b".repeat(250));
        let body = argument_body(&raw);
        assert_eq!(body.chars().count(), 502);
        assert!(body.contains("\n\t"));
        assert!(!body.chars().any(|c| c == '\x00' || c == '\x07' || c == '\x1b'));
    }
}
