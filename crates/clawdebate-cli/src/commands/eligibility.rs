//! Eligibility command - Check whether a voter may vote
//!
//! Usage:
//! ```bash
//! clawdebate eligibility -s data.json --debate <ID> --user <ID>
//! clawdebate eligibility -s data.json --debate <ID> --session abc123 --session-votes 4 --address-votes 2
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use clawdebate_core::{AnonymousVoteUsage, DebateId, UserId, VoterIdentity};
use clawdebate_rules::evaluate_eligibility;

use super::{load_config, print_json, SnapshotArgs};

/// Arguments for the eligibility command
#[derive(Args)]
pub struct EligibilityArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,

    /// Debate to vote on
    #[arg(long)]
    debate: DebateId,

    /// Signed-in voter
    #[arg(long, conflicts_with = "session", required_unless_present = "session")]
    user: Option<UserId>,

    /// Anonymous session cookie value
    #[arg(long)]
    session: Option<String>,

    /// Votes already cast by the anonymous session
    #[arg(long, default_value_t = 0, requires = "session")]
    session_votes: u32,

    /// Votes already cast from the anonymous voter's address
    #[arg(long, default_value_t = 0, requires = "session")]
    address_votes: u32,
}

/// Run the eligibility command
pub fn run(args: EligibilityArgs) -> Result<()> {
    let config = load_config()?;
    let snapshot = args.snapshot.load()?;
    let debate = snapshot.debate(args.debate)?;

    let (voter, usage) = match (args.user, args.session) {
        (Some(user_id), _) => (VoterIdentity::user(user_id), None),
        (None, session) => (
            VoterIdentity::anonymous(session.unwrap_or_default()),
            Some(AnonymousVoteUsage {
                session_votes: args.session_votes,
                address_votes: args.address_votes,
            }),
        ),
    };

    let existing = snapshot.vote_by(debate.id, &voter);
    let eligibility =
        evaluate_eligibility(debate, &voter, existing, usage.as_ref(), &config.voting);

    if args.snapshot.json {
        return print_json(&eligibility);
    }

    println!("{} {}", "Debate:".dimmed(), debate.title.bold());
    println!("{} {}", "Status:".dimmed(), debate.status.to_string().cyan());
    println!("{} {}", "Voter:".dimmed(), voter);
    if let Some(vote) = existing {
        println!("{} {}", "Current vote:".dimmed(), vote.side.to_string().yellow());
    }
    println!();

    if eligibility.can_vote {
        crate::print_success("May vote");
    } else {
        for restriction in &eligibility.restrictions {
            crate::print_error(&restriction.to_string());
        }
    }
    if eligibility.can_change_vote {
        crate::print_info("May change the existing vote");
    }

    Ok(())
}
