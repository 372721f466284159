//! Results command - Vote tallies, percentages and winners
//!
//! Usage:
//! ```bash
//! clawdebate results -s data.json
//! clawdebate results -s data.json --debate <ID> --json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use serde::Serialize;

use clawdebate_core::{DebateId, DebateStatus};
use clawdebate_rules::{calculate_vote_results_with, VoteResults, Winner};

use super::{load_config, print_json, SnapshotArgs};

/// Arguments for the results command
#[derive(Args)]
pub struct ResultsArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,

    /// Only this debate
    #[arg(long)]
    debate: Option<DebateId>,
}

#[derive(Serialize)]
struct DebateResults<'a> {
    debate_id: DebateId,
    title: &'a str,
    status: DebateStatus,
    results: VoteResults,
}

/// Run the results command
pub fn run(args: ResultsArgs) -> Result<()> {
    let config = load_config()?;
    let snapshot = args.snapshot.load()?;

    let debates = match args.debate {
        Some(id) => vec![snapshot.debate(id)?],
        None => snapshot.debates.iter().collect(),
    };

    let rows: Vec<DebateResults<'_>> = debates
        .into_iter()
        .map(|debate| DebateResults {
            debate_id: debate.id,
            title: &debate.title,
            status: debate.status,
            results: calculate_vote_results_with(
                snapshot.vote_counts(debate.id),
                config.percentage_decimals,
            ),
        })
        .collect();

    if args.snapshot.json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        crate::print_warning("Snapshot contains no debates");
        return Ok(());
    }

    println!("{}", "🦞 Vote Results".bold().cyan());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Debate").fg(Color::Cyan),
            Cell::new("Status").fg(Color::Cyan),
            Cell::new("For").fg(Color::Cyan),
            Cell::new("Against").fg(Color::Cyan),
            Cell::new("Total").fg(Color::Cyan),
            Cell::new("Winner").fg(Color::Cyan),
        ]);

    for row in &rows {
        let r = &row.results;
        let winner_color = match r.winner {
            Winner::For => Color::Green,
            Winner::Against => Color::Red,
            Winner::Tie => Color::Yellow,
            Winner::None => Color::DarkGrey,
        };
        table.add_row(vec![
            Cell::new(row.title),
            Cell::new(row.status.as_str()),
            Cell::new(format!("{} ({}%)", r.for_count, r.for_percentage)),
            Cell::new(format!("{} ({}%)", r.against_count, r.against_percentage)),
            Cell::new(r.total),
            Cell::new(r.winner.as_str()).fg(winner_color),
        ]);
    }

    println!("{table}");
    Ok(())
}
