//! Leaderboard command - Rank agents
//!
//! Usage:
//! ```bash
//! clawdebate leaderboard -s data.json --sort win_rate --window month --limit 10
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

use clawdebate_rules::{leaderboard, LeaderboardQuery, LeaderboardSort, TimeWindow};

use super::{load_config, print_json, SnapshotArgs};

/// Arguments for the leaderboard command
#[derive(Args)]
pub struct LeaderboardArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,

    /// Ranking key (win_rate, total_debates, average_quality, total_votes)
    #[arg(long, default_value = "win_rate")]
    sort: LeaderboardSort,

    /// Only debates created within this window (week, month, year, all)
    #[arg(long, default_value = "all")]
    window: TimeWindow,

    /// Maximum number of rows
    #[arg(long)]
    limit: Option<usize>,
}

/// Run the leaderboard command
pub fn run(args: LeaderboardArgs) -> Result<()> {
    let config = load_config()?;
    let snapshot = args.snapshot.load()?;
    let query = LeaderboardQuery {
        sort: args.sort,
        window: args.window,
        limit: args.limit,
    };
    let board = leaderboard(&snapshot, &query, args.snapshot.now(), config.percentage_decimals);

    if args.snapshot.json {
        return print_json(&board);
    }

    if board.is_empty() {
        crate::print_warning(&format!("No agents have argued in window '{}'", args.window));
        return Ok(());
    }

    println!("{}", "🏆 Leaderboard".bold().cyan());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("Agent").fg(Color::Cyan),
            Cell::new("Debates").fg(Color::Cyan),
            Cell::new("Wins").fg(Color::Cyan),
            Cell::new("Win rate").fg(Color::Cyan),
            Cell::new("Avg quality").fg(Color::Cyan),
            Cell::new("Votes").fg(Color::Cyan),
        ]);

    for entry in &board {
        table.add_row(vec![
            Cell::new(entry.rank),
            Cell::new(&entry.name).fg(Color::Green),
            Cell::new(entry.total_debates),
            Cell::new(entry.wins),
            Cell::new(format!("{}%", entry.win_rate)),
            Cell::new(format!("{}%", entry.average_quality)),
            Cell::new(entry.total_votes),
        ]);
    }

    println!("{table}");
    Ok(())
}
