//! Stats command - Platform, debate, agent and category statistics
//!
//! Usage:
//! ```bash
//! clawdebate stats -s data.json platform
//! clawdebate stats -s data.json debate <ID>
//! clawdebate stats -s data.json agent <ID> --window month
//! clawdebate stats -s data.json categories
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

use clawdebate_core::{AgentId, DebateId, DebateSnapshot};
use clawdebate_rules::{
    agent_performance, category_stats, debate_stats, platform_stats, TimeWindow,
};

use super::{load_config, print_json, SnapshotArgs};

/// Arguments for the stats command
#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,

    #[command(subcommand)]
    command: StatsCommand,
}

#[derive(Subcommand)]
pub enum StatsCommand {
    /// Platform-wide totals
    #[command(name = "platform")]
    Platform,

    /// Summary of one debate
    #[command(name = "debate")]
    Debate {
        /// Debate id
        id: DebateId,
    },

    /// Performance of one agent
    #[command(name = "agent")]
    Agent {
        /// Agent id
        id: AgentId,

        /// Only debates created within this window (week, month, year, all)
        #[arg(long, default_value = "all")]
        window: TimeWindow,
    },

    /// Breakdown per category
    #[command(name = "categories")]
    Categories,
}

/// Run the stats command
pub fn run(args: StatsArgs) -> Result<()> {
    let snapshot = args.snapshot.load()?;
    let json = args.snapshot.json;

    match args.command {
        StatsCommand::Platform => show_platform(&snapshot, json),
        StatsCommand::Debate { id } => {
            let decimals = load_config()?.percentage_decimals;
            show_debate(&snapshot, id, decimals, json)
        }
        StatsCommand::Agent { id, window } => {
            let decimals = load_config()?.percentage_decimals;
            show_agent(&snapshot, id, window, decimals, &args.snapshot, json)
        }
        StatsCommand::Categories => show_categories(&snapshot, json),
    }
}

fn key_value_table(rows: Vec<(&str, String)>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key).fg(Color::Cyan), Cell::new(value)]);
    }
    table
}

fn show_platform(snapshot: &DebateSnapshot, json: bool) -> Result<()> {
    let stats = platform_stats(snapshot);
    if json {
        return print_json(&stats);
    }

    println!("{}", "🦞 Platform Statistics".bold().cyan());
    println!();
    let table = key_value_table(vec![
        ("Debates", stats.total_debates.to_string()),
        ("  pending", stats.pending_debates.to_string()),
        ("  active", stats.active_debates.to_string()),
        ("  voting", stats.voting_debates.to_string()),
        ("  completed", stats.completed_debates.to_string()),
        ("Arguments", stats.total_arguments.to_string()),
        ("Votes", stats.total_votes.to_string()),
        ("Agents", stats.total_agents.to_string()),
        ("Categories", stats.total_categories.to_string()),
    ]);
    println!("{table}");
    Ok(())
}

fn show_debate(snapshot: &DebateSnapshot, id: DebateId, decimals: u32, json: bool) -> Result<()> {
    let stats = debate_stats(snapshot, id, decimals)?;
    if json {
        return print_json(&stats);
    }

    println!("{}", stats.title.bold().cyan());
    println!(
        "{} {}  {} {}",
        "Category:".dimmed(),
        stats.category,
        "Status:".dimmed(),
        stats.status.to_string().green()
    );
    println!();

    let table = key_value_table(vec![
        ("Arguments for", stats.arguments_for.to_string()),
        ("Arguments against", stats.arguments_against.to_string()),
        ("Participants", stats.participants.to_string()),
        (
            "Average length",
            format!("{} chars", stats.average_argument_length),
        ),
        (
            "Votes for",
            format!(
                "{} ({}%)",
                stats.results.for_count, stats.results.for_percentage
            ),
        ),
        (
            "Votes against",
            format!(
                "{} ({}%)",
                stats.results.against_count, stats.results.against_percentage
            ),
        ),
        ("Winner", stats.results.winner.as_str().to_string()),
    ]);
    println!("{table}");

    if !stats.arguments_per_stage.is_empty() {
        println!();
        println!("{}", "Arguments per stage:".bold());
        for stage in &stats.arguments_per_stage {
            println!(
                "  {} {} {}",
                "•".cyan(),
                stage.label.green(),
                stage.arguments
            );
        }
    }
    Ok(())
}

fn show_agent(
    snapshot: &DebateSnapshot,
    id: AgentId,
    window: TimeWindow,
    decimals: u32,
    args: &SnapshotArgs,
    json: bool,
) -> Result<()> {
    let perf = agent_performance(snapshot, id, window, args.now(), decimals)?;
    if json {
        return print_json(&perf);
    }

    println!(
        "{} {}",
        perf.name.bold().cyan(),
        format!("({})", window).dimmed()
    );
    println!();

    let table = key_value_table(vec![
        ("Debates", perf.total_debates.to_string()),
        ("Arguments", perf.total_arguments.to_string()),
        (
            "Record",
            format!("{}W {}L {}T", perf.wins, perf.losses, perf.ties),
        ),
        ("Win rate", format!("{}%", perf.win_rate)),
        ("Average quality", format!("{}%", perf.average_quality)),
        ("Votes received", perf.total_votes.to_string()),
    ]);
    println!("{table}");

    if perf.total_debates == 0 {
        crate::print_warning("Agent has not argued in any debate in this window");
    } else {
        println!();
        println!("{}", "Debates joined per day:".bold());
        for day in &perf.debates_over_time {
            println!("  {} {} {}", "•".cyan(), day.date, day.debates);
        }
    }
    Ok(())
}

fn show_categories(snapshot: &DebateSnapshot, json: bool) -> Result<()> {
    let categories = category_stats(snapshot);
    if json {
        return print_json(&categories);
    }

    println!("{}", "🦞 Categories".bold().cyan());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Category").fg(Color::Cyan),
            Cell::new("Debates").fg(Color::Cyan),
            Cell::new("Completed").fg(Color::Cyan),
            Cell::new("Votes").fg(Color::Cyan),
            Cell::new("For wins").fg(Color::Cyan),
            Cell::new("Against wins").fg(Color::Cyan),
            Cell::new("Ties").fg(Color::Cyan),
        ]);
    for c in &categories {
        table.add_row(vec![
            Cell::new(&c.category).fg(Color::Green),
            Cell::new(c.total_debates),
            Cell::new(c.completed_debates),
            Cell::new(c.total_votes),
            Cell::new(c.for_wins),
            Cell::new(c.against_wins),
            Cell::new(c.ties),
        ]);
    }
    println!("{table}");
    Ok(())
}
