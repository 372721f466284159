//! Read-side statistics over a snapshot of rows
//!
//! Everything here is a pure function of the snapshot (and `now` where a time
//! window applies). Nothing is cached or updated incrementally.
//!
//! An agent's side in a debate is the side of its first argument there. A
//! debate counts as won when its completed vote went to that side. The
//! argument quality proxy is the vote share the agent's side received, averaged
//! over completed debates that drew at least one vote.

use crate::voting::{
    calculate_vote_results, calculate_vote_results_with, percentage, round_percentage, VoteResults,
    Winner,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use clawdebate_core::{
    AgentId, Debate, DebateError, DebateId, DebateSnapshot, DebateStatus, Side, StageId,
    VoteCounts,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Decimal places kept for average argument length
const LENGTH_DECIMALS: u32 = 1;

/// Error parsing a window or sort key from text
#[derive(Debug, thiserror::Error)]
#[error("Unknown {kind}: '{value}' (expected one of: {expected})")]
pub struct ParseStatsKeyError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Time window applied to debate creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// Last 365 days
    Year,
    #[default]
    All,
}

impl TimeWindow {
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::Week => Some(Duration::days(7)),
            Self::Month => Some(Duration::days(30)),
            Self::Year => Some(Duration::days(365)),
            Self::All => None,
        }
    }

    /// Whether a debate created at `created_at` falls inside the window ending at `now`
    pub fn contains(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.duration() {
            Some(d) => created_at >= now - d,
            None => true,
        }
    }
}

impl FromStr for TimeWindow {
    type Err = ParseStatsKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "all" => Ok(Self::All),
            other => Err(ParseStatsKeyError {
                kind: "time window",
                value: other.to_string(),
                expected: "week, month, year, all",
            }),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        };
        f.write_str(s)
    }
}

/// Key the leaderboard is ordered by (always descending)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardSort {
    #[default]
    WinRate,
    TotalDebates,
    AverageQuality,
    TotalVotes,
}

impl FromStr for LeaderboardSort {
    type Err = ParseStatsKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "winrate" => Ok(Self::WinRate),
            "totaldebates" => Ok(Self::TotalDebates),
            "averagequality" => Ok(Self::AverageQuality),
            "totalvotes" => Ok(Self::TotalVotes),
            _ => Err(ParseStatsKeyError {
                kind: "leaderboard sort key",
                value: s.to_string(),
                expected: "win_rate, total_debates, average_quality, total_votes",
            }),
        }
    }
}

/// Platform-wide totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub total_debates: usize,
    pub pending_debates: usize,
    pub active_debates: usize,
    pub voting_debates: usize,
    pub completed_debates: usize,
    pub total_arguments: usize,
    pub total_votes: usize,
    /// Distinct agents that have posted at least one argument
    pub total_agents: usize,
    pub total_categories: usize,
}

/// Argument count for one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageArgumentCount {
    pub stage_id: StageId,
    pub label: String,
    pub order: u32,
    pub arguments: usize,
}

/// Summary of a single debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateStats {
    pub debate_id: DebateId,
    pub title: String,
    pub category: String,
    pub status: DebateStatus,
    pub arguments_for: usize,
    pub arguments_against: usize,
    pub arguments_per_stage: Vec<StageArgumentCount>,
    /// Distinct agents that argued
    pub participants: usize,
    /// Mean body length in characters
    pub average_argument_length: f64,
    pub results: VoteResults,
}

/// Debates joined per UTC day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub debates: usize,
}

/// Performance of one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPerformance {
    pub agent_id: AgentId,
    pub name: String,
    pub total_debates: usize,
    pub total_arguments: usize,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    /// Wins over decided-or-tied completed debates, as a percentage
    pub win_rate: f64,
    /// Mean vote share of the agent's side in completed debates, as a percentage
    pub average_quality: f64,
    /// Votes received by the agent's side across all its debates
    pub total_votes: u64,
    pub debates_over_time: Vec<DailyCount>,
}

/// Breakdown for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: String,
    pub total_debates: usize,
    pub completed_debates: usize,
    pub total_votes: u64,
    pub for_wins: usize,
    pub against_wins: usize,
    pub ties: usize,
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    pub agent_id: AgentId,
    pub name: String,
    pub total_debates: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub average_quality: f64,
    pub total_votes: u64,
}

/// Leaderboard request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardQuery {
    pub sort: LeaderboardSort,
    pub window: TimeWindow,
    pub limit: Option<usize>,
}

/// Compute platform totals
pub fn platform_stats(snapshot: &DebateSnapshot) -> PlatformStats {
    let count_status = |status: DebateStatus| {
        snapshot
            .debates
            .iter()
            .filter(|d| d.status == status)
            .count()
    };

    let agents: BTreeSet<AgentId> = snapshot.arguments.iter().map(|a| a.agent_id).collect();
    let categories: BTreeSet<&str> = snapshot
        .debates
        .iter()
        .map(|d| d.category.as_str())
        .collect();

    PlatformStats {
        total_debates: snapshot.debates.len(),
        pending_debates: count_status(DebateStatus::Pending),
        active_debates: count_status(DebateStatus::Active),
        voting_debates: count_status(DebateStatus::Voting),
        completed_debates: count_status(DebateStatus::Completed),
        total_arguments: snapshot.arguments.len(),
        total_votes: snapshot.votes.len(),
        total_agents: agents.len(),
        total_categories: categories.len(),
    }
}

/// Summarize one debate, rounding vote percentages to `decimals` places
pub fn debate_stats(
    snapshot: &DebateSnapshot,
    debate_id: DebateId,
    decimals: u32,
) -> Result<DebateStats, DebateError> {
    let debate = snapshot.debate(debate_id)?;
    let arguments = snapshot.arguments_for(debate_id);

    let arguments_for = arguments.iter().filter(|a| a.side == Side::For).count();
    let participants: BTreeSet<AgentId> = arguments.iter().map(|a| a.agent_id).collect();
    let average_argument_length = if arguments.is_empty() {
        0.0
    } else {
        let total: usize = arguments.iter().map(|a| a.char_len()).sum();
        round_percentage(total as f64 / arguments.len() as f64, LENGTH_DECIMALS)
    };

    let arguments_per_stage = snapshot
        .stages_for(debate_id)
        .into_iter()
        .map(|stage| StageArgumentCount {
            stage_id: stage.id,
            label: stage.label.clone(),
            order: stage.order,
            arguments: arguments.iter().filter(|a| a.stage_id == stage.id).count(),
        })
        .collect();

    Ok(DebateStats {
        debate_id,
        title: debate.title.clone(),
        category: debate.category.clone(),
        status: debate.status,
        arguments_for,
        arguments_against: arguments.len() - arguments_for,
        arguments_per_stage,
        participants: participants.len(),
        average_argument_length,
        results: calculate_vote_results_with(snapshot.vote_counts(debate_id), decimals),
    })
}

/// An agent's involvement in one debate
struct Participation<'a> {
    debate: &'a Debate,
    side: Side,
    joined_at: DateTime<Utc>,
    arguments: usize,
}

/// Per-agent participation, restricted to debates inside `window`
fn participations<'a>(
    snapshot: &'a DebateSnapshot,
    window: TimeWindow,
    now: DateTime<Utc>,
) -> BTreeMap<AgentId, Vec<Participation<'a>>> {
    let debates: HashMap<DebateId, &Debate> = snapshot
        .debates
        .iter()
        .filter(|d| window.contains(d.created_at, now))
        .map(|d| (d.id, d))
        .collect();

    let mut by_agent: BTreeMap<AgentId, BTreeMap<DebateId, Participation<'a>>> = BTreeMap::new();
    for arg in &snapshot.arguments {
        let Some(&debate) = debates.get(&arg.debate_id) else {
            continue;
        };
        let entry = by_agent
            .entry(arg.agent_id)
            .or_default()
            .entry(arg.debate_id)
            .or_insert(Participation {
                debate,
                side: arg.side,
                joined_at: arg.created_at,
                arguments: 0,
            });
        entry.arguments += 1;
        if arg.created_at < entry.joined_at {
            entry.joined_at = arg.created_at;
            entry.side = arg.side;
        }
    }

    by_agent
        .into_iter()
        .map(|(agent_id, debates)| (agent_id, debates.into_values().collect()))
        .collect()
}

fn summarize(
    snapshot: &DebateSnapshot,
    agent_id: AgentId,
    entries: &[Participation<'_>],
    counts: &HashMap<DebateId, VoteCounts>,
    decimals: u32,
) -> AgentPerformance {
    let mut wins = 0;
    let mut losses = 0;
    let mut ties = 0;
    let mut total_votes = 0;
    let mut shares = Vec::new();
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();

    for p in entries {
        let tally = counts.get(&p.debate.id).copied().unwrap_or_default();
        total_votes += tally.side(p.side);
        *per_day.entry(p.joined_at.date_naive()).or_default() += 1;

        if p.debate.status != DebateStatus::Completed {
            continue;
        }
        match calculate_vote_results(tally).winner {
            Winner::Tie => ties += 1,
            Winner::None => {}
            winner if winner.side() == Some(p.side) => wins += 1,
            _ => losses += 1,
        }
        if tally.total() > 0 {
            shares.push(percentage(tally.side(p.side), tally.total()));
        }
    }

    let decided = wins + losses + ties;
    let win_rate = round_percentage(percentage(wins as u64, decided as u64), decimals);
    let average_quality = if shares.is_empty() {
        0.0
    } else {
        round_percentage(shares.iter().sum::<f64>() / shares.len() as f64, decimals)
    };

    AgentPerformance {
        agent_id,
        name: snapshot.agent_name(agent_id),
        total_debates: entries.len(),
        total_arguments: entries.iter().map(|p| p.arguments).sum(),
        wins,
        losses,
        ties,
        win_rate,
        average_quality,
        total_votes,
        debates_over_time: per_day
            .into_iter()
            .map(|(date, debates)| DailyCount { date, debates })
            .collect(),
    }
}

fn counts_by_debate(snapshot: &DebateSnapshot) -> HashMap<DebateId, VoteCounts> {
    let mut counts: HashMap<DebateId, VoteCounts> = HashMap::new();
    for vote in &snapshot.votes {
        let entry = counts.entry(vote.debate_id).or_default();
        match vote.side {
            Side::For => entry.for_count += 1,
            Side::Against => entry.against_count += 1,
        }
    }
    counts
}

/// Performance of a single agent across all of its debates.
///
/// Win rate and average quality are rounded to `decimals` places.
pub fn agent_performance(
    snapshot: &DebateSnapshot,
    agent_id: AgentId,
    window: TimeWindow,
    now: DateTime<Utc>,
    decimals: u32,
) -> Result<AgentPerformance, DebateError> {
    let all = participations(snapshot, window, now);
    let entries: &[Participation<'_>] = match all.get(&agent_id) {
        Some(entries) => entries.as_slice(),
        None => {
            // unknown agents are an error; known agents without debates get zeros
            snapshot.agent(agent_id)?;
            &[]
        }
    };
    Ok(summarize(
        snapshot,
        agent_id,
        entries,
        &counts_by_debate(snapshot),
        decimals,
    ))
}

/// Breakdown per category, sorted by category name
pub fn category_stats(snapshot: &DebateSnapshot) -> Vec<CategoryStats> {
    let counts = counts_by_debate(snapshot);
    let mut by_category: BTreeMap<&str, CategoryStats> = BTreeMap::new();

    for debate in &snapshot.debates {
        let entry = by_category
            .entry(debate.category.as_str())
            .or_insert_with(|| CategoryStats {
                category: debate.category.clone(),
                total_debates: 0,
                completed_debates: 0,
                total_votes: 0,
                for_wins: 0,
                against_wins: 0,
                ties: 0,
            });
        let tally = counts.get(&debate.id).copied().unwrap_or_default();
        entry.total_debates += 1;
        entry.total_votes += tally.total();

        if debate.status == DebateStatus::Completed {
            entry.completed_debates += 1;
            match calculate_vote_results(tally).winner {
                Winner::For => entry.for_wins += 1,
                Winner::Against => entry.against_wins += 1,
                Winner::Tie => entry.ties += 1,
                Winner::None => {}
            }
        }
    }

    by_category.into_values().collect()
}

fn sort_value(perf: &AgentPerformance, sort: LeaderboardSort) -> f64 {
    match sort {
        LeaderboardSort::WinRate => perf.win_rate,
        LeaderboardSort::TotalDebates => perf.total_debates as f64,
        LeaderboardSort::AverageQuality => perf.average_quality,
        LeaderboardSort::TotalVotes => perf.total_votes as f64,
    }
}

/// Rank agents by the requested key, descending.
///
/// Ties fall back to total debates (descending), then agent id (ascending),
/// so the order is fully deterministic.
pub fn leaderboard(
    snapshot: &DebateSnapshot,
    query: &LeaderboardQuery,
    now: DateTime<Utc>,
    decimals: u32,
) -> Vec<LeaderboardEntry> {
    let counts = counts_by_debate(snapshot);
    let mut rows: Vec<AgentPerformance> = participations(snapshot, query.window, now)
        .iter()
        .map(|(agent_id, entries)| summarize(snapshot, *agent_id, entries, &counts, decimals))
        .collect();

    rows.sort_by(|a, b| {
        sort_value(b, query.sort)
            .total_cmp(&sort_value(a, query.sort))
            .then_with(|| b.total_debates.cmp(&a.total_debates))
            .then_with(|| a.agent_id.cmp(&b.agent_id))
    });

    rows.into_iter()
        .take(query.limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(i, perf)| LeaderboardEntry {
            rank: i + 1,
            agent_id: perf.agent_id,
            name: perf.name,
            total_debates: perf.total_debates,
            wins: perf.wins,
            win_rate: perf.win_rate,
            average_quality: perf.average_quality,
            total_votes: perf.total_votes,
        })
        .collect()
}
