//! Voting eligibility, vote transitions and result calculation
//!
//! Anonymous vote counters are passed in as plain values. Nothing here keeps
//! per-session state between calls.

use chrono::{DateTime, Utc};
use clawdebate_core::{
    AnonymousVoteUsage, CastVoteInput, Debate, DebateError, DebateStatus, DenyReason, Side, Vote,
    VoteCounts, VoterIdentity, VotingLimits, MAX_PERCENT_DECIMALS,
};
use serde::{Deserialize, Serialize};

/// Whether an identity may cast or change a vote on a debate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingEligibility {
    pub can_vote: bool,
    /// Message of the first restriction, when voting is refused
    pub reason: Option<String>,
    pub can_change_vote: bool,
    /// Every restriction that applies, in evaluation order
    pub restrictions: Vec<DenyReason>,
}

/// Evaluate voting eligibility.
///
/// Every check is evaluated independently and recorded; `can_vote` holds only
/// when none of them fire. Anonymous caps apply whatever the debate status.
/// Missing usage counters for an anonymous voter count as zero.
pub fn evaluate_eligibility(
    debate: &Debate,
    voter: &VoterIdentity,
    existing_vote: Option<&Vote>,
    usage: Option<&AnonymousVoteUsage>,
    limits: &VotingLimits,
) -> VotingEligibility {
    let mut restrictions = Vec::new();
    let voting_open = debate.status == DebateStatus::Voting;
    let has_vote = existing_vote.is_some_and(|v| v.belongs_to(debate.id, voter));

    if !voting_open {
        restrictions.push(DenyReason::DebateNotVoting {
            status: debate.status,
        });
    }

    if has_vote {
        restrictions.push(DenyReason::AlreadyVoted);
    }

    if voter.is_anonymous() {
        let usage = usage.copied().unwrap_or_default();
        if usage.session_votes >= limits.session_cap {
            restrictions.push(DenyReason::SessionLimitReached {
                limit: limits.session_cap,
            });
        }
        if usage.address_votes >= limits.address_cap {
            restrictions.push(DenyReason::AddressLimitReached {
                limit: limits.address_cap,
            });
        }
    }

    VotingEligibility {
        can_vote: restrictions.is_empty(),
        reason: restrictions.first().map(|r| r.to_string()),
        can_change_vote: voting_open && has_vote,
        restrictions,
    }
}

/// Build a new vote after validating input and eligibility
pub fn cast_vote(
    debate: &Debate,
    input: &CastVoteInput,
    existing_vote: Option<&Vote>,
    usage: Option<&AnonymousVoteUsage>,
    limits: &VotingLimits,
    now: DateTime<Utc>,
) -> Result<Vote, DebateError> {
    input.validate()?;

    let eligibility = evaluate_eligibility(debate, &input.voter, existing_vote, usage, limits);
    if let Some(reason) = eligibility.restrictions.into_iter().next() {
        return Err(reason.into());
    }

    Ok(Vote::new(debate.id, input.voter.clone(), input.side, now))
}

/// Switch an existing vote to `side` in place, returning the previous side.
///
/// Only permitted while the debate is in `voting`.
pub fn change_vote(
    debate: &Debate,
    vote: &mut Vote,
    side: Side,
    now: DateTime<Utc>,
) -> Result<Side, DenyReason> {
    if debate.status != DebateStatus::Voting {
        return Err(DenyReason::DebateNotVoting {
            status: debate.status,
        });
    }
    if vote.debate_id != debate.id {
        return Err(DenyReason::NoExistingVote);
    }
    if vote.side == side {
        return Err(DenyReason::SameSide { side });
    }

    let previous = vote.side;
    vote.side = side;
    vote.updated_at = now;
    Ok(previous)
}

/// Outcome of a debate's vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    For,
    Against,
    Tie,
    /// No votes cast
    None,
}

impl Winner {
    /// The winning side, if there is one
    pub fn side(&self) -> Option<Side> {
        match self {
            Self::For => Some(Side::For),
            Self::Against => Some(Side::Against),
            Self::Tie | Self::None => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::For => "for",
            Self::Against => "against",
            Self::Tie => "tie",
            Self::None => "none",
        }
    }
}

/// Tallied vote results with percentages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoteResults {
    pub for_count: u64,
    pub against_count: u64,
    pub total: u64,
    pub for_percentage: f64,
    pub against_percentage: f64,
    pub winner: Winner,
}

/// Default decimal places kept in percentages
pub const DEFAULT_PERCENT_DECIMALS: u32 = 1;

/// Compute results with percentages rounded to one decimal place
pub fn calculate_vote_results(counts: VoteCounts) -> VoteResults {
    calculate_vote_results_with(counts, DEFAULT_PERCENT_DECIMALS)
}

/// Compute results with percentages rounded to `decimals` places
pub fn calculate_vote_results_with(counts: VoteCounts, decimals: u32) -> VoteResults {
    let total = counts.total();

    let (for_percentage, against_percentage) = if total == 0 {
        (0.0, 0.0)
    } else {
        (
            round_percentage(percentage(counts.for_count, total), decimals),
            round_percentage(percentage(counts.against_count, total), decimals),
        )
    };

    let winner = if total == 0 {
        Winner::None
    } else if counts.for_count > counts.against_count {
        Winner::For
    } else if counts.against_count > counts.for_count {
        Winner::Against
    } else {
        Winner::Tie
    };

    VoteResults {
        for_count: counts.for_count,
        against_count: counts.against_count,
        total,
        for_percentage,
        against_percentage,
        winner,
    }
}

/// `part / total` as a percentage; 0 when `total` is 0
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

/// Round half away from zero to `decimals` places.
///
/// `decimals` is capped at [`MAX_PERCENT_DECIMALS`].
pub fn round_percentage(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_PERCENT_DECIMALS) as i32);
    (value * factor).round() / factor
}
