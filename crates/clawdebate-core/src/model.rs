//! Row types for debates, stages, arguments and votes
//!
//! These mirror what the storage layer hands back. They carry no behaviour
//! beyond small derived facts (calendar day of a submission, status ordering).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a debate
pub type DebateId = Uuid;

/// Unique identifier for a stage
pub type StageId = Uuid;

/// Unique identifier for an agent
pub type AgentId = Uuid;

/// Unique identifier for an authenticated user
pub type UserId = Uuid;

/// Lifecycle status of a debate. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebateStatus {
    /// Created, not yet accepting arguments
    Pending,
    /// Agents are submitting arguments
    Active,
    /// Arguments closed, humans are voting
    Voting,
    /// Final
    Completed,
}

impl DebateStatus {
    /// All statuses in lifecycle order
    pub const ALL: [DebateStatus; 4] = [
        DebateStatus::Pending,
        DebateStatus::Active,
        DebateStatus::Voting,
        DebateStatus::Completed,
    ];

    /// Position in the lifecycle (0 = pending)
    pub fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Active => 1,
            Self::Voting => 2,
            Self::Completed => 3,
        }
    }

    /// The status that directly follows this one, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Active),
            Self::Active => Some(Self::Voting),
            Self::Voting => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Whether moving to `target` is a forward move
    pub fn can_advance_to(&self, target: Self) -> bool {
        target.rank() > self.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Voting => "voting",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for DebateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of a debate an argument or vote supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    For,
    Against,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::For => "for",
            Self::Against => "against",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A debate between agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debate {
    /// Unique ID
    pub id: DebateId,
    /// The motion being debated
    pub title: String,
    /// Longer framing of the motion
    #[serde(default)]
    pub description: String,
    /// Topic category (e.g. "technology")
    pub category: String,
    /// Current lifecycle status
    pub status: DebateStatus,
    /// When the debate was created
    pub created_at: DateTime<Utc>,
    /// When voting closes, if scheduled
    #[serde(default)]
    pub voting_deadline: Option<DateTime<Utc>>,
}

impl Debate {
    /// Create a new pending debate
    pub fn new(title: &str, category: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            category: category.to_string(),
            status: DebateStatus::Pending,
            created_at: now,
            voting_deadline: None,
        }
    }

    /// Whether the voting deadline has passed at `now`
    pub fn voting_deadline_passed(&self, now: DateTime<Utc>) -> bool {
        self.voting_deadline.is_some_and(|deadline| now >= deadline)
    }
}

/// An ordered phase of a debate (Opening, Rebuttal, Closing, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub debate_id: DebateId,
    /// Position within the debate, unique per debate
    pub order: u32,
    pub label: String,
    /// At most one stage per debate is active
    pub active: bool,
}

impl Stage {
    pub fn new(debate_id: DebateId, order: u32, label: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            debate_id,
            order,
            label: label.to_string(),
            active: false,
        }
    }
}

/// A single submission by an agent within a stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub id: Uuid,
    pub debate_id: DebateId,
    pub stage_id: StageId,
    pub agent_id: AgentId,
    pub side: Side,
    /// Argument body
    pub content: String,
    /// Model identifier the agent ran on
    pub model: String,
    pub created_at: DateTime<Utc>,
}

impl Argument {
    /// UTC calendar day the argument was submitted on
    pub fn submitted_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Body length in characters
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Who cast a vote. Exactly one identity kind is ever populated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoterIdentity {
    /// Authenticated user
    User { user_id: UserId },
    /// Cookie-bound anonymous session
    Anonymous { session_id: String },
}

impl VoterIdentity {
    pub fn user(user_id: UserId) -> Self {
        Self::User { user_id }
    }

    pub fn anonymous(session_id: impl Into<String>) -> Self {
        Self::Anonymous {
            session_id: session_id.into(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous { .. })
    }
}

impl fmt::Display for VoterIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User { user_id } => write!(f, "user:{}", user_id),
            Self::Anonymous { session_id } => write!(f, "session:{}", session_id),
        }
    }
}

/// A human vote on a debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub id: Uuid,
    pub debate_id: DebateId,
    pub voter: VoterIdentity,
    pub side: Side,
    pub created_at: DateTime<Utc>,
    /// Last time the side was changed
    pub updated_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(debate_id: DebateId, voter: VoterIdentity, side: Side, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            debate_id,
            voter,
            side,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this vote was cast by `voter` on `debate_id`
    pub fn belongs_to(&self, debate_id: DebateId, voter: &VoterIdentity) -> bool {
        self.debate_id == debate_id && &self.voter == voter
    }
}

/// Lifetime vote counters for an anonymous voter, loaded from the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymousVoteUsage {
    /// Votes cast by this session cookie
    pub session_votes: u32,
    /// Votes cast from the originating IP address
    pub address_votes: u32,
}

/// Raw per-side vote tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
    #[serde(rename = "for")]
    pub for_count: u64,
    #[serde(rename = "against")]
    pub against_count: u64,
}

impl VoteCounts {
    pub fn new(for_count: u64, against_count: u64) -> Self {
        Self {
            for_count,
            against_count,
        }
    }

    /// Tally a set of votes by side
    pub fn tally<'a>(votes: impl IntoIterator<Item = &'a Vote>) -> Self {
        votes.into_iter().fold(Self::default(), |mut acc, vote| {
            match vote.side {
                Side::For => acc.for_count += 1,
                Side::Against => acc.against_count += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> u64 {
        self.for_count + self.against_count
    }

    /// Count for one side
    pub fn side(&self, side: Side) -> u64 {
        match side {
            Side::For => self.for_count,
            Side::Against => self.against_count,
        }
    }
}

/// A debating agent (referenced by id, not owned by a debate)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_moves_forward_only() {
        assert!(DebateStatus::Pending.can_advance_to(DebateStatus::Active));
        assert!(DebateStatus::Active.can_advance_to(DebateStatus::Completed));
        assert!(!DebateStatus::Voting.can_advance_to(DebateStatus::Active));
        assert!(!DebateStatus::Voting.can_advance_to(DebateStatus::Voting));
        assert_eq!(DebateStatus::Completed.next(), None);
    }

    #[test]
    fn test_voter_identity_serde_is_tagged() {
        let anon = VoterIdentity::anonymous("cookie-123");
        let json = serde_json::to_value(&anon).unwrap();
        assert_eq!(json["kind"], "anonymous");
        assert_eq!(json["session_id"], "cookie-123");

        let back: VoterIdentity = serde_json::from_value(json).unwrap();
        assert_eq!(back, anon);
    }

    #[test]
    fn test_argument_submission_day_is_utc() {
        let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 23, 59, 59).unwrap();
        let arg = Argument {
            id: Uuid::new_v4(),
            debate_id: Uuid::new_v4(),
            stage_id: Uuid::new_v4(),
            agent_id: Uuid::new_v4(),
            side: Side::For,
            content: "é".repeat(4),
            model: "gpt-4o".to_string(),
            created_at,
        };
        assert_eq!(arg.submitted_on(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(arg.char_len(), 4);
    }

    #[test]
    fn test_vote_counts_tally() {
        let debate_id = Uuid::new_v4();
        let now = Utc::now();
        let votes = vec![
            Vote::new(debate_id, VoterIdentity::anonymous("a"), Side::For, now),
            Vote::new(debate_id, VoterIdentity::anonymous("b"), Side::Against, now),
            Vote::new(debate_id, VoterIdentity::user(Uuid::new_v4()), Side::For, now),
        ];
        let counts = VoteCounts::tally(&votes);
        assert_eq!(counts, VoteCounts::new(2, 1));
        assert_eq!(counts.total(), 3);
    }
}
