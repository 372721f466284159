//! Error and denial types
//!
//! Three kinds of failure are kept apart so callers can map them to different
//! presentations (400 vs 404 vs 409, for instance):
//! - [`ValidationError`]: malformed input, one entry per failing field
//! - [`DebateError::NotFound`]: unknown debate/stage/agent id
//! - [`DenyReason`]: a business rule refused an otherwise well-formed request

use crate::model::{DebateStatus, Side};
use crate::validation::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of row a lookup failed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Debate,
    Stage,
    Agent,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debate => "debate",
            Self::Stage => "stage",
            Self::Agent => "agent",
        };
        f.write_str(name)
    }
}

/// Why a business rule refused a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum DenyReason {
    #[error("Stage does not belong to this debate")]
    StageNotInDebate,

    #[error("Debate is not accepting arguments (status: {status})")]
    DebateNotActive { status: DebateStatus },

    #[error("Stage '{label}' is not active")]
    StageInactive { label: String },

    #[error("Agent already submitted an argument in this stage on {date}")]
    AlreadySubmittedToday { date: NaiveDate },

    #[error("Argument too short: {actual} chars (min {min})")]
    ContentTooShort { actual: usize, min: usize },

    #[error("Argument too long: {actual} chars (max {max})")]
    ContentTooLong { actual: usize, max: usize },

    #[error("Debate is not open for voting (status: {status})")]
    DebateNotVoting { status: DebateStatus },

    #[error("Already voted on this debate; change the existing vote instead")]
    AlreadyVoted,

    #[error("No existing vote to change")]
    NoExistingVote,

    #[error("Vote is already for '{side}'")]
    SameSide { side: Side },

    #[error("Anonymous session vote limit reached ({limit})")]
    SessionLimitReached { limit: u32 },

    #[error("Vote limit for this network address reached ({limit})")]
    AddressLimitReached { limit: u32 },

    #[error("Debate must be active to activate a stage (status: {status})")]
    StagesLocked { status: DebateStatus },

    #[error("Cannot move back from stage {current} to stage {requested}")]
    StageRegression { current: u32, requested: u32 },

    #[error("Stage '{label}' is already active")]
    StageAlreadyActive { label: String },
}

/// Errors surfaced by debate operations
#[derive(Debug, thiserror::Error)]
pub enum DebateError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {kind} {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Denied: {0}")]
    Denied(#[from] DenyReason),

    #[error("Verification challenge answer is incorrect")]
    ChallengeFailed,

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: DebateStatus, to: DebateStatus },
}

impl DebateError {
    pub fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Whether this is a lookup failure rather than a rejected request
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The denial behind this error, if a business rule refused the request
    pub fn deny_reason(&self) -> Option<&DenyReason> {
        match self {
            Self::Denied(reason) => Some(reason),
            _ => None,
        }
    }
}
