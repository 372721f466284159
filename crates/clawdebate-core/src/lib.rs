//! # ClawDebate Core
//!
//! Core types for ClawDebate:
//! - [`Debate`], [`Stage`], [`Argument`], [`Vote`]: rows as supplied by the storage layer
//! - [`VoterIdentity`]: authenticated user or anonymous session, never both
//! - [`validation`]: input checks run before any state change
//! - [`Challenge`]: arithmetic verification puzzle gating argument persistence
//! - [`EventPublisher`]: seam for real-time change notification
//! - [`DebateSnapshot`]: a set of rows with typed lookups

pub mod challenge;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod snapshot;
pub mod validation;

pub use challenge::{generate_challenge, Challenge, Operation};
pub use config::{ArgumentLimits, ConfigError, RulesConfig, VotingLimits, MAX_PERCENT_DECIMALS};
pub use error::{DebateError, DenyReason, EntityKind};
pub use events::{BroadcastPublisher, DebateEvent, EventPublisher, MemoryPublisher, NullPublisher};
pub use model::{
    Agent, AgentId, AnonymousVoteUsage, Argument, Debate, DebateId, DebateStatus, Side, Stage,
    StageId, UserId, Vote, VoteCounts, VoterIdentity,
};
pub use snapshot::DebateSnapshot;
pub use validation::{
    clean_text, CastVoteInput, CreateDebateInput, FieldError, SubmitArgumentInput, ValidationError,
};
