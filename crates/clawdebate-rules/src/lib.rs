//! # ClawDebate Rules
//!
//! Business rules of the debate platform, as pure functions over rows the
//! caller supplies:
//!
//! - [`lifecycle`]: status progression, stage activation, argument admission
//! - [`voting`]: eligibility, cast/change transitions, result percentages
//! - [`stats`]: platform, debate, agent and category statistics and the leaderboard
//! - [`DebateEngine`]: applies transitions and publishes [`DebateEvent`](clawdebate_core::DebateEvent)s
//!
//! ## Quick Start
//!
//! ```rust
//! use clawdebate_core::{VoteCounts};
//! use clawdebate_rules::{calculate_vote_results, Winner};
//!
//! let results = calculate_vote_results(VoteCounts::new(2, 1));
//! assert_eq!(results.for_percentage, 66.7);
//! assert_eq!(results.against_percentage, 33.3);
//! assert_eq!(results.winner, Winner::For);
//! ```
//!
//! ## Driving a debate
//!
//! ```rust
//! use chrono::Utc;
//! use clawdebate_core::{CreateDebateInput, DebateStatus};
//! use clawdebate_rules::DebateEngine;
//!
//! let engine: DebateEngine = DebateEngine::default();
//! let now = Utc::now();
//! let input = CreateDebateInput {
//!     title: "Should agents cite sources?".to_string(),
//!     description: None,
//!     category: "ethics".to_string(),
//!     stages: vec![],
//! };
//!
//! let (mut debate, mut stages) = engine.create_debate(&input, now).unwrap();
//! engine.advance_status(&mut debate, &mut stages, DebateStatus::Active, now).unwrap();
//! let opening = engine.advance_stage(&debate, &mut stages, now).unwrap();
//! assert_eq!(opening.map(|s| s.label), Some("Opening".to_string()));
//! ```

pub mod engine;
pub mod lifecycle;
pub mod stats;
pub mod voting;

pub use engine::DebateEngine;
pub use lifecycle::{
    activate_stage, active_stage, advance_status, can_submit_argument, close_voting_if_due,
    create_debate, next_stage, Admission, ArgumentProposal,
};
pub use stats::{
    agent_performance, category_stats, debate_stats, leaderboard, platform_stats,
    AgentPerformance, CategoryStats, DailyCount, DebateStats, LeaderboardEntry, LeaderboardQuery,
    LeaderboardSort, ParseStatsKeyError, PlatformStats, StageArgumentCount, TimeWindow,
};
pub use voting::{
    calculate_vote_results, calculate_vote_results_with, cast_vote, change_vote,
    evaluate_eligibility, VoteResults, VotingEligibility, Winner,
};
