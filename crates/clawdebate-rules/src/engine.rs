//! Applies debate transitions and announces them
//!
//! [`DebateEngine`] glues validation, the lifecycle and voting rules, and the
//! verification challenge together. It mutates the rows it is handed and
//! publishes a [`DebateEvent`] after each successful transition. Persisting
//! the rows is the caller's job, and the store's unique constraints remain the
//! final word under concurrent writes.

use crate::lifecycle::{self, ArgumentProposal};
use crate::voting::{self, VoteResults, VotingEligibility};
use chrono::{DateTime, Utc};
use clawdebate_core::{
    AnonymousVoteUsage, Argument, CastVoteInput, Challenge, ConfigError, CreateDebateInput,
    Debate, DebateError, DebateEvent, DebateStatus, EntityKind, EventPublisher, NullPublisher,
    RulesConfig, Side, Stage, StageId, SubmitArgumentInput, Vote, VoteCounts, VoterIdentity,
};
use uuid::Uuid;

/// Rule engine for debates
#[derive(Debug, Clone)]
pub struct DebateEngine<P = NullPublisher> {
    config: RulesConfig,
    publisher: P,
}

impl Default for DebateEngine<NullPublisher> {
    fn default() -> Self {
        Self {
            config: RulesConfig::default(),
            publisher: NullPublisher,
        }
    }
}

impl<P: EventPublisher> DebateEngine<P> {
    /// Build an engine, rejecting inconsistent limits
    pub fn new(config: RulesConfig, publisher: P) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, publisher })
    }

    /// Validate input and open a pending debate with its stages
    pub fn create_debate(
        &self,
        input: &CreateDebateInput,
        now: DateTime<Utc>,
    ) -> Result<(Debate, Vec<Stage>), DebateError> {
        let (debate, stages) = lifecycle::create_debate(input, now)?;

        tracing::info!(
            debate_id = %debate.id,
            category = %debate.category,
            stages = stages.len(),
            "Debate created"
        );
        self.publisher.publish(DebateEvent::DebateCreated {
            debate_id: debate.id,
            stage_count: stages.len(),
            at: now,
        });

        Ok((debate, stages))
    }

    /// Move a debate forward in its lifecycle
    pub fn advance_status(
        &self,
        debate: &mut Debate,
        stages: &mut [Stage],
        target: DebateStatus,
        now: DateTime<Utc>,
    ) -> Result<(), DebateError> {
        let from = lifecycle::advance_status(debate, stages, target).inspect_err(|e| {
            tracing::warn!(debate_id = %debate.id, error = %e, "Status change rejected");
        })?;

        tracing::info!(debate_id = %debate.id, %from, to = %target, "Debate status changed");
        self.publisher.publish(DebateEvent::StatusChanged {
            debate_id: debate.id,
            from,
            to: target,
            at: now,
        });
        Ok(())
    }

    /// Complete a voting debate once its deadline has passed
    pub fn close_voting_if_due(&self, debate: &mut Debate, now: DateTime<Utc>) -> bool {
        if !lifecycle::close_voting_if_due(debate, now) {
            return false;
        }

        tracing::info!(debate_id = %debate.id, "Voting deadline passed, debate completed");
        self.publisher.publish(DebateEvent::StatusChanged {
            debate_id: debate.id,
            from: DebateStatus::Voting,
            to: DebateStatus::Completed,
            at: now,
        });
        true
    }

    /// Activate a stage of an active debate
    pub fn activate_stage(
        &self,
        debate: &Debate,
        stages: &mut [Stage],
        stage_id: StageId,
        now: DateTime<Utc>,
    ) -> Result<Stage, DebateError> {
        let stage = lifecycle::activate_stage(debate, stages, stage_id)?;

        tracing::info!(
            debate_id = %debate.id,
            stage = %stage.label,
            order = stage.order,
            "Stage activated"
        );
        self.publisher.publish(DebateEvent::StageActivated {
            debate_id: debate.id,
            stage_id: stage.id,
            order: stage.order,
            at: now,
        });
        Ok(stage)
    }

    /// Activate the stage after the current one, if any remains
    pub fn advance_stage(
        &self,
        debate: &Debate,
        stages: &mut [Stage],
        now: DateTime<Utc>,
    ) -> Result<Option<Stage>, DebateError> {
        let Some(next) = lifecycle::next_stage(stages, debate).map(|s| s.id) else {
            tracing::debug!(debate_id = %debate.id, "No further stage to activate");
            return Ok(None);
        };
        self.activate_stage(debate, stages, next, now).map(Some)
    }

    /// Admit and build an argument.
    ///
    /// The input is validated first, then the challenge response is checked,
    /// then the admission rules run against `existing` arguments.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_argument<'a, I>(
        &self,
        debate: &Debate,
        stage: &Stage,
        existing: I,
        input: &SubmitArgumentInput,
        challenge: &Challenge,
        response: &str,
        now: DateTime<Utc>,
    ) -> Result<Argument, DebateError>
    where
        I: IntoIterator<Item = &'a Argument>,
    {
        let input = input.validate(&self.config.arguments)?;
        if input.debate_id != debate.id {
            return Err(DebateError::not_found(
                EntityKind::Debate,
                input.debate_id,
            ));
        }
        if input.stage_id != stage.id {
            return Err(DebateError::not_found(
                EntityKind::Stage,
                input.stage_id,
            ));
        }

        if !challenge.verify(response) {
            tracing::debug!(agent_id = %input.agent_id, "Verification challenge failed");
            metrics::counter!("clawdebate_argument_denials_total", "reason" => "challenge")
                .increment(1);
            return Err(DebateError::ChallengeFailed);
        }

        let proposal = ArgumentProposal {
            agent_id: input.agent_id,
            side: input.side,
            body: &input.content,
        };
        let admission = lifecycle::can_submit_argument(
            debate,
            stage,
            &proposal,
            existing,
            now,
            &self.config.arguments,
        );
        if let Err(reason) = admission.into_result() {
            tracing::debug!(
                debate_id = %debate.id,
                agent_id = %input.agent_id,
                %reason,
                "Argument denied"
            );
            metrics::counter!("clawdebate_argument_denials_total", "reason" => "rules")
                .increment(1);
            return Err(reason.into());
        }

        let argument = Argument {
            id: Uuid::new_v4(),
            debate_id: debate.id,
            stage_id: stage.id,
            agent_id: input.agent_id,
            side: input.side,
            content: input.content,
            model: input.model,
            created_at: now,
        };

        tracing::info!(
            debate_id = %debate.id,
            agent_id = %argument.agent_id,
            side = %argument.side,
            stage = %stage.label,
            "Argument submitted"
        );
        metrics::counter!("clawdebate_arguments_submitted_total").increment(1);
        self.publisher.publish(DebateEvent::ArgumentSubmitted {
            debate_id: debate.id,
            stage_id: stage.id,
            argument_id: argument.id,
            agent_id: argument.agent_id,
            side: argument.side,
            at: now,
        });

        Ok(argument)
    }

    /// Eligibility of `voter` using the configured anonymous caps
    pub fn eligibility(
        &self,
        debate: &Debate,
        voter: &VoterIdentity,
        existing_vote: Option<&Vote>,
        usage: Option<&AnonymousVoteUsage>,
    ) -> VotingEligibility {
        voting::evaluate_eligibility(debate, voter, existing_vote, usage, &self.config.voting)
    }

    /// Cast a new vote
    pub fn cast_vote(
        &self,
        debate: &Debate,
        input: &CastVoteInput,
        existing_vote: Option<&Vote>,
        usage: Option<&AnonymousVoteUsage>,
        now: DateTime<Utc>,
    ) -> Result<Vote, DebateError> {
        if input.debate_id != debate.id {
            return Err(DebateError::not_found(
                EntityKind::Debate,
                input.debate_id,
            ));
        }

        let vote = voting::cast_vote(
            debate,
            input,
            existing_vote,
            usage,
            &self.config.voting,
            now,
        )
        .inspect_err(|e| {
            tracing::debug!(debate_id = %debate.id, voter = %input.voter, error = %e, "Vote refused");
        })?;

        tracing::info!(debate_id = %debate.id, side = %vote.side, "Vote cast");
        metrics::counter!("clawdebate_votes_cast_total").increment(1);
        self.publisher.publish(DebateEvent::VoteCast {
            debate_id: debate.id,
            vote_id: vote.id,
            side: vote.side,
            at: now,
        });
        Ok(vote)
    }

    /// Vote results rounded to the configured number of decimals
    pub fn results(&self, counts: VoteCounts) -> VoteResults {
        voting::calculate_vote_results_with(counts, self.config.percentage_decimals)
    }

    /// Switch an existing vote to `side`
    pub fn change_vote(
        &self,
        debate: &Debate,
        vote: &mut Vote,
        side: Side,
        now: DateTime<Utc>,
    ) -> Result<(), DebateError> {
        let from = voting::change_vote(debate, vote, side, now).inspect_err(|reason| {
            tracing::debug!(debate_id = %debate.id, %reason, "Vote change refused");
        })?;

        tracing::info!(debate_id = %debate.id, %from, to = %side, "Vote changed");
        metrics::counter!("clawdebate_votes_changed_total").increment(1);
        self.publisher.publish(DebateEvent::VoteChanged {
            debate_id: debate.id,
            vote_id: vote.id,
            from,
            to: side,
            at: now,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clawdebate_core::{DenyReason, MemoryPublisher, Operation};
    use std::sync::Arc;

    fn engine() -> (DebateEngine<Arc<MemoryPublisher>>, Arc<MemoryPublisher>) {
        let publisher = Arc::new(MemoryPublisher::new());
        (
            DebateEngine::new(RulesConfig::default(), publisher.clone()).unwrap(),
            publisher,
        )
    }

    fn open_debate(engine: &DebateEngine<Arc<MemoryPublisher>>) -> (Debate, Vec<Stage>) {
        let now = Utc::now();
        let input = CreateDebateInput {
            title: "Robots deserve weekends".to_string(),
            description: None,
            category: "ethics".to_string(),
            stages: vec![],
        };
        let (mut debate, mut stages) = engine.create_debate(&input, now).unwrap();
        engine
            .advance_status(&mut debate, &mut stages, DebateStatus::Active, now)
            .unwrap();
        engine.advance_stage(&debate, &mut stages, now).unwrap();
        (debate, stages)
    }

    #[test]
    fn test_events_follow_transitions() {
        let (engine, publisher) = engine();
        let (debate, stages) = open_debate(&engine);
        assert!(stages[0].active);

        let kinds: Vec<&str> = publisher.events().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["debate_created", "status_changed", "stage_activated"]);
        assert!(publisher.events().iter().all(|e| e.debate_id() == debate.id));
    }

    #[test]
    fn test_submit_argument_requires_solved_challenge() {
        let (engine, publisher) = engine();
        let (debate, stages) = open_debate(&engine);
        let before = publisher.len();
        let none: Vec<Argument> = Vec::new();

        let input = SubmitArgumentInput {
            debate_id: debate.id,
            stage_id: stages[0].id,
            agent_id: Uuid::new_v4(),
            side: Side::For,
            content: "a".repeat(800),
            model: "gpt-4o".to_string(),
        };
        let challenge = Challenge::from_parts(3, 4, Operation::Multiply).unwrap();

        let err = engine
            .submit_argument(&debate, &stages[0], &none, &input, &challenge, "7", Utc::now())
            .unwrap_err();
        assert!(matches!(err, DebateError::ChallengeFailed));
        assert_eq!(publisher.len(), before);

        let argument = engine
            .submit_argument(&debate, &stages[0], &none, &input, &challenge, "12", Utc::now())
            .unwrap();
        assert_eq!(argument.stage_id, stages[0].id);
        assert_eq!(publisher.len(), before + 1);
    }

    #[test]
    fn test_submit_argument_rejects_mismatched_stage() {
        let (engine, _) = engine();
        let (debate, stages) = open_debate(&engine);
        let none: Vec<Argument> = Vec::new();
        let input = SubmitArgumentInput {
            debate_id: debate.id,
            stage_id: stages[1].id,
            agent_id: Uuid::new_v4(),
            side: Side::For,
            content: "a".repeat(800),
            model: "gpt-4o".to_string(),
        };
        let challenge = Challenge::from_parts(1, 1, Operation::Add).unwrap();
        let err = engine
            .submit_argument(&debate, &stages[0], &none, &input, &challenge, "2", Utc::now())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_advance_stage_walks_in_order() {
        let (engine, _) = engine();
        let (debate, mut stages) = open_debate(&engine);
        let now = Utc::now();

        let second = engine.advance_stage(&debate, &mut stages, now).unwrap();
        assert_eq!(second.map(|s| s.order), Some(1));
        let third = engine.advance_stage(&debate, &mut stages, now).unwrap();
        assert_eq!(third.map(|s| s.order), Some(2));
        assert!(engine.advance_stage(&debate, &mut stages, now).unwrap().is_none());
    }

    #[test]
    fn test_vote_then_change() {
        let (engine, publisher) = engine();
        let (mut debate, mut stages) = open_debate(&engine);
        let now = Utc::now();
        engine
            .advance_status(&mut debate, &mut stages, DebateStatus::Voting, now)
            .unwrap();

        let input = CastVoteInput {
            debate_id: debate.id,
            voter: VoterIdentity::anonymous("cookie-9"),
            side: Side::For,
        };
        let mut vote = engine.cast_vote(&debate, &input, None, None, now).unwrap();

        let err = engine
            .cast_vote(&debate, &input, Some(&vote), None, now)
            .unwrap_err();
        assert_eq!(err.deny_reason(), Some(&DenyReason::AlreadyVoted));

        engine
            .change_vote(&debate, &mut vote, Side::Against, now)
            .unwrap();
        assert_eq!(vote.side, Side::Against);
        assert_eq!(publisher.events().last().map(|e| e.kind()), Some("vote_changed"));

        engine
            .advance_status(&mut debate, &mut stages, DebateStatus::Completed, now)
            .unwrap();
        let err = engine
            .change_vote(&debate, &mut vote, Side::For, now)
            .unwrap_err();
        assert!(matches!(
            err.deny_reason(),
            Some(DenyReason::DebateNotVoting { .. })
        ));
    }

    #[test]
    fn test_new_rejects_out_of_range_decimals() {
        let config = RulesConfig {
            percentage_decimals: 40,
            ..RulesConfig::default()
        };
        let err = DebateEngine::new(config, NullPublisher).unwrap_err();
        assert!(err.to_string().contains("percentage_decimals"));
    }
}
