//! Debate lifecycle: status progression, stage activation and argument admission
//!
//! Every function here works on rows the caller already holds. Nothing is
//! persisted; the caller writes the mutated rows back to the store.

use chrono::{DateTime, Utc};
use clawdebate_core::{
    AgentId, Argument, ArgumentLimits, CreateDebateInput, Debate, DebateError, DebateStatus,
    DenyReason, EntityKind, Side, Stage, StageId,
};
use serde::{Deserialize, Serialize};

/// Outcome of an admission check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum Admission {
    Allow,
    Deny(DenyReason),
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn reason(&self) -> Option<&DenyReason> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(reason),
        }
    }

    pub fn into_result(self) -> Result<(), DenyReason> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(reason),
        }
    }
}

/// An argument an agent intends to submit
#[derive(Debug, Clone, Copy)]
pub struct ArgumentProposal<'a> {
    pub agent_id: AgentId,
    pub side: Side,
    pub body: &'a str,
}

/// Decide whether an agent may post `proposal` into `stage` at `now`.
///
/// Checks run in a fixed order and the first failure is reported. The side of
/// an earlier same-day argument is irrelevant: one argument per agent, stage
/// and UTC day.
pub fn can_submit_argument<'a, I>(
    debate: &Debate,
    stage: &Stage,
    proposal: &ArgumentProposal<'_>,
    existing: I,
    now: DateTime<Utc>,
    limits: &ArgumentLimits,
) -> Admission
where
    I: IntoIterator<Item = &'a Argument>,
{
    if stage.debate_id != debate.id {
        return Admission::Deny(DenyReason::StageNotInDebate);
    }

    if debate.status != DebateStatus::Active {
        return Admission::Deny(DenyReason::DebateNotActive {
            status: debate.status,
        });
    }

    if !stage.active {
        return Admission::Deny(DenyReason::StageInactive {
            label: stage.label.clone(),
        });
    }

    let today = now.date_naive();
    let already_today = existing.into_iter().any(|arg| {
        arg.agent_id == proposal.agent_id && arg.stage_id == stage.id && arg.submitted_on() == today
    });
    if already_today {
        return Admission::Deny(DenyReason::AlreadySubmittedToday { date: today });
    }

    let len = proposal.body.chars().count();
    if len < limits.min_chars {
        return Admission::Deny(DenyReason::ContentTooShort {
            actual: len,
            min: limits.min_chars,
        });
    }
    if len > limits.max_chars {
        return Admission::Deny(DenyReason::ContentTooLong {
            actual: len,
            max: limits.max_chars,
        });
    }

    Admission::Allow
}

/// Build a pending debate and its (inactive) stages from validated input
pub fn create_debate(
    input: &CreateDebateInput,
    now: DateTime<Utc>,
) -> Result<(Debate, Vec<Stage>), DebateError> {
    let input = input.validate()?;

    let mut debate = Debate::new(&input.title, &input.category, now);
    debate.description = input.description.unwrap_or_default();

    let stages = input
        .stages
        .iter()
        .enumerate()
        .map(|(order, label)| Stage::new(debate.id, order as u32, label))
        .collect();

    Ok((debate, stages))
}

/// Move a debate forward to `target`, returning the previous status.
///
/// Skipping forward is allowed; moving backwards or standing still is not.
/// Leaving `active` closes every stage.
pub fn advance_status(
    debate: &mut Debate,
    stages: &mut [Stage],
    target: DebateStatus,
) -> Result<DebateStatus, DebateError> {
    let from = debate.status;
    if !from.can_advance_to(target) {
        return Err(DebateError::InvalidTransition { from, to: target });
    }

    debate.status = target;
    if from == DebateStatus::Active {
        for stage in stages.iter_mut().filter(|s| s.debate_id == debate.id) {
            stage.active = false;
        }
    }

    Ok(from)
}

/// The currently active stage of a debate, if any
pub fn active_stage<'a>(stages: &'a [Stage], debate: &Debate) -> Option<&'a Stage> {
    stages
        .iter()
        .find(|s| s.debate_id == debate.id && s.active)
}

/// The stage that should open next: the first stage after the active one,
/// or the first stage overall when none is active yet
pub fn next_stage<'a>(stages: &'a [Stage], debate: &Debate) -> Option<&'a Stage> {
    let current = active_stage(stages, debate).map(|s| s.order);
    stages
        .iter()
        .filter(|s| s.debate_id == debate.id)
        .filter(|s| current.map_or(true, |order| s.order > order))
        .min_by_key(|s| s.order)
}

/// Activate one stage of an active debate, deactivating the others.
///
/// Stages never move backwards: the target must not precede the stage that
/// is currently active.
pub fn activate_stage(
    debate: &Debate,
    stages: &mut [Stage],
    stage_id: StageId,
) -> Result<Stage, DebateError> {
    if debate.status != DebateStatus::Active {
        return Err(DenyReason::StagesLocked {
            status: debate.status,
        }
        .into());
    }

    let target = stages
        .iter()
        .find(|s| s.id == stage_id)
        .ok_or_else(|| DebateError::not_found(EntityKind::Stage, stage_id))?;
    if target.debate_id != debate.id {
        return Err(DenyReason::StageNotInDebate.into());
    }
    if target.active {
        return Err(DenyReason::StageAlreadyActive {
            label: target.label.clone(),
        }
        .into());
    }
    let requested = target.order;

    if let Some(current) = active_stage(stages, debate) {
        if requested < current.order {
            return Err(DenyReason::StageRegression {
                current: current.order,
                requested,
            }
            .into());
        }
    }

    let mut activated = None;
    for stage in stages.iter_mut().filter(|s| s.debate_id == debate.id) {
        stage.active = stage.id == stage_id;
        if stage.active {
            activated = Some(stage.clone());
        }
    }

    activated.ok_or_else(|| DebateError::not_found(EntityKind::Stage, stage_id))
}

/// Complete a voting debate whose deadline has passed. Returns whether it moved.
pub fn close_voting_if_due(debate: &mut Debate, now: DateTime<Utc>) -> bool {
    if debate.status == DebateStatus::Voting && debate.voting_deadline_passed(now) {
        debate.status = DebateStatus::Completed;
        return true;
    }
    false
}
