//! A point-in-time set of rows fetched from the store
//!
//! Lookups return [`DebateError::NotFound`] for unknown ids so that callers
//! can tell a missing row apart from a rejected request.

use crate::error::{DebateError, EntityKind};
use crate::model::{
    Agent, AgentId, Argument, Debate, DebateId, Stage, StageId, Vote, VoteCounts, VoterIdentity,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebateSnapshot {
    #[serde(default)]
    pub debates: Vec<Debate>,
    #[serde(default)]
    pub stages: Vec<Stage>,
    #[serde(default)]
    pub arguments: Vec<Argument>,
    #[serde(default)]
    pub votes: Vec<Vote>,
    #[serde(default)]
    pub agents: Vec<Agent>,
}

impl DebateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn debate(&self, id: DebateId) -> Result<&Debate, DebateError> {
        self.debates
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| DebateError::not_found(EntityKind::Debate, id))
    }

    pub fn stage(&self, id: StageId) -> Result<&Stage, DebateError> {
        self.stages
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| DebateError::not_found(EntityKind::Stage, id))
    }

    pub fn agent(&self, id: AgentId) -> Result<&Agent, DebateError> {
        self.agents
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| DebateError::not_found(EntityKind::Agent, id))
    }

    /// Display name for an agent, falling back to its id
    pub fn agent_name(&self, id: AgentId) -> String {
        self.agent(id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|_| id.to_string())
    }

    /// Stages of a debate in order
    pub fn stages_for(&self, debate_id: DebateId) -> Vec<&Stage> {
        let mut stages: Vec<&Stage> = self
            .stages
            .iter()
            .filter(|s| s.debate_id == debate_id)
            .collect();
        stages.sort_by_key(|s| s.order);
        stages
    }

    pub fn arguments_for(&self, debate_id: DebateId) -> Vec<&Argument> {
        self.arguments
            .iter()
            .filter(|a| a.debate_id == debate_id)
            .collect()
    }

    pub fn votes_for(&self, debate_id: DebateId) -> Vec<&Vote> {
        self.votes
            .iter()
            .filter(|v| v.debate_id == debate_id)
            .collect()
    }

    pub fn vote_counts(&self, debate_id: DebateId) -> VoteCounts {
        VoteCounts::tally(self.votes.iter().filter(|v| v.debate_id == debate_id))
    }

    /// Existing vote by `voter` on a debate, if any
    pub fn vote_by(&self, debate_id: DebateId, voter: &VoterIdentity) -> Option<&Vote> {
        self.votes.iter().find(|v| v.belongs_to(debate_id, voter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Side;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_unknown_debate_is_not_found() {
        let snapshot = DebateSnapshot::new();
        let err = snapshot.debate(Uuid::new_v4()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_stages_sorted_by_order() {
        let debate = Debate::new("Is Rust fun?", "technology", Utc::now());
        let mut snapshot = DebateSnapshot::new();
        snapshot.stages.push(Stage::new(debate.id, 2, "Closing"));
        snapshot.stages.push(Stage::new(debate.id, 0, "Opening"));
        snapshot.stages.push(Stage::new(Uuid::new_v4(), 1, "Elsewhere"));
        snapshot.stages.push(Stage::new(debate.id, 1, "Rebuttal"));
        snapshot.debates.push(debate.clone());

        let labels: Vec<&str> = snapshot
            .stages_for(debate.id)
            .iter()
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Opening", "Rebuttal", "Closing"]);
    }

    #[test]
    fn test_vote_lookup_by_identity() {
        let debate_id = Uuid::new_v4();
        let voter = VoterIdentity::anonymous("cookie");
        let mut snapshot = DebateSnapshot::new();
        snapshot
            .votes
            .push(Vote::new(debate_id, voter.clone(), Side::Against, Utc::now()));

        assert!(snapshot.vote_by(debate_id, &voter).is_some());
        assert!(snapshot
            .vote_by(debate_id, &VoterIdentity::anonymous("other"))
            .is_none());
        assert_eq!(snapshot.vote_counts(debate_id), VoteCounts::new(0, 1));
    }

    #[test]
    fn test_snapshot_from_json_defaults_missing_tables() {
        let snapshot = DebateSnapshot::from_json(r#"{"debates": []}"#).unwrap();
        assert!(snapshot.votes.is_empty());
        assert!(snapshot.agents.is_empty());
    }
}
