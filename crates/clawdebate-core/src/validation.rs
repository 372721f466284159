//! Input validation for debate creation, argument submission and vote casting
//!
//! Every check runs before any state change. Failures are collected per field
//! rather than stopping at the first one, so a caller can report them all.

use crate::config::ArgumentLimits;
use crate::model::{AgentId, DebateId, Side, StageId, VoterIdentity};
use serde::{Deserialize, Serialize};

/// Stage labels used when a debate is created without explicit stages
pub const DEFAULT_STAGES: [&str; 3] = ["Opening", "Rebuttal", "Closing"];

const TITLE_MIN: usize = 5;
const TITLE_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 2000;
const CATEGORY_MIN: usize = 2;
const CATEGORY_MAX: usize = 50;
const STAGES_MAX: usize = 10;
const STAGE_LABEL_MAX: usize = 50;
const MODEL_MAX: usize = 100;
const SESSION_ID_MAX: usize = 128;

/// A single failing field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Input failed shape checks
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, thiserror::Error)]
#[error("{}", join_field_errors(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut err = Self::default();
        err.push(field, message);
        err
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Names of every failing field
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Trim and strip control characters (newlines and tabs survive when allowed)
pub fn clean_text(input: &str, allow_newlines: bool) -> String {
    input
        .trim()
        .chars()
        .filter(|c| {
            if *c == '\n' || *c == '\t' {
                allow_newlines
            } else {
                !c.is_control()
            }
        })
        .collect()
}

fn check_length(
    errors: &mut ValidationError,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len == 0 && min > 0 {
        errors.push(field, "is required");
    } else if len < min {
        errors.push(field, format!("must be at least {} characters (got {})", min, len));
    } else if len > max {
        errors.push(field, format!("must be at most {} characters (got {})", max, len));
    }
}

/// Request to open a new debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDebateInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    /// Stage labels in order; empty means [`DEFAULT_STAGES`]
    #[serde(default)]
    pub stages: Vec<String>,
}

impl CreateDebateInput {
    /// Validate and return a cleaned copy
    pub fn validate(&self) -> Result<Self, ValidationError> {
        let mut errors = ValidationError::default();

        let title = clean_text(&self.title, false);
        check_length(&mut errors, "title", &title, TITLE_MIN, TITLE_MAX);

        let description = self
            .description
            .as_deref()
            .map(|d| clean_text(d, true))
            .filter(|d| !d.is_empty());
        if let Some(d) = &description {
            check_length(&mut errors, "description", d, 0, DESCRIPTION_MAX);
        }

        let category = clean_text(&self.category, false).to_lowercase();
        check_length(&mut errors, "category", &category, CATEGORY_MIN, CATEGORY_MAX);
        if category
            .chars()
            .any(|c| !c.is_alphanumeric() && c != ' ' && c != '-' && c != '_')
        {
            errors.push("category", "may only contain letters, digits, spaces, '-' and '_'");
        }

        let stages: Vec<String> = if self.stages.is_empty() {
            DEFAULT_STAGES.iter().map(|s| s.to_string()).collect()
        } else {
            self.stages.iter().map(|s| clean_text(s, false)).collect()
        };
        if stages.len() > STAGES_MAX {
            errors.push("stages", format!("at most {} stages allowed", STAGES_MAX));
        }
        for (i, label) in stages.iter().enumerate() {
            check_length(&mut errors, &format!("stages[{}]", i), label, 1, STAGE_LABEL_MAX);
        }

        errors.into_result(Self {
            title,
            description,
            category,
            stages,
        })
    }
}

/// Request by an agent to post an argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitArgumentInput {
    pub debate_id: DebateId,
    pub stage_id: StageId,
    pub agent_id: AgentId,
    pub side: Side,
    pub content: String,
    pub model: String,
}

impl SubmitArgumentInput {
    /// Validate and return a cleaned copy
    pub fn validate(&self, limits: &ArgumentLimits) -> Result<Self, ValidationError> {
        let mut errors = ValidationError::default();

        let content = clean_text(&self.content, true);
        check_length(
            &mut errors,
            "content",
            &content,
            limits.min_chars,
            limits.max_chars,
        );

        let model = clean_text(&self.model, false);
        check_length(&mut errors, "model", &model, 1, MODEL_MAX);

        errors.into_result(Self {
            content,
            model,
            ..self.clone()
        })
    }
}

/// Request to cast a vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastVoteInput {
    pub debate_id: DebateId,
    pub voter: VoterIdentity,
    pub side: Side,
}

impl CastVoteInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();

        if let VoterIdentity::Anonymous { session_id } = &self.voter {
            check_length(&mut errors, "voter.session_id", session_id, 1, SESSION_ID_MAX);
            if session_id
                .chars()
                .any(|c| c.is_whitespace() || c.is_control())
            {
                errors.push("voter.session_id", "must not contain whitespace");
            }
        }

        errors.into_result(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn argument(content: &str) -> SubmitArgumentInput {
        SubmitArgumentInput {
            debate_id: Uuid::new_v4(),
            stage_id: Uuid::new_v4(),
            agent_id: Uuid::new_v4(),
            side: Side::For,
            content: content.to_string(),
            model: "claude-3-5-sonnet".to_string(),
        }
    }

    #[test]
    fn test_create_debate_defaults_stages() {
        let input = CreateDebateInput {
            title: "  Should AI write its own tests?  ".to_string(),
            description: None,
            category: "Technology".to_string(),
            stages: vec![],
        };
        let clean = input.validate().unwrap();
        assert_eq!(clean.title, "Should AI write its own tests?");
        assert_eq!(clean.category, "technology");
        assert_eq!(clean.stages, vec!["Opening", "Rebuttal", "Closing"]);
    }

    #[test]
    fn test_create_debate_reports_every_field() {
        let input = CreateDebateInput {
            title: "AI".to_string(),
            description: Some("x".repeat(2001)),
            category: "<script>".to_string(),
            stages: vec!["Opening".to_string(), "   ".to_string()],
        };
        let err = input.validate().unwrap_err();
        assert!(err.has_field("title"));
        assert!(err.has_field("description"));
        assert!(err.has_field("category"));
        assert!(err.has_field("stages[1]"));
        assert!(!err.has_field("stages[0]"));
    }

    #[test]
    fn test_argument_content_is_trimmed_before_length_check() {
        let padded = format!("   {}   ", "a".repeat(499));
        let err = argument(&padded)
            .validate(&ArgumentLimits::default())
            .unwrap_err();
        assert_eq!(err.fields(), vec!["content"]);
    }

    #[test]
    fn test_argument_strips_control_chars() {
        let body = format!("{}\x00\n{}", "a".repeat(300), "b".repeat(300));
        let clean = argument(&body).validate(&ArgumentLimits::default()).unwrap();
        assert!(!clean.content.contains('\x00'));
        assert!(clean.content.contains('\n'));
        assert_eq!(clean.content.chars().count(), 601);
    }

    #[test]
    fn test_argument_requires_model() {
        let mut input = argument(&"a".repeat(600));
        input.model = "   ".to_string();
        let err = input.validate(&ArgumentLimits::default()).unwrap_err();
        assert_eq!(err.errors[0].message, "is required");
    }

    #[test]
    fn test_vote_rejects_blank_session() {
        let input = CastVoteInput {
            debate_id: Uuid::new_v4(),
            voter: VoterIdentity::anonymous(""),
            side: Side::Against,
        };
        let err = input.validate().unwrap_err();
        assert!(err.has_field("voter.session_id"));

        let ok = CastVoteInput {
            voter: VoterIdentity::user(Uuid::new_v4()),
            ..input
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_display_joins_fields() {
        let mut err = ValidationError::single("title", "is required");
        err.push("category", "is required");
        assert_eq!(err.to_string(), "title: is required; category: is required");

        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.to_string().starts_with("title:"));
    }

    #[test]
    fn test_clean_text_keeps_layout_only_when_asked() {
        assert_eq!(clean_text("  a\x07b\n\tc\x1b ", true), "ab\n\tc");
        assert_eq!(clean_text("  a\x07b\n\tc\x1b ", false), "abc");
    }
}
