//! The survey schema: ordered questions plus survey-level settings.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LifecycleError, SchemaError};
use crate::lifecycle::SurveyStatus;
use crate::question::Question;
use crate::registry;

/// Survey-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveySettings {
    /// Collect responses without respondent identity.
    #[serde(default)]
    pub anonymous: bool,
    /// Allow one respondent to submit more than once.
    #[serde(default)]
    pub allow_multiple_responses: bool,
    /// Inclusive start of the response window.
    #[serde(default)]
    pub opens_at: Option<DateTime<Utc>>,
    /// Inclusive end of the response window.
    #[serde(default)]
    pub closes_at: Option<DateTime<Utc>>,
}

impl SurveySettings {
    fn validate(&self) -> Result<(), String> {
        if let (Some(opens), Some(closes)) = (self.opens_at, self.closes_at) {
            if closes < opens {
                return Err(format!(
                    "response window closes ({closes}) before it opens ({opens})"
                ));
            }
        }
        Ok(())
    }
}

/// A named, ordered collection of questions with lifecycle status.
///
/// Fields are private: status changes only through [`Survey::transition`] and
/// the question list only through the structural operations, so the schema
/// invariants hold by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    id: Uuid,
    title: String,
    status: SurveyStatus,
    settings: SurveySettings,
    questions: Vec<Question>,
}

impl Survey {
    /// Create a new survey in `draft`.
    ///
    /// The title may still be empty here; activation is the enforcement
    /// point for a non-empty title.
    pub fn new(title: impl Into<String>, settings: SurveySettings) -> Result<Self, SchemaError> {
        settings.validate().map_err(SchemaError::InvalidSettings)?;
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.into(),
            status: SurveyStatus::Draft,
            settings,
            questions: Vec::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> SurveyStatus {
        self.status
    }

    pub fn settings(&self) -> &SurveySettings {
        &self.settings
    }

    /// The questions in presentation order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Look up a question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Rename the survey. Disallowed once closed.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), SchemaError> {
        if self.status.is_terminal() {
            return Err(SchemaError::SurveyLocked(self.status));
        }
        self.title = title.into();
        Ok(())
    }

    /// Append a question.
    ///
    /// Fails while the survey is `active` or `closed`, on a duplicate id,
    /// and on malformed type-specific configuration.
    pub fn add_question(&mut self, question: Question) -> Result<(), SchemaError> {
        if !self.status.allows_editing() {
            return Err(SchemaError::SurveyLocked(self.status));
        }
        if self.questions.iter().any(|q| q.id == question.id) {
            return Err(SchemaError::DuplicateQuestionId(question.id));
        }
        if question.id.trim().is_empty() {
            return Err(SchemaError::InvalidQuestionConfig {
                question_id: question.id,
                reason: "question id is empty".into(),
            });
        }
        if question.prompt.trim().is_empty() {
            return Err(SchemaError::InvalidQuestionConfig {
                question_id: question.id,
                reason: "prompt is empty".into(),
            });
        }
        registry::validate_config(&question.kind).map_err(|reason| {
            SchemaError::InvalidQuestionConfig {
                question_id: question.id.clone(),
                reason,
            }
        })?;
        self.questions.push(question);
        Ok(())
    }

    /// Remove a question by id.
    ///
    /// This is the schema-level operation; callers holding stored responses
    /// must go through [`crate::engine::SurveyEngine::remove_question`],
    /// which additionally protects answered questions.
    pub fn remove_question(&mut self, id: &str) -> Result<Question, SchemaError> {
        if !self.status.allows_editing() {
            return Err(SchemaError::SurveyLocked(self.status));
        }
        let position = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| SchemaError::QuestionNotFound(id.to_string()))?;
        Ok(self.questions.remove(position))
    }

    /// Reorder the questions. `order` must be a permutation of the current
    /// question ids.
    pub fn reorder<S: AsRef<str>>(&mut self, order: &[S]) -> Result<(), SchemaError> {
        if !self.status.allows_editing() {
            return Err(SchemaError::SurveyLocked(self.status));
        }
        if order.len() != self.questions.len() {
            return Err(SchemaError::InvalidPermutation(format!(
                "expected {} ids, got {}",
                self.questions.len(),
                order.len()
            )));
        }
        let mut seen = HashSet::new();
        for id in order {
            let id = id.as_ref();
            if !seen.insert(id) {
                return Err(SchemaError::InvalidPermutation(format!(
                    "id '{id}' appears more than once"
                )));
            }
            if !self.questions.iter().any(|q| q.id == id) {
                return Err(SchemaError::InvalidPermutation(format!("unknown id '{id}'")));
            }
        }
        let positions: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_ref(), i))
            .collect();
        self.questions
            .sort_by_key(|q| positions.get(q.id.as_str()).copied().unwrap_or(usize::MAX));
        Ok(())
    }

    /// Apply a lifecycle transition. The only mutation path for the status.
    ///
    /// On failure the prior state is left intact; a failed transition blocks
    /// only itself.
    pub fn transition(&mut self, target: SurveyStatus) -> Result<(), LifecycleError> {
        if self.status.is_terminal() {
            return Err(LifecycleError::SurveyAlreadyClosed);
        }
        if !self.status.can_transition_to(target) {
            return Err(LifecycleError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        if target == SurveyStatus::Active {
            if self.title.trim().is_empty() {
                return Err(LifecycleError::CannotActivateUntitledSurvey);
            }
            if self.questions.is_empty() {
                return Err(LifecycleError::CannotActivateEmptySurvey);
            }
        }
        self.status = target;
        Ok(())
    }
}
