//! Responses, submissions, and typed answer payloads.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The typed payload of one answer.
///
/// The payload variant must match the kind of the question it answers;
/// [`crate::registry::validate_answer`] enforces the pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    /// 1-based position on a rating scale.
    Rating(u8),
    /// The selected choice of a multiple-choice question.
    Choice(String),
    /// The selected subset of a checkbox question, in selection order.
    Selection(Vec<String>),
    /// Free text, for both text and textarea questions.
    Text(String),
    /// A numeric value.
    Number(f64),
    /// A calendar date.
    Date(NaiveDate),
    /// Yes (`true`) or no (`false`).
    YesNo(bool),
    /// Scale index keyed by statement index of a likert grid.
    Likert(BTreeMap<usize, usize>),
}

impl AnswerValue {
    /// Name of the payload variant, used in type-mismatch reporting.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AnswerValue::Rating(_) => "rating",
            AnswerValue::Choice(_) => "choice",
            AnswerValue::Selection(_) => "selection",
            AnswerValue::Text(_) => "text",
            AnswerValue::Number(_) => "number",
            AnswerValue::Date(_) => "date",
            AnswerValue::YesNo(_) => "yes_no",
            AnswerValue::Likert(_) => "likert",
        }
    }
}

/// One response's value for a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Id of the question this answers.
    pub question_id: String,
    /// The typed payload.
    #[serde(flatten)]
    pub value: AnswerValue,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, value: AnswerValue) -> Self {
        Self {
            question_id: question_id.into(),
            value,
        }
    }
}

/// A candidate submission, before validation.
///
/// The respondent identity is whatever the caller asserts; the core never
/// authenticates it, and drops it entirely for anonymous surveys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub respondent: Option<String>,
    pub answers: Vec<Answer>,
}

impl Submission {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            respondent: None,
            answers,
        }
    }

    /// Attach a respondent identity.
    pub fn from_respondent(respondent: impl Into<String>, answers: Vec<Answer>) -> Self {
        Self {
            respondent: Some(respondent.into()),
            answers,
        }
    }
}

/// One respondent's completed submission against a survey.
///
/// Constructed only by the engine after validation succeeds, and immutable
/// once stored. Corrections are new responses, never in-place edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Unique response identifier.
    pub id: Uuid,
    /// The survey this response belongs to.
    pub survey_id: Uuid,
    /// When the response was accepted.
    pub submitted_at: DateTime<Utc>,
    /// Respondent identity; always `None` for anonymous surveys.
    #[serde(default)]
    pub respondent: Option<String>,
    /// Whether the response was collected anonymously.
    pub anonymous: bool,
    /// One answer per answered question.
    pub answers: Vec<Answer>,
}

impl Response {
    /// The answer to the given question, if present.
    pub fn answer(&self, question_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    /// Whether this response answered the given question.
    pub fn answered(&self, question_id: &str) -> bool {
        self.answer(question_id).is_some()
    }
}
