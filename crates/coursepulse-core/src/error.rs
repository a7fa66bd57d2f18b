//! Error taxonomy for the survey core.
//!
//! Every failure is a value returned to the caller: the core is a library
//! embedded in a larger request-handling context, so nothing here is fatal at
//! the process level. `StorageError` is defined in `coursepulse-core` so the
//! engine can classify store failures without string matching.

use std::fmt;

use thiserror::Error;

use crate::lifecycle::SurveyStatus;

/// Errors from structural survey editing.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A question with this id already exists in the survey.
    #[error("question id '{0}' is already used in this survey")]
    DuplicateQuestionId(String),

    /// The question's type-specific configuration is malformed.
    #[error("invalid configuration for question '{question_id}': {reason}")]
    InvalidQuestionConfig { question_id: String, reason: String },

    /// Survey-level settings are incoherent (e.g. the response window ends
    /// before it opens).
    #[error("invalid survey settings: {0}")]
    InvalidSettings(String),

    /// The survey no longer accepts structural changes.
    #[error("survey is {0} and cannot be structurally modified")]
    SurveyLocked(SurveyStatus),

    /// No question with the given id exists.
    #[error("no question with id '{0}'")]
    QuestionNotFound(String),

    /// The question has stored answers; removing it would orphan them.
    #[error("question '{0}' has stored answers and cannot be removed")]
    QuestionInUse(String),

    /// The requested order is not a permutation of the current question ids.
    #[error("not a permutation of the current question ids: {0}")]
    InvalidPermutation(String),

    /// The response store failed while checking answer references.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors from lifecycle transitions. Each blocks only the requested
/// transition; the prior state is left intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Activation requires at least one question.
    #[error("cannot activate a survey with no questions")]
    CannotActivateEmptySurvey,

    /// Activation requires a non-empty title.
    #[error("cannot activate a survey without a title")]
    CannotActivateUntitledSurvey,

    /// `closed` is terminal; no transition leaves it.
    #[error("survey is closed and cannot transition further")]
    SurveyAlreadyClosed,

    /// The edge is not in the legal transition set.
    #[error("no transition from {from} to {to}")]
    InvalidTransition { from: SurveyStatus, to: SurveyStatus },
}

/// Why a single answer value failed its question's validation rule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnswerProblem {
    /// The payload variant does not match the question kind.
    #[error("expected a {expected} value, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A rating outside the question's `1..=scale_max` range.
    #[error("rating {value} is outside the 1..={scale_max} scale")]
    RatingOutOfScale { value: u8, scale_max: u8 },

    /// A choice that is not in the question's allowed set.
    #[error("choice '{0}' is not in the allowed set")]
    UnknownChoice(String),

    /// The same choice selected more than once in a checkbox answer.
    #[error("choice '{0}' was selected more than once")]
    DuplicateChoice(String),

    /// A numeric value below the configured minimum.
    #[error("value {value} is below the minimum {min}")]
    BelowMinimum { value: f64, min: f64 },

    /// A numeric value above the configured maximum.
    #[error("value {value} is above the maximum {max}")]
    AboveMaximum { value: f64, max: f64 },

    /// NaN or infinite numeric value.
    #[error("value is not a finite number")]
    NotFinite,

    /// A likert entry referencing a statement the question does not have.
    #[error("statement index {0} is out of range")]
    UnknownStatement(usize),

    /// A likert entry referencing a point outside the shared scale.
    #[error("scale index {index} is out of range for statement {statement}")]
    ScaleOutOfRange { statement: usize, index: usize },

    /// A likert grid that leaves a statement unscored.
    #[error("statement {0} is not scored")]
    UnscoredStatement(usize),
}

/// One problem found while validating a submission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationIssue {
    /// A required question with no corresponding answer.
    #[error("required question '{0}' was not answered")]
    MissingRequiredAnswer(String),

    /// An answer referencing a question the survey does not contain.
    #[error("answer references unknown question '{0}'")]
    UnknownQuestion(String),

    /// Two answers to the same question in one submission.
    #[error("question '{0}' was answered more than once")]
    DuplicateAnswer(String),

    /// An answer whose value fails its question's validation rule.
    #[error("invalid answer for question '{question_id}': {problem}")]
    InvalidAnswer {
        question_id: String,
        problem: AnswerProblem,
    },
}

impl ValidationIssue {
    /// Id of the question this issue concerns.
    pub fn question_id(&self) -> &str {
        match self {
            ValidationIssue::MissingRequiredAnswer(id)
            | ValidationIssue::UnknownQuestion(id)
            | ValidationIssue::DuplicateAnswer(id) => id,
            ValidationIssue::InvalidAnswer { question_id, .. } => question_id,
        }
    }
}

/// The complete, ordered list of problems in a rejected submission.
///
/// Never truncated to the first error: a respondent-facing form needs the
/// whole picture to highlight every field in one pass.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("submission failed validation with {} issue(s)", .issues.len())]
pub struct ValidationFailed {
    pub issues: Vec<ValidationIssue>,
}

/// Why a survey is currently refusing submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotAcceptingReason {
    /// Only `active` surveys accept responses.
    NotActive(SurveyStatus),
    /// The response window has not opened yet.
    NotYetOpen,
    /// The response window has already closed.
    WindowClosed,
}

impl fmt::Display for NotAcceptingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotAcceptingReason::NotActive(status) => write!(f, "survey is {status}"),
            NotAcceptingReason::NotYetOpen => write!(f, "response window has not opened"),
            NotAcceptingReason::WindowClosed => write!(f, "response window has closed"),
        }
    }
}

/// Errors from response submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The survey is not in a state (or window) that accepts responses.
    #[error("survey is not accepting responses: {0}")]
    NotAcceptingResponses(NotAcceptingReason),

    /// The respondent already submitted and the survey disallows repeats.
    #[error("respondent '{0}' has already responded to this survey")]
    AlreadyResponded(String),

    /// The answer set failed validation; carries every issue found.
    #[error(transparent)]
    Validation(#[from] ValidationFailed),

    /// The response store failed; propagated unchanged, never retried here.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors from the response store collaborator.
///
/// Opaque to the core: the engine propagates these unchanged. Retry policy,
/// if any, belongs to the store implementation or the deployment.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O failure in the backing medium.
    #[error("storage I/O failure: {0}")]
    Io(String),

    /// Stored data that could not be decoded.
    #[error("stored data could not be decoded: {0}")]
    Corrupt(String),

    /// An optimistic append lost to a concurrent write.
    #[error("append conflicted with a concurrent write")]
    Conflict,

    /// Any other backend failure.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StorageError {
    /// Returns `true` if retrying the operation could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::Conflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failed_reports_issue_count() {
        let err = ValidationFailed {
            issues: vec![
                ValidationIssue::MissingRequiredAnswer("q1".into()),
                ValidationIssue::UnknownQuestion("q9".into()),
            ],
        };
        assert_eq!(err.to_string(), "submission failed validation with 2 issue(s)");
    }

    #[test]
    fn issue_question_id() {
        let issue = ValidationIssue::InvalidAnswer {
            question_id: "q2".into(),
            problem: AnswerProblem::NotFinite,
        };
        assert_eq!(issue.question_id(), "q2");
    }

    #[test]
    fn conflict_is_retryable() {
        assert!(StorageError::Conflict.is_retryable());
        assert!(!StorageError::Io("disk full".into()).is_retryable());
    }
}
