//! The submission engine: gates, validates, and stores responses.
//!
//! Orchestrates the collaborators from [`crate::traits`] around the pure
//! rules in [`crate::registry`]. All operations are synchronous and
//! side-effect free except the single append of a validated response.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{
    NotAcceptingReason, SchemaError, StorageError, SubmitError, ValidationFailed, ValidationIssue,
};
use crate::lifecycle::SurveyStatus;
use crate::question::Question;
use crate::registry;
use crate::response::{Response, Submission};
use crate::summary::SurveyReport;
use crate::survey::Survey;
use crate::traits::{Clock, InvitationSource, ResponseStore};

/// Coordinates submissions, aggregation, and the schema edits that must
/// consult stored responses.
pub struct SurveyEngine {
    store: Arc<dyn ResponseStore>,
    clock: Arc<dyn Clock>,
    invitations: Arc<dyn InvitationSource>,
}

impl SurveyEngine {
    pub fn new(
        store: Arc<dyn ResponseStore>,
        clock: Arc<dyn Clock>,
        invitations: Arc<dyn InvitationSource>,
    ) -> Self {
        Self {
            store,
            clock,
            invitations,
        }
    }

    /// Validate one submission and store the resulting response.
    ///
    /// The acceptance gate is evaluated and the response appended within this
    /// single synchronous call; the store serializes concurrent appends.
    /// Every validation problem is collected and reported together so a
    /// respondent-facing form can highlight all of them in one pass.
    pub fn submit(&self, survey: &Survey, submission: Submission) -> Result<Response, SubmitError> {
        let now = self.clock.now();
        check_accepting(survey, now)?;

        let respondent = if survey.settings().anonymous {
            None
        } else {
            submission.respondent.clone()
        };
        if let Some(who) = respondent.as_deref() {
            if !survey.settings().allow_multiple_responses {
                let prior = self.store.list_by_survey(survey.id())?;
                if prior
                    .iter()
                    .any(|r| r.respondent.as_deref() == Some(who))
                {
                    return Err(SubmitError::AlreadyResponded(who.to_string()));
                }
            }
        }

        let issues = validate_submission(survey, &submission);
        if !issues.is_empty() {
            return Err(ValidationFailed { issues }.into());
        }

        let response = Response {
            id: Uuid::new_v4(),
            survey_id: survey.id(),
            submitted_at: now,
            respondent,
            anonymous: survey.settings().anonymous,
            answers: submission.answers,
        };
        tracing::debug!(survey = %survey.id(), response = %response.id, "response accepted");
        Ok(self.store.append(response)?)
    }

    /// Remove a question, protecting questions with stored answers.
    ///
    /// Fails with [`SchemaError::QuestionInUse`] whenever any stored response
    /// answers the question, regardless of the survey's status.
    pub fn remove_question(&self, survey: &mut Survey, id: &str) -> Result<Question, SchemaError> {
        if survey.question(id).is_none() {
            return Err(SchemaError::QuestionNotFound(id.to_string()));
        }
        let responses = self.store.list_by_survey(survey.id())?;
        if responses.iter().any(|r| r.answered(id)) {
            return Err(SchemaError::QuestionInUse(id.to_string()));
        }
        survey.remove_question(id)
    }

    /// Aggregate a survey's stored responses into a dashboard-ready report.
    pub fn summarize(&self, survey: &Survey) -> Result<SurveyReport, StorageError> {
        let responses = self.store.list_by_survey(survey.id())?;
        let invitation_count = self.invitations.invitation_count(survey.id());
        Ok(SurveyReport::new(
            survey,
            &responses,
            invitation_count,
            self.clock.now(),
        ))
    }

    /// Delete a survey, cascading to its stored responses.
    ///
    /// Consumes the survey; returns the number of responses purged.
    pub fn delete_survey(&self, survey: Survey) -> Result<u64, StorageError> {
        let removed = self.store.purge_survey(survey.id())?;
        tracing::debug!(survey = %survey.id(), removed, "survey deleted");
        Ok(removed)
    }
}

/// Collect every validation issue in one pass: missing required answers in
/// question order, then per-answer issues in submission order.
///
/// Pure over its inputs: the same survey snapshot and submission always
/// yield the same issue list.
pub fn validate_submission(survey: &Survey, submission: &Submission) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for question in survey.questions() {
        if question.required
            && !submission
                .answers
                .iter()
                .any(|a| a.question_id == question.id)
        {
            issues.push(ValidationIssue::MissingRequiredAnswer(question.id.clone()));
        }
    }

    let mut seen = HashSet::new();
    for answer in &submission.answers {
        if !seen.insert(answer.question_id.as_str()) {
            issues.push(ValidationIssue::DuplicateAnswer(answer.question_id.clone()));
            continue;
        }
        match survey.question(&answer.question_id) {
            None => issues.push(ValidationIssue::UnknownQuestion(answer.question_id.clone())),
            Some(question) => {
                if let Err(problem) = registry::validate_answer(&question.kind, &answer.value) {
                    issues.push(ValidationIssue::InvalidAnswer {
                        question_id: answer.question_id.clone(),
                        problem,
                    });
                }
            }
        }
    }

    issues
}

fn check_accepting(survey: &Survey, now: chrono::DateTime<chrono::Utc>) -> Result<(), SubmitError> {
    if survey.status() != SurveyStatus::Active {
        return Err(SubmitError::NotAcceptingResponses(
            NotAcceptingReason::NotActive(survey.status()),
        ));
    }
    let settings = survey.settings();
    if let Some(opens) = settings.opens_at {
        if now < opens {
            return Err(SubmitError::NotAcceptingResponses(
                NotAcceptingReason::NotYetOpen,
            ));
        }
    }
    if let Some(closes) = settings.closes_at {
        if now > closes {
            return Err(SubmitError::NotAcceptingResponses(
                NotAcceptingReason::WindowClosed,
            ));
        }
    }
    Ok(())
}
