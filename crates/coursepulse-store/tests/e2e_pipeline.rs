//! End-to-end pipeline tests: author → activate → submit → aggregate →
//! report, driven through the real store implementations.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{TimeZone, Utc};

use coursepulse_core::engine::SurveyEngine;
use coursepulse_core::error::{SubmitError, ValidationIssue};
use coursepulse_core::lifecycle::SurveyStatus;
use coursepulse_core::parser::parse_survey_str;
use coursepulse_core::registry::KindSummary;
use coursepulse_core::response::{Answer, AnswerValue, Submission};
use coursepulse_core::survey::Survey;
use coursepulse_core::traits::{FixedClock, ResponseStore};
use coursepulse_store::{FixedInvitations, JsonlStore, MemoryStore};

const COURSE_EVAL: &str = r#"
[survey]
title = "CS 301 Course Evaluation"

[[questions]]
id = "overall"
prompt = "How would you rate this course overall?"
required = true
type = "rating"
scale_max = 5

[[questions]]
id = "recommend"
prompt = "Would you recommend this course?"
required = true
type = "yes_no"

[[questions]]
id = "pace"
prompt = "The course pace was appropriate."
type = "likert"
statements = ["Lectures", "Assignments"]
scale = ["Disagree", "Neutral", "Agree"]

[[questions]]
id = "comments"
prompt = "Anything else?"
type = "textarea"
"#;

fn make_engine(store: Arc<dyn ResponseStore>, invitations: FixedInvitations) -> SurveyEngine {
    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 5, 10, 9, 0, 0).unwrap());
    SurveyEngine::new(store, Arc::new(clock), Arc::new(invitations))
}

fn make_survey() -> Survey {
    let mut survey = parse_survey_str(COURSE_EVAL, Path::new("course_eval.toml")).unwrap();
    survey.transition(SurveyStatus::Active).unwrap();
    survey
}

fn full_answers(rating: u8, recommend: bool) -> Vec<Answer> {
    vec![
        Answer::new("overall", AnswerValue::Rating(rating)),
        Answer::new("recommend", AnswerValue::YesNo(recommend)),
        Answer::new(
            "pace",
            AnswerValue::Likert(BTreeMap::from([(0, 2), (1, 1)])),
        ),
        Answer::new("comments", AnswerValue::Text("solid course".into())),
    ]
}

#[test]
fn e2e_submit_and_summarize() {
    let survey = make_survey();
    let mut invitations = FixedInvitations::default();
    invitations.set(survey.id(), 4);
    let engine = make_engine(Arc::new(MemoryStore::new()), invitations);

    engine
        .submit(
            &survey,
            Submission::from_respondent("student-1", full_answers(5, true)),
        )
        .unwrap();
    engine
        .submit(
            &survey,
            Submission::from_respondent(
                "student-2",
                vec![
                    Answer::new("overall", AnswerValue::Rating(3)),
                    Answer::new("recommend", AnswerValue::YesNo(false)),
                ],
            ),
        )
        .unwrap();

    let report = engine.summarize(&survey).unwrap();
    assert_eq!(report.aggregate.response_count, 2);
    assert_eq!(report.aggregate.completion_rate, 0.5);
    assert_eq!(report.aggregate.overall_average_rating, Some(4.0));

    // Each response counted exactly once per question it answered.
    let overall = &report.aggregate.questions[0];
    assert_eq!(overall.answered, 2);
    match &overall.summary {
        KindSummary::Rating { distribution, .. } => {
            assert_eq!(distribution, &vec![0, 0, 1, 0, 1]);
        }
        other => panic!("expected rating summary, got {other:?}"),
    }
    let comments = &report.aggregate.questions[3];
    assert_eq!(comments.answered, 1);
    assert_eq!(comments.answer_rate, 0.5);

    let md = report.to_markdown();
    assert!(md.contains("CS 301 Course Evaluation"));
    assert!(md.contains("completion 50.0%"));
}

#[test]
fn e2e_validation_reports_every_issue() {
    let survey = make_survey();
    let engine = make_engine(Arc::new(MemoryStore::new()), FixedInvitations::default());

    let submission = Submission::new(vec![
        Answer::new("overall", AnswerValue::Rating(6)),
        Answer::new("extra", AnswerValue::Text("??".into())),
    ]);
    let err = engine.submit(&survey, submission).unwrap_err();
    let SubmitError::Validation(failed) = err else {
        panic!("expected validation failure, got {err:?}");
    };

    // One missing required answer, one out-of-scale rating, and one unknown
    // question must all be present, in deterministic order.
    assert_eq!(failed.issues.len(), 3);
    assert!(matches!(
        &failed.issues[0],
        ValidationIssue::MissingRequiredAnswer(id) if id == "recommend"
    ));
    assert!(matches!(
        &failed.issues[1],
        ValidationIssue::InvalidAnswer { question_id, .. } if question_id == "overall"
    ));
    assert!(matches!(
        &failed.issues[2],
        ValidationIssue::UnknownQuestion(id) if id == "extra"
    ));
}

#[test]
fn e2e_draft_and_closed_surveys_reject_submissions() {
    let mut survey = parse_survey_str(COURSE_EVAL, Path::new("course_eval.toml")).unwrap();
    let engine = make_engine(Arc::new(MemoryStore::new()), FixedInvitations::default());

    let err = engine
        .submit(&survey, Submission::new(full_answers(4, true)))
        .unwrap_err();
    assert!(matches!(err, SubmitError::NotAcceptingResponses(_)));

    survey.transition(SurveyStatus::Active).unwrap();
    survey.transition(SurveyStatus::Closed).unwrap();
    let err = engine
        .submit(&survey, Submission::new(full_answers(4, true)))
        .unwrap_err();
    assert!(matches!(err, SubmitError::NotAcceptingResponses(_)));
}

#[test]
fn e2e_answered_question_survives_removal_attempts() {
    let mut survey = make_survey();
    let engine = make_engine(Arc::new(MemoryStore::new()), FixedInvitations::default());

    engine
        .submit(
            &survey,
            Submission::new(vec![
                Answer::new("overall", AnswerValue::Rating(4)),
                Answer::new("recommend", AnswerValue::YesNo(true)),
            ]),
        )
        .unwrap();

    survey.transition(SurveyStatus::Paused).unwrap();
    assert!(engine.remove_question(&mut survey, "overall").is_err());
    // The never-answered likert question removes cleanly.
    assert!(engine.remove_question(&mut survey, "pace").is_ok());
    assert_eq!(survey.questions().len(), 3);
}

#[test]
fn e2e_delete_survey_cascades_to_responses() {
    let survey = make_survey();
    let store = Arc::new(MemoryStore::new());
    let engine = make_engine(store.clone(), FixedInvitations::default());

    engine
        .submit(&survey, Submission::new(full_answers(4, true)))
        .unwrap();
    engine
        .submit(&survey, Submission::new(full_answers(2, false)))
        .unwrap();

    let survey_id = survey.id();
    assert_eq!(engine.delete_survey(survey).unwrap(), 2);
    assert!(store.list_by_survey(survey_id).unwrap().is_empty());
}

#[test]
fn e2e_jsonl_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("responses.jsonl");
    let survey = make_survey();

    {
        let engine = make_engine(
            Arc::new(JsonlStore::new(&path)),
            FixedInvitations::default(),
        );
        engine
            .submit(&survey, Submission::new(full_answers(5, true)))
            .unwrap();
    }

    // A fresh store over the same file sees the stored response.
    let mut invitations = FixedInvitations::default();
    invitations.set(survey.id(), 10);
    let engine = make_engine(Arc::new(JsonlStore::new(&path)), invitations);
    let report = engine.summarize(&survey).unwrap();

    assert_eq!(report.aggregate.response_count, 1);
    assert_eq!(report.aggregate.completion_rate, 0.1);
    assert_eq!(report.aggregate.overall_average_rating, Some(5.0));
}

#[test]
fn e2e_report_roundtrips_through_json() {
    let survey = make_survey();
    let engine = make_engine(Arc::new(MemoryStore::new()), FixedInvitations::default());
    engine
        .submit(&survey, Submission::new(full_answers(4, true)))
        .unwrap();

    let report = engine.summarize(&survey).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    report.save_json(&path).unwrap();

    let loaded = coursepulse_core::summary::SurveyReport::load_json(&path).unwrap();
    assert_eq!(loaded, report);
}
