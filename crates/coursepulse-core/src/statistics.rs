//! Survey analytics: completion rate, per-question summaries, and the
//! aggregate view dashboards render.
//!
//! Aggregation is read-only best-effort reporting: responses that do not
//! belong to the survey are skipped with a warning, never raised as errors.

use serde::{Deserialize, Serialize};

use crate::registry::{self, KindSummary};
use crate::response::{AnswerValue, Response};
use crate::survey::Survey;

/// Fraction of invited respondents who submitted a response.
///
/// Clamped to `[0, 1]`; zero invitations yields `0`, never a division error.
pub fn completion_rate(response_count: usize, invitation_count: u64) -> f64 {
    if invitation_count == 0 {
        return 0.0;
    }
    (response_count as f64 / invitation_count as f64).clamp(0.0, 1.0)
}

/// Analytics for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub question_id: String,
    pub prompt: String,
    /// How many responses contained an answer to this question.
    pub answered: u64,
    /// `answered` over the total response count; `0` when there are no
    /// responses.
    pub answer_rate: f64,
    /// Type-specific summary over only the answers present.
    pub summary: KindSummary,
}

/// Analytics over one survey's stored responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyAggregate {
    /// Responses counted after filtering out foreign ones.
    pub response_count: u64,
    pub completion_rate: f64,
    /// Mean of all rating-question means. `None` when the survey has no
    /// rating questions or nothing answered them, which keeps "no data"
    /// distinguishable from a real value of `0`.
    pub overall_average_rating: Option<f64>,
    pub questions: Vec<QuestionSummary>,
}

/// Per-question summaries for a survey.
///
/// Each answer is counted exactly once for the question it addresses;
/// missing optional answers are excluded from scoring, not treated as zero.
pub fn per_question_summary(survey: &Survey, responses: &[Response]) -> Vec<QuestionSummary> {
    summarize_questions(survey, &own_responses(survey, responses))
}

fn summarize_questions(survey: &Survey, own: &[&Response]) -> Vec<QuestionSummary> {
    let total = own.len() as u64;

    survey
        .questions()
        .iter()
        .map(|question| {
            let values: Vec<&AnswerValue> = own
                .iter()
                .filter_map(|r| r.answer(&question.id).map(|a| &a.value))
                .collect();
            let answered = values.len() as u64;
            QuestionSummary {
                question_id: question.id.clone(),
                prompt: question.prompt.clone(),
                answered,
                answer_rate: if total == 0 {
                    0.0
                } else {
                    answered as f64 / total as f64
                },
                summary: registry::score(&question.kind, &values),
            }
        })
        .collect()
}

/// Mean of all rating-question means, `None` when no rating data exists.
pub fn overall_average_rating(survey: &Survey, responses: &[Response]) -> Option<f64> {
    mean_of_rating_means(&per_question_summary(survey, responses))
}

/// Compute the full aggregate for a survey.
pub fn compute_aggregate(
    survey: &Survey,
    responses: &[Response],
    invitation_count: u64,
) -> SurveyAggregate {
    let own = own_responses(survey, responses);
    let questions = summarize_questions(survey, &own);
    SurveyAggregate {
        response_count: own.len() as u64,
        completion_rate: completion_rate(own.len(), invitation_count),
        overall_average_rating: mean_of_rating_means(&questions),
        questions,
    }
}

fn own_responses<'a>(survey: &Survey, responses: &'a [Response]) -> Vec<&'a Response> {
    responses
        .iter()
        .filter(|r| {
            if r.survey_id == survey.id() {
                true
            } else {
                tracing::warn!(
                    response = %r.id,
                    expected = %survey.id(),
                    found = %r.survey_id,
                    "skipping response for a different survey"
                );
                false
            }
        })
        .collect()
}

fn mean_of_rating_means(questions: &[QuestionSummary]) -> Option<f64> {
    let means: Vec<f64> = questions
        .iter()
        .filter_map(|q| match q.summary {
            KindSummary::Rating { mean, .. } => mean,
            _ => None,
        })
        .collect();
    if means.is_empty() {
        None
    } else {
        Some(means.iter().sum::<f64>() / means.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{Question, QuestionKind};
    use crate::response::Answer;
    use crate::survey::SurveySettings;
    use chrono::Utc;
    use uuid::Uuid;

    fn survey_with(questions: Vec<Question>) -> Survey {
        let mut survey = Survey::new("Stats", SurveySettings::default()).unwrap();
        for question in questions {
            survey.add_question(question).unwrap();
        }
        survey
    }

    fn response_for(survey: &Survey, answers: Vec<Answer>) -> Response {
        Response {
            id: Uuid::new_v4(),
            survey_id: survey.id(),
            submitted_at: Utc::now(),
            respondent: None,
            anonymous: false,
            answers,
        }
    }

    fn rating(id: &str, scale_max: u8) -> Question {
        Question::new(
            id,
            "Rate it",
            QuestionKind::Rating {
                scale_max,
                labels: vec![],
            },
        )
    }

    #[test]
    fn completion_rate_bounds() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(completion_rate(5, 0), 0.0);
        assert_eq!(completion_rate(5, 10), 0.5);
        // Over-completion clamps rather than exceeding 1.
        assert_eq!(completion_rate(10, 5), 1.0);
        assert_eq!(completion_rate(0, 10), 0.0);
    }

    #[test]
    fn answer_rates_count_each_response_once() {
        let survey = survey_with(vec![
            rating("q1", 5),
            Question::new("q2", "Comments", QuestionKind::Textarea { placeholder: None }),
        ]);
        let responses = vec![
            response_for(
                &survey,
                vec![
                    Answer::new("q1", AnswerValue::Rating(4)),
                    Answer::new("q2", AnswerValue::Text("fine".into())),
                ],
            ),
            response_for(&survey, vec![Answer::new("q1", AnswerValue::Rating(2))]),
        ];

        let summaries = per_question_summary(&survey, &responses);
        assert_eq!(summaries[0].answered, 2);
        assert_eq!(summaries[0].answer_rate, 1.0);
        assert_eq!(summaries[1].answered, 1);
        assert_eq!(summaries[1].answer_rate, 0.5);
    }

    #[test]
    fn no_responses_yields_zero_rates() {
        let survey = survey_with(vec![rating("q1", 5)]);
        let summaries = per_question_summary(&survey, &[]);
        assert_eq!(summaries[0].answered, 0);
        assert_eq!(summaries[0].answer_rate, 0.0);
    }

    #[test]
    fn foreign_responses_are_excluded() {
        let survey = survey_with(vec![rating("q1", 5)]);
        let stranger = survey_with(vec![rating("q1", 5)]);

        let responses = vec![
            response_for(&survey, vec![Answer::new("q1", AnswerValue::Rating(5))]),
            response_for(&stranger, vec![Answer::new("q1", AnswerValue::Rating(1))]),
        ];
        let aggregate = compute_aggregate(&survey, &responses, 10);
        assert_eq!(aggregate.response_count, 1);
        assert_eq!(aggregate.overall_average_rating, Some(5.0));
    }

    #[test]
    fn overall_average_spans_rating_questions_only() {
        let survey = survey_with(vec![
            rating("q1", 5),
            rating("q2", 5),
            Question::new("q3", "Yes?", QuestionKind::YesNo),
        ]);
        let responses = vec![
            response_for(
                &survey,
                vec![
                    Answer::new("q1", AnswerValue::Rating(4)),
                    Answer::new("q2", AnswerValue::Rating(2)),
                    Answer::new("q3", AnswerValue::YesNo(true)),
                ],
            ),
            response_for(&survey, vec![Answer::new("q1", AnswerValue::Rating(2))]),
        ];

        // q1 mean 3.0, q2 mean 2.0 → overall 2.5; yes_no contributes nothing.
        assert_eq!(overall_average_rating(&survey, &responses), Some(2.5));
    }

    #[test]
    fn overall_average_is_none_without_rating_data() {
        let no_ratings = survey_with(vec![Question::new("q1", "Yes?", QuestionKind::YesNo)]);
        let responses = vec![response_for(
            &no_ratings,
            vec![Answer::new("q1", AnswerValue::YesNo(true))],
        )];
        assert_eq!(overall_average_rating(&no_ratings, &responses), None);

        let unanswered = survey_with(vec![rating("q1", 5)]);
        assert_eq!(overall_average_rating(&unanswered, &[]), None);
    }

    #[test]
    fn aggregate_combines_all_measures() {
        let survey = survey_with(vec![rating("q1", 5)]);
        let responses = vec![
            response_for(&survey, vec![Answer::new("q1", AnswerValue::Rating(5))]),
            response_for(&survey, vec![Answer::new("q1", AnswerValue::Rating(3))]),
        ];
        let aggregate = compute_aggregate(&survey, &responses, 4);

        assert_eq!(aggregate.response_count, 2);
        assert_eq!(aggregate.completion_rate, 0.5);
        assert_eq!(aggregate.overall_average_rating, Some(4.0));
        assert_eq!(aggregate.questions.len(), 1);
    }
}
