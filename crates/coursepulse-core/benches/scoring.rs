use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chrono::Utc;
use coursepulse_core::question::{Question, QuestionKind};
use coursepulse_core::response::{Answer, AnswerValue, Response};
use coursepulse_core::statistics::{completion_rate, compute_aggregate};
use coursepulse_core::survey::{Survey, SurveySettings};
use uuid::Uuid;

fn make_survey() -> Survey {
    let mut survey = Survey::new("Bench Evaluation", SurveySettings::default()).unwrap();
    survey
        .add_question(Question::new(
            "overall",
            "Rate the course",
            QuestionKind::Rating {
                scale_max: 5,
                labels: vec![],
            },
        ))
        .unwrap();
    survey
        .add_question(Question::new(
            "topics",
            "Pick the best topics",
            QuestionKind::Checkbox {
                choices: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            },
        ))
        .unwrap();
    survey
        .add_question(Question::new(
            "hours",
            "Weekly hours spent",
            QuestionKind::Number {
                min: Some(0.0),
                max: Some(60.0),
            },
        ))
        .unwrap();
    survey
}

fn make_responses(survey: &Survey, n: usize) -> Vec<Response> {
    (0..n)
        .map(|i| Response {
            id: Uuid::new_v4(),
            survey_id: survey.id(),
            submitted_at: Utc::now(),
            respondent: None,
            anonymous: true,
            answers: vec![
                Answer::new("overall", AnswerValue::Rating((i % 5) as u8 + 1)),
                Answer::new(
                    "topics",
                    AnswerValue::Selection(vec!["A".into(), "C".into()]),
                ),
                Answer::new("hours", AnswerValue::Number((i % 40) as f64)),
            ],
        })
        .collect()
}

fn bench_completion_rate(c: &mut Criterion) {
    let mut group = c.benchmark_group("completion_rate");

    group.bench_function("typical", |b| {
        b.iter(|| completion_rate(black_box(75), black_box(100)))
    });

    group.bench_function("zero_invitations", |b| {
        b.iter(|| completion_rate(black_box(75), black_box(0)))
    });

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_aggregate");
    let survey = make_survey();

    for n in [10usize, 100, 1000] {
        let responses = make_responses(&survey, n);
        group.bench_function(format!("responses={n}"), |b| {
            b.iter(|| compute_aggregate(black_box(&survey), black_box(&responses), n as u64))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_completion_rate, bench_aggregate);
criterion_main!(benches);
