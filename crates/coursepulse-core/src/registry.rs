//! Per-kind validation and scoring rules.
//!
//! Single source of truth for the behavior of each question kind: one config
//! check, one answer validator, and one scorer, each dispatching on the kind
//! tag exactly once. Everything here is a pure function. Editing, submission
//! handling, and analytics all call into this module instead of re-deciding
//! per-kind behavior at their own call sites.
//!
//! The kind set is a closed enum, so an unknown tag is unrepresentable in a
//! constructed survey; instrument files with an unknown tag are rejected at
//! parse time (see [`crate::parser`]).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::AnswerProblem;
use crate::question::QuestionKind;
use crate::response::AnswerValue;

/// Largest permitted rating scale.
pub const MAX_SCALE: u8 = 10;

/// Check that a kind's configuration is well formed.
///
/// Returns the reason on failure; callers wrap it into
/// [`crate::error::SchemaError::InvalidQuestionConfig`].
pub fn validate_config(kind: &QuestionKind) -> Result<(), String> {
    match kind {
        QuestionKind::Rating { scale_max, labels } => {
            if !(1..=MAX_SCALE).contains(scale_max) {
                return Err(format!(
                    "scale_max must be between 1 and {MAX_SCALE}, got {scale_max}"
                ));
            }
            if !labels.is_empty() && labels.len() != *scale_max as usize {
                return Err(format!(
                    "expected {scale_max} labels, got {}",
                    labels.len()
                ));
            }
            Ok(())
        }
        QuestionKind::MultipleChoice { choices } | QuestionKind::Checkbox { choices } => {
            if choices.is_empty() {
                return Err("at least one choice is required".into());
            }
            let mut seen = HashSet::new();
            for choice in choices {
                if !seen.insert(choice.as_str()) {
                    return Err(format!("duplicate choice '{choice}'"));
                }
            }
            Ok(())
        }
        QuestionKind::Number { min, max } => {
            if min.is_some_and(|m| !m.is_finite()) || max.is_some_and(|m| !m.is_finite()) {
                return Err("bounds must be finite".into());
            }
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(format!("min {min} exceeds max {max}"));
                }
            }
            Ok(())
        }
        QuestionKind::Likert { statements, scale } => {
            if statements.is_empty() {
                return Err("at least one statement is required".into());
            }
            if scale.len() < 2 {
                return Err("the scale needs at least two points".into());
            }
            Ok(())
        }
        QuestionKind::Text { .. } | QuestionKind::Textarea { .. } => Ok(()),
        QuestionKind::Date | QuestionKind::YesNo => Ok(()),
    }
}

/// Validate one answer value against its question's kind.
pub fn validate_answer(kind: &QuestionKind, value: &AnswerValue) -> Result<(), AnswerProblem> {
    match (kind, value) {
        (QuestionKind::Rating { scale_max, .. }, AnswerValue::Rating(v)) => {
            if (1..=*scale_max).contains(v) {
                Ok(())
            } else {
                Err(AnswerProblem::RatingOutOfScale {
                    value: *v,
                    scale_max: *scale_max,
                })
            }
        }
        (QuestionKind::MultipleChoice { choices }, AnswerValue::Choice(choice)) => {
            if choices.contains(choice) {
                Ok(())
            } else {
                Err(AnswerProblem::UnknownChoice(choice.clone()))
            }
        }
        (QuestionKind::Checkbox { choices }, AnswerValue::Selection(selected)) => {
            let mut seen = HashSet::new();
            for choice in selected {
                if !choices.contains(choice) {
                    return Err(AnswerProblem::UnknownChoice(choice.clone()));
                }
                if !seen.insert(choice.as_str()) {
                    return Err(AnswerProblem::DuplicateChoice(choice.clone()));
                }
            }
            Ok(())
        }
        (QuestionKind::Text { .. } | QuestionKind::Textarea { .. }, AnswerValue::Text(_)) => Ok(()),
        (QuestionKind::Number { min, max }, AnswerValue::Number(v)) => {
            if !v.is_finite() {
                return Err(AnswerProblem::NotFinite);
            }
            if let Some(min) = min {
                if v < min {
                    return Err(AnswerProblem::BelowMinimum {
                        value: *v,
                        min: *min,
                    });
                }
            }
            if let Some(max) = max {
                if v > max {
                    return Err(AnswerProblem::AboveMaximum {
                        value: *v,
                        max: *max,
                    });
                }
            }
            Ok(())
        }
        (QuestionKind::Date, AnswerValue::Date(_)) => Ok(()),
        (QuestionKind::YesNo, AnswerValue::YesNo(_)) => Ok(()),
        (QuestionKind::Likert { statements, scale }, AnswerValue::Likert(grid)) => {
            for (&statement, &index) in grid {
                if statement >= statements.len() {
                    return Err(AnswerProblem::UnknownStatement(statement));
                }
                if index >= scale.len() {
                    return Err(AnswerProblem::ScaleOutOfRange { statement, index });
                }
            }
            // A respondent scores the whole grid at once; a gap means the
            // submission was assembled incorrectly.
            for statement in 0..statements.len() {
                if !grid.contains_key(&statement) {
                    return Err(AnswerProblem::UnscoredStatement(statement));
                }
            }
            Ok(())
        }
        (kind, value) => Err(AnswerProblem::TypeMismatch {
            expected: kind.name(),
            actual: value.kind_name(),
        }),
    }
}

/// Aggregate summary for one question, shaped by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KindSummary {
    /// Mean and per-step distribution of a rating scale.
    Rating {
        mean: Option<f64>,
        /// Count per scale step; index 0 is rating 1.
        distribution: Vec<u64>,
    },

    /// Frequency table in configured choice order
    /// (multiple_choice, checkbox, yes_no).
    Frequency { counts: Vec<ChoiceCount> },

    /// Free-form kinds report only how many answers were given.
    Count { answered: u64 },

    /// Numeric summary.
    Numeric {
        answered: u64,
        mean: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
    },

    /// Per-statement summaries of a likert grid.
    Likert { statements: Vec<StatementSummary> },
}

/// How often one choice was selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceCount {
    pub choice: String,
    pub count: u64,
}

/// Summary of one likert statement across all answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementSummary {
    pub statement: String,
    /// Mean of 1-based scale positions.
    pub mean: Option<f64>,
    /// Count per scale point; index 0 is the first scale entry.
    pub distribution: Vec<u64>,
}

/// Score the answers present for one question.
///
/// `values` holds only the answers actually given; missing optional answers
/// are excluded upstream, never treated as zero. Payloads of the wrong kind
/// or out of range are skipped: scoring is best-effort reporting over data
/// that was validated at submission time.
pub fn score(kind: &QuestionKind, values: &[&AnswerValue]) -> KindSummary {
    match kind {
        QuestionKind::Rating { scale_max, .. } => {
            let mut distribution = vec![0u64; *scale_max as usize];
            let mut sum = 0u64;
            let mut n = 0u64;
            for value in values {
                if let AnswerValue::Rating(r) = value {
                    if (1..=*scale_max).contains(r) {
                        distribution[(*r - 1) as usize] += 1;
                        sum += u64::from(*r);
                        n += 1;
                    }
                }
            }
            KindSummary::Rating {
                mean: mean_of(sum as f64, n),
                distribution,
            }
        }
        QuestionKind::MultipleChoice { choices } => {
            let mut counts = empty_counts(choices);
            for value in values {
                if let AnswerValue::Choice(choice) = value {
                    bump(&mut counts, choice);
                }
            }
            KindSummary::Frequency { counts }
        }
        QuestionKind::Checkbox { choices } => {
            let mut counts = empty_counts(choices);
            for value in values {
                if let AnswerValue::Selection(selected) = value {
                    for choice in selected {
                        bump(&mut counts, choice);
                    }
                }
            }
            KindSummary::Frequency { counts }
        }
        QuestionKind::YesNo => {
            let mut yes = 0u64;
            let mut no = 0u64;
            for value in values {
                match value {
                    AnswerValue::YesNo(true) => yes += 1,
                    AnswerValue::YesNo(false) => no += 1,
                    _ => {}
                }
            }
            KindSummary::Frequency {
                counts: vec![
                    ChoiceCount {
                        choice: "yes".into(),
                        count: yes,
                    },
                    ChoiceCount {
                        choice: "no".into(),
                        count: no,
                    },
                ],
            }
        }
        QuestionKind::Text { .. } | QuestionKind::Textarea { .. } => KindSummary::Count {
            answered: values
                .iter()
                .filter(|v| matches!(v, AnswerValue::Text(_)))
                .count() as u64,
        },
        QuestionKind::Date => KindSummary::Count {
            answered: values
                .iter()
                .filter(|v| matches!(v, AnswerValue::Date(_)))
                .count() as u64,
        },
        QuestionKind::Number { .. } => {
            let mut sum = 0.0f64;
            let mut n = 0u64;
            let mut min: Option<f64> = None;
            let mut max: Option<f64> = None;
            for value in values {
                if let AnswerValue::Number(v) = value {
                    if v.is_finite() {
                        sum += v;
                        n += 1;
                        min = Some(min.map_or(*v, |m| m.min(*v)));
                        max = Some(max.map_or(*v, |m| m.max(*v)));
                    }
                }
            }
            KindSummary::Numeric {
                answered: n,
                mean: mean_of(sum, n),
                min,
                max,
            }
        }
        QuestionKind::Likert { statements, scale } => {
            let mut summaries: Vec<StatementSummary> = statements
                .iter()
                .map(|statement| StatementSummary {
                    statement: statement.clone(),
                    mean: None,
                    distribution: vec![0u64; scale.len()],
                })
                .collect();
            let mut sums = vec![0u64; statements.len()];
            let mut counts = vec![0u64; statements.len()];
            for value in values {
                if let AnswerValue::Likert(grid) = value {
                    for (&statement, &index) in grid {
                        if statement < statements.len() && index < scale.len() {
                            summaries[statement].distribution[index] += 1;
                            sums[statement] += index as u64 + 1;
                            counts[statement] += 1;
                        }
                    }
                }
            }
            for (i, summary) in summaries.iter_mut().enumerate() {
                summary.mean = mean_of(sums[i] as f64, counts[i]);
            }
            KindSummary::Likert {
                statements: summaries,
            }
        }
    }
}

fn mean_of(sum: f64, n: u64) -> Option<f64> {
    (n > 0).then(|| sum / n as f64)
}

fn empty_counts(choices: &[String]) -> Vec<ChoiceCount> {
    choices
        .iter()
        .map(|choice| ChoiceCount {
            choice: choice.clone(),
            count: 0,
        })
        .collect()
}

fn bump(counts: &mut [ChoiceCount], choice: &str) {
    if let Some(entry) = counts.iter_mut().find(|c| c.choice == choice) {
        entry.count += 1;
    }
}
