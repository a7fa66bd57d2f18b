//! Dashboard-ready survey reports with JSON persistence and markdown
//! rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lifecycle::SurveyStatus;
use crate::registry::KindSummary;
use crate::response::Response;
use crate::statistics::{compute_aggregate, SurveyAggregate};
use crate::survey::Survey;

/// A complete summary of one survey at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was produced.
    pub created_at: DateTime<Utc>,
    /// Identifying details of the summarized survey.
    pub survey: SurveySummary,
    /// Invitations sent, as reported by the entitlement collaborator.
    pub invitation_count: u64,
    /// The aggregate analytics.
    pub aggregate: SurveyAggregate,
}

/// Identifying details of a summarized survey (without the question list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveySummary {
    pub id: Uuid,
    pub title: String,
    pub status: SurveyStatus,
    pub question_count: usize,
}

impl SurveyReport {
    /// Build a report from a survey and its stored responses.
    pub fn new(
        survey: &Survey,
        responses: &[Response],
        invitation_count: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            survey: SurveySummary {
                id: survey.id(),
                title: survey.title().to_string(),
                status: survey.status(),
                question_count: survey.questions().len(),
            },
            invitation_count,
            aggregate: compute_aggregate(survey, responses, invitation_count),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SurveyReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Render the report as markdown for dashboard display.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {}\n\n", self.survey.title));
        let average = self
            .aggregate
            .overall_average_rating
            .map_or("n/a".to_string(), |m| format!("{m:.2}"));
        md.push_str(&format!(
            "**{}** | {} responses | completion {:.1}% | average rating {}\n\n",
            self.survey.status,
            self.aggregate.response_count,
            self.aggregate.completion_rate * 100.0,
            average,
        ));

        md.push_str("| Question | Answered | Rate | Summary |\n");
        md.push_str("|----------|----------|------|---------|\n");
        for question in &self.aggregate.questions {
            md.push_str(&format!(
                "| {} | {} | {:.1}% | {} |\n",
                question.prompt,
                question.answered,
                question.answer_rate * 100.0,
                summary_cell(&question.summary),
            ));
        }

        md
    }
}

fn summary_cell(summary: &KindSummary) -> String {
    match summary {
        KindSummary::Rating { mean, .. } => mean
            .map_or("no ratings".to_string(), |m| format!("mean {m:.2}")),
        KindSummary::Frequency { counts } => counts
            .iter()
            .map(|c| format!("{} {}", c.choice, c.count))
            .collect::<Vec<_>>()
            .join(", "),
        KindSummary::Count { answered } => format!("{answered} answered"),
        KindSummary::Numeric { mean, min, max, .. } => match (mean, min, max) {
            (Some(mean), Some(min), Some(max)) => {
                format!("mean {mean:.2}, min {min}, max {max}")
            }
            _ => "no values".to_string(),
        },
        KindSummary::Likert { statements } => {
            format!("{} statements", statements.len())
        }
    }
}
