//! TOML survey instrument parser.
//!
//! Survey instruments are authored as TOML documents (a `[survey]` header
//! plus a `[[questions]]` array) and loaded from files or directories.
//! Every question passes through the schema's construction path, so malformed
//! configurations and unknown question type tags are rejected at load time.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::question::Question;
use crate::survey::{Survey, SurveySettings};

/// Intermediate TOML structure for parsing instrument files.
#[derive(Debug, Deserialize)]
struct TomlSurveyFile {
    survey: TomlSurveyHeader,
    #[serde(default)]
    questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct TomlSurveyHeader {
    title: String,
    #[serde(default)]
    anonymous: bool,
    #[serde(default)]
    allow_multiple_responses: bool,
    #[serde(default)]
    opens_at: Option<DateTime<Utc>>,
    #[serde(default)]
    closes_at: Option<DateTime<Utc>>,
}

/// Parse a TOML instrument file into a draft `Survey`.
pub fn parse_survey(path: &Path) -> Result<Survey> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read survey definition: {}", path.display()))?;
    parse_survey_str(&content, path)
}

/// Parse a TOML string into a draft `Survey` (useful for testing).
pub fn parse_survey_str(content: &str, source_path: &Path) -> Result<Survey> {
    let parsed: TomlSurveyFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let settings = SurveySettings {
        anonymous: parsed.survey.anonymous,
        allow_multiple_responses: parsed.survey.allow_multiple_responses,
        opens_at: parsed.survey.opens_at,
        closes_at: parsed.survey.closes_at,
    };

    let mut survey = Survey::new(parsed.survey.title, settings)
        .with_context(|| format!("invalid survey settings: {}", source_path.display()))?;
    for question in parsed.questions {
        let id = question.id.clone();
        survey.add_question(question).with_context(|| {
            format!("invalid question '{}' in {}", id, source_path.display())
        })?;
    }
    Ok(survey)
}

/// Load every `.toml` instrument in a directory, sorted by file name.
pub fn load_surveys(dir: &Path) -> Result<Vec<Survey>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    paths.iter().map(|path| parse_survey(path)).collect()
}
