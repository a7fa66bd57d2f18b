//! Questions and the closed set of question kinds.
//!
//! Each kind carries its own configuration; the validation and scoring rules
//! for every kind live in [`crate::registry`], dispatched on the tag exactly
//! once.

use serde::{Deserialize, Serialize};

/// The closed set of question kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Integer scale from 1 to `scale_max`, with optional per-step labels.
    Rating {
        scale_max: u8,
        #[serde(default)]
        labels: Vec<String>,
    },

    /// Single selection from an ordered list of choices.
    MultipleChoice { choices: Vec<String> },

    /// Subset selection from an ordered list of choices.
    Checkbox { choices: Vec<String> },

    /// Single-line free text.
    Text {
        #[serde(default)]
        placeholder: Option<String>,
    },

    /// Multi-line free text.
    Textarea {
        #[serde(default)]
        placeholder: Option<String>,
    },

    /// Numeric value with optional inclusive bounds.
    Number {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },

    /// Calendar date, no time component.
    Date,

    /// Exactly yes or no.
    YesNo,

    /// Statements each scored independently on a shared ordered scale.
    Likert {
        statements: Vec<String>,
        scale: Vec<String>,
    },
}

impl QuestionKind {
    /// Stable name of this kind, matching the serialized tag.
    pub fn name(&self) -> &'static str {
        match self {
            QuestionKind::Rating { .. } => "rating",
            QuestionKind::MultipleChoice { .. } => "multiple_choice",
            QuestionKind::Checkbox { .. } => "checkbox",
            QuestionKind::Text { .. } => "text",
            QuestionKind::Textarea { .. } => "textarea",
            QuestionKind::Number { .. } => "number",
            QuestionKind::Date => "date",
            QuestionKind::YesNo => "yes_no",
            QuestionKind::Likert { .. } => "likert",
        }
    }

    /// Whether answers to this kind feed the overall average rating.
    pub fn is_rating(&self) -> bool {
        matches!(self, QuestionKind::Rating { .. })
    }
}

/// One typed prompt within a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within its survey.
    pub id: String,
    /// The prompt text shown to respondents.
    pub prompt: String,
    /// Whether a valid completed response must answer this question.
    #[serde(default)]
    pub required: bool,
    /// The kind of question and its type-specific configuration.
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    /// Create a new optional question.
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            required: false,
            kind,
        }
    }

    /// Mark the question as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_match_tags() {
        assert_eq!(
            QuestionKind::Rating {
                scale_max: 5,
                labels: vec![]
            }
            .name(),
            "rating"
        );
        assert_eq!(QuestionKind::YesNo.name(), "yes_no");
        assert_eq!(
            QuestionKind::Likert {
                statements: vec!["s".into()],
                scale: vec!["a".into(), "b".into()]
            }
            .name(),
            "likert"
        );
    }

    #[test]
    fn question_serde_roundtrip() {
        let question = Question::new(
            "q1",
            "How would you rate the lectures?",
            QuestionKind::Rating {
                scale_max: 5,
                labels: vec![],
            },
        )
        .required();

        let json = serde_json::to_string(&question).unwrap();
        let deserialized: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, question);
        assert!(json.contains("\"type\":\"rating\""));
    }

    #[test]
    fn kind_tag_is_flattened() {
        let json = r#"{
            "id": "q2",
            "prompt": "Which topics helped most?",
            "required": false,
            "type": "checkbox",
            "choices": ["Ownership", "Traits", "Async"]
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.kind.name(), "checkbox");
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let json = r#"{"id": "q3", "prompt": "?", "type": "ranking"}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }
}
