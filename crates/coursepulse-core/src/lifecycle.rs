//! Survey lifecycle states and the legal transition set.
//!
//! Status is never compared or assigned ad hoc elsewhere. The edge rules
//! live here, and [`crate::survey::Survey::transition`] is the only mutation
//! path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a survey. Only `active` surveys accept responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyStatus {
    Draft,
    Active,
    Paused,
    Closed,
}

impl SurveyStatus {
    /// Whether the edge from `self` to `target` is legal.
    ///
    /// `closed` is terminal. `paused` is reachable only from `active` and
    /// returns only to `active` or `closed`; it never falls back to `draft`.
    pub fn can_transition_to(self, target: SurveyStatus) -> bool {
        use SurveyStatus::*;
        matches!(
            (self, target),
            (Draft, Active)
                | (Active, Paused)
                | (Paused, Active)
                | (Draft, Closed)
                | (Active, Closed)
                | (Paused, Closed)
        )
    }

    /// Whether structural edits (adding or removing questions) are allowed.
    pub fn allows_editing(self) -> bool {
        matches!(self, SurveyStatus::Draft | SurveyStatus::Paused)
    }

    /// Whether this is the terminal state.
    pub fn is_terminal(self) -> bool {
        self == SurveyStatus::Closed
    }
}

impl fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveyStatus::Draft => write!(f, "draft"),
            SurveyStatus::Active => write!(f, "active"),
            SurveyStatus::Paused => write!(f, "paused"),
            SurveyStatus::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for SurveyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(SurveyStatus::Draft),
            "active" => Ok(SurveyStatus::Active),
            "paused" => Ok(SurveyStatus::Paused),
            "closed" => Ok(SurveyStatus::Closed),
            other => Err(format!("unknown survey status: {other}")),
        }
    }
}
