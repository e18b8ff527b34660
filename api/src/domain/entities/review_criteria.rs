//! Review criteria domain entity
//!
//! A rubric dimension shared by every project of a course. Options are an
//! ordered list of labels; answers refer to them by 1-based index.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::course::CourseId;

/// Unique identifier for a review criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CriteriaId(pub Uuid);

impl CriteriaId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CriteriaId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CriteriaId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CriteriaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a criterion is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewCriteriaType {
    /// Single choice
    RadioButtons,
    /// Multiple choice
    Checkboxes,
}

impl ReviewCriteriaType {
    pub fn code(&self) -> &'static str {
        match self {
            ReviewCriteriaType::RadioButtons => "RB",
            ReviewCriteriaType::Checkboxes => "CB",
        }
    }
}

impl std::fmt::Display for ReviewCriteriaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewCriteriaType::RadioButtons => write!(f, "radio_buttons"),
            ReviewCriteriaType::Checkboxes => write!(f, "checkboxes"),
        }
    }
}

impl std::str::FromStr for ReviewCriteriaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rb" | "radio_buttons" => Ok(ReviewCriteriaType::RadioButtons),
            "cb" | "checkboxes" => Ok(ReviewCriteriaType::Checkboxes),
            _ => Err(format!("Unknown review criteria type: {}", s)),
        }
    }
}

/// Which end of the option list is the good end.
///
/// For radio buttons, `HigherIsBetter` means later options rank higher. For
/// checkboxes it means every ticked box is a positive attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringDirection {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

impl std::fmt::Display for ScoringDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringDirection::HigherIsBetter => write!(f, "higher_is_better"),
            ScoringDirection::LowerIsBetter => write!(f, "lower_is_better"),
        }
    }
}

impl std::str::FromStr for ScoringDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "higher_is_better" => Ok(ScoringDirection::HigherIsBetter),
            "lower_is_better" => Ok(ScoringDirection::LowerIsBetter),
            _ => Err(format!("Unknown scoring direction: {}", s)),
        }
    }
}

/// A rubric dimension with a fixed option set
#[derive(Debug, Clone, Serialize)]
pub struct ReviewCriteria {
    pub id: CriteriaId,
    pub course_id: CourseId,
    pub description: String,
    pub review_criteria_type: ReviewCriteriaType,
    pub options: Vec<String>,
    pub direction: ScoringDirection,
}

impl ReviewCriteria {
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Label for a 1-based option index
    pub fn option_label(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }
}

/// Data needed to create a new review criterion
#[derive(Debug, Clone)]
pub struct NewReviewCriteria {
    pub course_id: CourseId,
    pub description: String,
    pub review_criteria_type: ReviewCriteriaType,
    pub options: Vec<String>,
    pub direction: ScoringDirection,
}
