//! Criteria response domain entity and the answer codec
//!
//! Answers are persisted as a single string. A single-choice answer is one
//! 1-based option index (`"2"`). A multi-choice answer is the comma-joined set of
//! selected 1-based indices (`"1,3"`), and the empty string means nothing was
//! ticked. That string format is a stored contract, so encoding and decoding
//! live here and nowhere else.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::peer_review::PeerReviewId;
use super::review_criteria::{CriteriaId, ReviewCriteriaType};

/// Separator between selected indices of a multi-choice answer
pub const ANSWER_DELIMITER: char = ',';

/// Unique identifier for a criteria response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CriteriaResponseId(pub Uuid);

impl CriteriaResponseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CriteriaResponseId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CriteriaResponseId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CriteriaResponseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One reviewer's raw answer to one criterion
#[derive(Debug, Clone, Serialize)]
pub struct CriteriaResponse {
    pub id: CriteriaResponseId,
    pub review_id: PeerReviewId,
    pub criteria_id: CriteriaId,
    pub answer: String,
}

/// Data needed to create a new criteria response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCriteriaResponse {
    pub review_id: PeerReviewId,
    pub criteria_id: CriteriaId,
    pub answer: String,
}

/// A stored answer that cannot be interpreted against its criterion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("Single-choice answer is empty")]
    Empty,

    #[error("Answer part is not an option index: {0:?}")]
    NotANumber(String),

    #[error("Option index {index} is outside 1..={options}")]
    OutOfRange { index: usize, options: usize },

    #[error("Option index {0} selected more than once")]
    Duplicate(usize),
}

/// A decoded answer. Indices are 1-based and always within the option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Single(usize),
    Multiple(BTreeSet<usize>),
}

impl Answer {
    /// Decode a stored answer for a criterion of the given type and option count
    pub fn decode(
        raw: &str,
        criteria_type: ReviewCriteriaType,
        option_count: usize,
    ) -> Result<Self, AnswerError> {
        let raw = raw.trim();
        match criteria_type {
            ReviewCriteriaType::RadioButtons => {
                if raw.is_empty() {
                    return Err(AnswerError::Empty);
                }
                parse_index(raw, option_count).map(Answer::Single)
            }
            ReviewCriteriaType::Checkboxes => {
                let mut selected = BTreeSet::new();
                if raw.is_empty() {
                    return Ok(Answer::Multiple(selected));
                }
                for part in raw.split(ANSWER_DELIMITER) {
                    let index = parse_index(part.trim(), option_count)?;
                    if !selected.insert(index) {
                        return Err(AnswerError::Duplicate(index));
                    }
                }
                Ok(Answer::Multiple(selected))
            }
        }
    }

    /// Encode to the stored string form. Multi-choice indices are written in
    /// ascending order.
    pub fn encode(&self) -> String {
        match self {
            Answer::Single(index) => index.to_string(),
            Answer::Multiple(selected) => selected
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(&ANSWER_DELIMITER.to_string()),
        }
    }
}

fn parse_index(part: &str, option_count: usize) -> Result<usize, AnswerError> {
    let index: usize = part
        .parse()
        .map_err(|_| AnswerError::NotANumber(part.to_string()))?;
    if index == 0 || index > option_count {
        return Err(AnswerError::OutOfRange {
            index,
            options: option_count,
        });
    }
    Ok(index)
}
