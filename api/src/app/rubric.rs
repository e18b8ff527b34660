//! Rubric scoring
//!
//! Pure functions that turn stored criteria responses into numbers.
//!
//! - A radio-button answer scores by rank: option `i` of `n` is worth
//!   `(i - 1) / (n - 1)`, and a single-option criterion is worth 1.
//! - A checkbox answer scores the fraction of options ticked.
//! - `LowerIsBetter` criteria invert the raw value (`1 - raw`).
//!
//! Every sub-score lies in `[0, 1]`. A review's aggregate is the mean across
//! all criteria of the course. A missing or malformed response counts as 0
//! for that criterion, so one corrupt row cannot block a batch.

use std::collections::HashMap;

use crate::domain::entities::{
    Answer, AnswerError, CriteriaId, PeerReviewId, ReviewCriteria, ScoringDirection,
};

/// Sub-score in `[0, 1]` for one stored answer to one criterion
pub fn criteria_score(criteria: &ReviewCriteria, raw: &str) -> Result<f64, AnswerError> {
    let options = criteria.option_count();
    let answer = Answer::decode(raw, criteria.review_criteria_type, options)?;

    let raw_score = match answer {
        Answer::Single(_) if options <= 1 => 1.0,
        Answer::Single(index) => (index - 1) as f64 / (options - 1) as f64,
        Answer::Multiple(_) if options == 0 => 0.0,
        Answer::Multiple(selected) => selected.len() as f64 / options as f64,
    };

    Ok(match criteria.direction {
        ScoringDirection::HigherIsBetter => raw_score,
        ScoringDirection::LowerIsBetter => 1.0 - raw_score,
    })
}

/// Aggregate of one submitted review
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewScore {
    /// Mean sub-score across the rubric, in `[0, 1]`
    pub value: f64,
    /// Criteria whose stored answer could not be decoded
    pub malformed: usize,
    /// Criteria the review has no response for
    pub missing: usize,
}

/// Score one review against the full course rubric.
///
/// `answers` maps criteria to the raw stored answer string.
pub fn score_review(
    review_id: &PeerReviewId,
    rubric: &[ReviewCriteria],
    answers: &HashMap<CriteriaId, &str>,
) -> ReviewScore {
    let mut total = 0.0;
    let mut malformed = 0;
    let mut missing = 0;

    for criteria in rubric {
        let Some(raw) = answers.get(&criteria.id) else {
            missing += 1;
            continue;
        };

        match criteria_score(criteria, raw) {
            Ok(score) => total += score,
            Err(e) => {
                malformed += 1;
                tracing::warn!(
                    review_id = %review_id,
                    criteria_id = %criteria.id,
                    answer = %raw,
                    error = %e,
                    "Malformed criteria response scored as zero"
                );
            }
        }
    }

    let value = if rubric.is_empty() {
        0.0
    } else {
        total / rubric.len() as f64
    };

    ReviewScore {
        value,
        malformed,
        missing,
    }
}

/// Final submission score: mean review aggregate scaled to the project's
/// peer-review points. `None` when no review was submitted.
pub fn final_score(review_values: &[f64], points_for_peer_review: f64) -> Option<f64> {
    if review_values.is_empty() {
        return None;
    }

    let mean = review_values.iter().sum::<f64>() / review_values.len() as f64;
    let points = points_for_peer_review.max(0.0);
    Some((mean * points).clamp(0.0, points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ReviewCriteriaType;
    use crate::test_utils::{test_checkbox_criteria, test_radio_criteria};

    const EPS: f64 = 1e-9;

    #[test]
    fn radio_score_is_rank_based() {
        let criteria = test_radio_criteria(3);
        assert!((criteria_score(&criteria, "1").unwrap() - 0.0).abs() < EPS);
        assert!((criteria_score(&criteria, "2").unwrap() - 0.5).abs() < EPS);
        assert!((criteria_score(&criteria, "3").unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn single_option_radio_is_full_marks() {
        let criteria = test_radio_criteria(1);
        assert!((criteria_score(&criteria, "1").unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn checkbox_score_is_fraction_selected() {
        let criteria = test_checkbox_criteria(4);
        assert!((criteria_score(&criteria, "1,3").unwrap() - 0.5).abs() < EPS);
        assert!((criteria_score(&criteria, "").unwrap() - 0.0).abs() < EPS);
        assert!((criteria_score(&criteria, "1,2,3,4").unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn lower_is_better_inverts() {
        let mut criteria = test_checkbox_criteria(4);
        criteria.direction = ScoringDirection::LowerIsBetter;
        assert!((criteria_score(&criteria, "1").unwrap() - 0.75).abs() < EPS);
        assert!((criteria_score(&criteria, "").unwrap() - 1.0).abs() < EPS);

        let mut radio = test_radio_criteria(5);
        radio.direction = ScoringDirection::LowerIsBetter;
        assert!((criteria_score(&radio, "5").unwrap() - 0.0).abs() < EPS);
    }

    #[test]
    fn out_of_range_answer_is_an_error() {
        let criteria = test_checkbox_criteria(4);
        assert!(matches!(
            criteria_score(&criteria, "9"),
            Err(AnswerError::OutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn malformed_answer_contributes_zero_without_aborting() {
        let radio = test_radio_criteria(3);
        let checkbox = test_checkbox_criteria(4);
        assert_eq!(checkbox.review_criteria_type, ReviewCriteriaType::Checkboxes);

        let rubric = vec![radio.clone(), checkbox.clone()];
        let answers = HashMap::from([(radio.id, "3"), (checkbox.id, "9")]);

        let score = score_review(&PeerReviewId::new(), &rubric, &answers);
        assert_eq!(score.malformed, 1);
        assert_eq!(score.missing, 0);
        // (1.0 + 0.0) / 2
        assert!((score.value - 0.5).abs() < EPS);
    }

    #[test]
    fn missing_response_contributes_zero() {
        let radio = test_radio_criteria(3);
        let checkbox = test_checkbox_criteria(4);
        let rubric = vec![radio.clone(), checkbox];
        let answers = HashMap::from([(radio.id, "3")]);

        let score = score_review(&PeerReviewId::new(), &rubric, &answers);
        assert_eq!(score.missing, 1);
        assert!((score.value - 0.5).abs() < EPS);
    }

    #[test]
    fn final_score_is_scaled_mean() {
        assert_eq!(final_score(&[], 10.0), None);
        let score = final_score(&[1.0, 0.5], 10.0).unwrap();
        assert!((score - 7.5).abs() < EPS);
    }

    #[test]
    fn final_score_stays_within_points() {
        let score = final_score(&[1.0, 1.0, 1.0], 3.0).unwrap();
        assert!(score <= 3.0);
        let score = final_score(&[0.0], 3.0).unwrap();
        assert!(score >= 0.0);
    }
}
