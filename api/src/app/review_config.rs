//! Peer review configuration constants
//!
//! Defaults for the assignment engine. The reviews-per-submission target can
//! be overridden at runtime through [`crate::config::Config`].

/// Reviewers assigned to each submission unless configured otherwise
pub const DEFAULT_REVIEWS_PER_SUBMISSION: usize = 3;

/// Fewest submissions a project needs before reviews can be assigned
pub const MIN_SUBMISSIONS_FOR_REVIEW: usize = 2;
