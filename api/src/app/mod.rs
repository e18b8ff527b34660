//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and repository ports.

pub mod assignment_service;
pub mod project_service;
pub mod review_config;
pub mod review_service;
pub mod rubric;
pub mod scoring_service;
pub mod submission_service;

pub use assignment_service::{AssignmentReport, AssignmentService};
pub use project_service::{ProjectService, SweepReport};
pub use review_service::{ReviewAnswer, ReviewAssignments, ReviewOutcome, ReviewService};
pub use scoring_service::{ScoringReport, ScoringService};
pub use submission_service::{ProjectView, SubmissionOutcome, SubmissionService};
