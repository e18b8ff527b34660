//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod course;
pub mod criteria_response;
pub mod peer_review;
pub mod project;
pub mod review_criteria;
pub mod submission;

pub use course::{Actor, Course, CourseId, Enrollment, EnrollmentId, NewEnrollment, UserId};
pub use criteria_response::{
    Answer, AnswerError, CriteriaResponse, CriteriaResponseId, NewCriteriaResponse,
    ANSWER_DELIMITER,
};
pub use peer_review::{NewPeerReview, PeerReview, PeerReviewId, PeerReviewState};
pub use project::{NewProject, Project, ProjectId, ProjectState};
pub use review_criteria::{
    CriteriaId, NewReviewCriteria, ReviewCriteria, ReviewCriteriaType, ScoringDirection,
};
pub use submission::{
    NewProjectSubmission, ProjectSubmission, SubmissionForm, SubmissionId, SubmissionScore,
};
