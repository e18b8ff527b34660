//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod course_repo;
pub mod criteria_response_repo;
pub mod enrollment_repo;
pub mod peer_review_repo;
pub mod project_repo;
pub mod review_criteria_repo;
pub mod submission_repo;


pub use course_repo::PostgresCourseRepository;
pub use criteria_response_repo::PostgresCriteriaResponseRepository;
pub use enrollment_repo::PostgresEnrollmentRepository;
pub use peer_review_repo::PostgresPeerReviewRepository;
pub use project_repo::PostgresProjectRepository;
pub use review_criteria_repo::PostgresReviewCriteriaRepository;
pub use submission_repo::PostgresSubmissionRepository;
