//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//!
//! Uniqueness of enrollments per (course, student) and submissions per
//! (project, student) is owned by the implementation: `get_or_create` must be
//! a single logical lookup-else-insert, so concurrent first submissions
//! never produce duplicate rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{
    Course, CourseId, CriteriaResponse, Enrollment, NewCriteriaResponse, NewEnrollment,
    NewPeerReview, NewProject, NewProjectSubmission, NewReviewCriteria, PeerReview, PeerReviewId,
    Project, ProjectId, ProjectState, ProjectSubmission, ReviewCriteria, SubmissionForm,
    SubmissionId, SubmissionScore, UserId,
};
use crate::error::DomainError;

/// Repository for Course entities
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Find a course by ID
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError>;

    /// All courses
    async fn find_all(&self) -> Result<Vec<Course>, DomainError>;

    /// Courses taught by an instructor
    async fn find_by_instructor(&self, instructor_id: &UserId)
        -> Result<Vec<Course>, DomainError>;
}

/// Repository for Enrollment entities
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Find the enrollment of a student in a course
    async fn find(
        &self,
        course_id: &CourseId,
        student_id: &UserId,
    ) -> Result<Option<Enrollment>, DomainError>;

    /// Look up the enrollment, creating it if absent.
    /// Returns the enrollment and whether it was created by this call.
    async fn get_or_create(
        &self,
        enrollment: &NewEnrollment,
    ) -> Result<(Enrollment, bool), DomainError>;
}

/// Repository for Project entities
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Find a project by ID
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError>;

    /// Projects of a course, oldest submission deadline first
    async fn find_by_course(&self, course_id: &CourseId) -> Result<Vec<Project>, DomainError>;

    /// Projects currently in a lifecycle state
    async fn find_by_state(&self, state: ProjectState) -> Result<Vec<Project>, DomainError>;

    /// Create a new project in `CollectingSubmissions`
    async fn create(&self, project: &NewProject) -> Result<Project, DomainError>;

    /// Compare-and-set the lifecycle state.
    /// Returns false (and changes nothing) if the project is no longer in `from`.
    async fn transition_state(
        &self,
        id: &ProjectId,
        from: ProjectState,
        to: ProjectState,
    ) -> Result<bool, DomainError>;
}

/// Repository for ProjectSubmission entities
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Find a submission by ID
    async fn find_by_id(&self, id: &SubmissionId)
        -> Result<Option<ProjectSubmission>, DomainError>;

    /// All submissions of a project
    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<ProjectSubmission>, DomainError>;

    /// The submission of a student for a project, if any
    async fn find_by_project_and_student(
        &self,
        project_id: &ProjectId,
        student_id: &UserId,
    ) -> Result<Option<ProjectSubmission>, DomainError>;

    /// Look up the (project, student) submission, creating it from the form if absent.
    /// Returns the submission and whether it was created by this call.
    async fn get_or_create(
        &self,
        submission: &NewProjectSubmission,
    ) -> Result<(ProjectSubmission, bool), DomainError>;

    /// Overwrite the student-provided fields of an existing submission
    async fn update_form(
        &self,
        id: &SubmissionId,
        form: &SubmissionForm,
    ) -> Result<ProjectSubmission, DomainError>;

    /// Write peer-review scores onto their submissions
    async fn record_scores(&self, scores: &[SubmissionScore]) -> Result<(), DomainError>;
}

/// Repository for ReviewCriteria entities
#[async_trait]
pub trait ReviewCriteriaRepository: Send + Sync {
    /// Rubric of a course, in creation order
    async fn find_by_course(&self, course_id: &CourseId)
        -> Result<Vec<ReviewCriteria>, DomainError>;

    /// Create a new criterion
    async fn create(&self, criteria: &NewReviewCriteria) -> Result<ReviewCriteria, DomainError>;
}

/// Repository for PeerReview entities
#[async_trait]
pub trait PeerReviewRepository: Send + Sync {
    /// Find a review by ID
    async fn find_by_id(&self, id: &PeerReviewId) -> Result<Option<PeerReview>, DomainError>;

    /// All reviews of a project
    async fn find_by_project(&self, project_id: &ProjectId)
        -> Result<Vec<PeerReview>, DomainError>;

    /// Reviews a submission's owner has to write
    async fn find_by_reviewer(&self, reviewer: &SubmissionId)
        -> Result<Vec<PeerReview>, DomainError>;

    /// Number of reviews that exist for a project
    async fn count_by_project(&self, project_id: &ProjectId) -> Result<u64, DomainError>;

    /// Create reviews in the `Assigned` state, all or nothing
    async fn create_many(&self, reviews: &[NewPeerReview]) -> Result<Vec<PeerReview>, DomainError>;

    /// Mark a review as submitted
    async fn mark_submitted(
        &self,
        id: &PeerReviewId,
        submitted_at: DateTime<Utc>,
    ) -> Result<PeerReview, DomainError>;
}

/// Repository for CriteriaResponse entities
#[async_trait]
pub trait CriteriaResponseRepository: Send + Sync {
    /// Responses belonging to any of the given reviews
    async fn find_by_reviews(
        &self,
        review_ids: &[PeerReviewId],
    ) -> Result<Vec<CriteriaResponse>, DomainError>;

    /// Replace every response of a review with a new set
    async fn replace_for_review(
        &self,
        review_id: &PeerReviewId,
        responses: &[NewCriteriaResponse],
    ) -> Result<Vec<CriteriaResponse>, DomainError>;
}
