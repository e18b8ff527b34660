//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    Course, CourseId, CriteriaId, CriteriaResponse, CriteriaResponseId, Enrollment, EnrollmentId,
    NewCriteriaResponse, NewEnrollment, NewPeerReview, NewProject, NewProjectSubmission,
    NewReviewCriteria, PeerReview, PeerReviewId, PeerReviewState, Project, ProjectId, ProjectState,
    ProjectSubmission, ReviewCriteria, SubmissionForm, SubmissionId, SubmissionScore, UserId,
};
use crate::domain::ports::{
    CourseRepository, CriteriaResponseRepository, EnrollmentRepository, PeerReviewRepository,
    ProjectRepository, ReviewCriteriaRepository, SubmissionRepository,
};
use crate::error::DomainError;

// ============================================================================
// In-Memory Course Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryCourseRepository {
    courses: Arc<RwLock<HashMap<CourseId, Course>>>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_course(self, course: Course) -> Self {
        {
            let mut courses = self.courses.write().unwrap();
            courses.insert(course.id, course);
        }
        self
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        let courses = self.courses.read().unwrap();
        Ok(courses.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Course>, DomainError> {
        let courses = self.courses.read().unwrap();
        Ok(courses.values().cloned().collect())
    }

    async fn find_by_instructor(
        &self,
        instructor_id: &UserId,
    ) -> Result<Vec<Course>, DomainError> {
        let courses = self.courses.read().unwrap();
        Ok(courses
            .values()
            .filter(|c| c.instructor_id == *instructor_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// In-Memory Enrollment Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryEnrollmentRepository {
    enrollments: Arc<RwLock<HashMap<(CourseId, UserId), Enrollment>>>,
}

impl InMemoryEnrollmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enrollment(self, enrollment: Enrollment) -> Self {
        {
            let mut enrollments = self.enrollments.write().unwrap();
            enrollments.insert((enrollment.course_id, enrollment.student_id), enrollment);
        }
        self
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryEnrollmentRepository {
    async fn find(
        &self,
        course_id: &CourseId,
        student_id: &UserId,
    ) -> Result<Option<Enrollment>, DomainError> {
        let enrollments = self.enrollments.read().unwrap();
        Ok(enrollments.get(&(*course_id, *student_id)).cloned())
    }

    async fn get_or_create(
        &self,
        new_enrollment: &NewEnrollment,
    ) -> Result<(Enrollment, bool), DomainError> {
        let mut enrollments = self.enrollments.write().unwrap();
        let key = (new_enrollment.course_id, new_enrollment.student_id);

        if let Some(existing) = enrollments.get(&key) {
            return Ok((existing.clone(), false));
        }

        let enrollment = Enrollment {
            id: EnrollmentId::new(),
            course_id: new_enrollment.course_id,
            student_id: new_enrollment.student_id,
            enrollment_date: Utc::now(),
        };
        enrollments.insert(key, enrollment.clone());
        Ok((enrollment, true))
    }
}

// ============================================================================
// In-Memory Project Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryProjectRepository {
    projects: Arc<RwLock<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, project: Project) -> Self {
        {
            let mut projects = self.projects.write().unwrap();
            projects.insert(project.id, project);
        }
        self
    }

    /// Move a project's submission deadline (for sweeper tests)
    pub fn set_submission_due_date(&self, id: &ProjectId, due: DateTime<Utc>) {
        let mut projects = self.projects.write().unwrap();
        if let Some(project) = projects.get_mut(id) {
            project.submission_due_date = due;
        }
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        let projects = self.projects.read().unwrap();
        Ok(projects.get(id).cloned())
    }

    async fn find_by_course(&self, course_id: &CourseId) -> Result<Vec<Project>, DomainError> {
        let projects = self.projects.read().unwrap();
        let mut result: Vec<Project> = projects
            .values()
            .filter(|p| p.course_id == *course_id)
            .cloned()
            .collect();
        result.sort_by_key(|p| p.submission_due_date);
        Ok(result)
    }

    async fn find_by_state(&self, state: ProjectState) -> Result<Vec<Project>, DomainError> {
        let projects = self.projects.read().unwrap();
        Ok(projects
            .values()
            .filter(|p| p.state == state)
            .cloned()
            .collect())
    }

    async fn create(&self, new_project: &NewProject) -> Result<Project, DomainError> {
        let mut projects = self.projects.write().unwrap();
        if projects
            .values()
            .any(|p| p.course_id == new_project.course_id && p.slug == new_project.slug)
        {
            return Err(DomainError::AlreadyExists(format!(
                "Project slug already used in course: {}",
                new_project.slug
            )));
        }

        let project = Project {
            id: ProjectId::new(),
            course_id: new_project.course_id,
            slug: new_project.slug.clone(),
            title: new_project.title.clone(),
            description: new_project.description.clone(),
            submission_due_date: new_project.submission_due_date,
            peer_review_due_date: new_project.peer_review_due_date,
            state: ProjectState::CollectingSubmissions,
            points_for_peer_review: new_project.points_for_peer_review,
            created_at: Utc::now(),
        };
        projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn transition_state(
        &self,
        id: &ProjectId,
        from: ProjectState,
        to: ProjectState,
    ) -> Result<bool, DomainError> {
        let mut projects = self.projects.write().unwrap();
        match projects.get_mut(id) {
            Some(project) if project.state == from => {
                project.state = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// ============================================================================
// In-Memory Submission Repository
// ============================================================================

#[derive(Default)]
pub struct InMemorySubmissionRepository {
    submissions: Arc<RwLock<HashMap<SubmissionId, ProjectSubmission>>>,
}

impl InMemorySubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_submission(self, submission: ProjectSubmission) -> Self {
        self.insert(submission);
        self
    }

    /// Add a submission to a repository already shared with a service
    pub fn insert(&self, submission: ProjectSubmission) {
        let mut submissions = self.submissions.write().unwrap();
        submissions.insert(submission.id, submission);
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn find_by_id(
        &self,
        id: &SubmissionId,
    ) -> Result<Option<ProjectSubmission>, DomainError> {
        let submissions = self.submissions.read().unwrap();
        Ok(submissions.get(id).cloned())
    }

    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<ProjectSubmission>, DomainError> {
        let submissions = self.submissions.read().unwrap();
        Ok(submissions
            .values()
            .filter(|s| s.project_id == *project_id)
            .cloned()
            .collect())
    }

    async fn find_by_project_and_student(
        &self,
        project_id: &ProjectId,
        student_id: &UserId,
    ) -> Result<Option<ProjectSubmission>, DomainError> {
        let submissions = self.submissions.read().unwrap();
        Ok(submissions
            .values()
            .find(|s| s.project_id == *project_id && s.student_id == *student_id)
            .cloned())
    }

    async fn get_or_create(
        &self,
        new_submission: &NewProjectSubmission,
    ) -> Result<(ProjectSubmission, bool), DomainError> {
        let mut submissions = self.submissions.write().unwrap();

        if let Some(existing) = submissions.values().find(|s| {
            s.project_id == new_submission.project_id && s.student_id == new_submission.student_id
        }) {
            return Ok((existing.clone(), false));
        }

        let form = &new_submission.form;
        let submission = ProjectSubmission {
            id: SubmissionId::new(),
            project_id: new_submission.project_id,
            student_id: new_submission.student_id,
            enrollment_id: new_submission.enrollment_id,
            github_link: form.github_link.clone(),
            commit_id: form.commit_id.clone(),
            time_spent: form.time_spent,
            problems_comments: form.problems_comments.clone(),
            faq_contribution: form.faq_contribution.clone(),
            submitted_at: Utc::now(),
            peer_review_score: None,
            needs_manual_review: false,
            reviews_completed: 0,
        };
        submissions.insert(submission.id, submission.clone());
        Ok((submission, true))
    }

    async fn update_form(
        &self,
        id: &SubmissionId,
        form: &SubmissionForm,
    ) -> Result<ProjectSubmission, DomainError> {
        let mut submissions = self.submissions.write().unwrap();
        let submission = submissions
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Submission not found: {}", id)))?;

        submission.github_link = form.github_link.clone();
        submission.commit_id = form.commit_id.clone();
        submission.time_spent = form.time_spent;
        submission.problems_comments = form.problems_comments.clone();
        submission.faq_contribution = form.faq_contribution.clone();
        submission.submitted_at = Utc::now();
        Ok(submission.clone())
    }

    async fn record_scores(&self, scores: &[SubmissionScore]) -> Result<(), DomainError> {
        let mut submissions = self.submissions.write().unwrap();
        if let Some(missing) = scores
            .iter()
            .find(|s| !submissions.contains_key(&s.submission_id))
        {
            return Err(DomainError::NotFound(format!(
                "Submission not found: {}",
                missing.submission_id
            )));
        }

        for score in scores {
            if let Some(submission) = submissions.get_mut(&score.submission_id) {
                submission.peer_review_score = score.peer_review_score;
                submission.needs_manual_review = score.needs_manual_review;
                submission.reviews_completed = score.reviews_completed;
            }
        }
        Ok(())
    }
}

// ============================================================================
// In-Memory Review Criteria Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryReviewCriteriaRepository {
    // Vec keeps creation order
    criteria: Arc<RwLock<Vec<ReviewCriteria>>>,
}

impl InMemoryReviewCriteriaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_criteria(self, criteria: ReviewCriteria) -> Self {
        {
            let mut all = self.criteria.write().unwrap();
            all.push(criteria);
        }
        self
    }
}

#[async_trait]
impl ReviewCriteriaRepository for InMemoryReviewCriteriaRepository {
    async fn find_by_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<ReviewCriteria>, DomainError> {
        let criteria = self.criteria.read().unwrap();
        Ok(criteria
            .iter()
            .filter(|c| c.course_id == *course_id)
            .cloned()
            .collect())
    }

    async fn create(&self, new_criteria: &NewReviewCriteria) -> Result<ReviewCriteria, DomainError> {
        let criteria = ReviewCriteria {
            id: CriteriaId::new(),
            course_id: new_criteria.course_id,
            description: new_criteria.description.clone(),
            review_criteria_type: new_criteria.review_criteria_type,
            options: new_criteria.options.clone(),
            direction: new_criteria.direction,
        };
        self.criteria.write().unwrap().push(criteria.clone());
        Ok(criteria)
    }
}

// ============================================================================
// In-Memory Peer Review Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryPeerReviewRepository {
    reviews: Arc<RwLock<HashMap<PeerReviewId, PeerReview>>>,
    fail_writes: bool,
}

impl InMemoryPeerReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose `create_many` always fails
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl PeerReviewRepository for InMemoryPeerReviewRepository {
    async fn find_by_id(&self, id: &PeerReviewId) -> Result<Option<PeerReview>, DomainError> {
        let reviews = self.reviews.read().unwrap();
        Ok(reviews.get(id).cloned())
    }

    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<PeerReview>, DomainError> {
        let reviews = self.reviews.read().unwrap();
        Ok(reviews
            .values()
            .filter(|r| r.project_id == *project_id)
            .cloned()
            .collect())
    }

    async fn find_by_reviewer(
        &self,
        reviewer: &SubmissionId,
    ) -> Result<Vec<PeerReview>, DomainError> {
        let reviews = self.reviews.read().unwrap();
        Ok(reviews
            .values()
            .filter(|r| r.reviewer == *reviewer)
            .cloned()
            .collect())
    }

    async fn count_by_project(&self, project_id: &ProjectId) -> Result<u64, DomainError> {
        let reviews = self.reviews.read().unwrap();
        Ok(reviews
            .values()
            .filter(|r| r.project_id == *project_id)
            .count() as u64)
    }

    async fn create_many(
        &self,
        new_reviews: &[NewPeerReview],
    ) -> Result<Vec<PeerReview>, DomainError> {
        if self.fail_writes {
            return Err(DomainError::Database("connection reset".to_string()));
        }

        let mut reviews = self.reviews.write().unwrap();

        // Validate the whole batch before inserting anything
        let mut pairs: HashSet<(SubmissionId, SubmissionId)> =
            reviews.values().map(|r| (r.reviewer, r.reviewee)).collect();
        for new_review in new_reviews {
            if new_review.is_self_review() {
                return Err(DomainError::Validation(format!(
                    "Submission {} cannot review itself",
                    new_review.reviewer
                )));
            }
            if !pairs.insert((new_review.reviewer, new_review.reviewee)) {
                return Err(DomainError::Conflict(format!(
                    "Review of {} by {} already exists",
                    new_review.reviewee, new_review.reviewer
                )));
            }
        }

        let now = Utc::now();
        let created: Vec<PeerReview> = new_reviews
            .iter()
            .map(|new_review| PeerReview {
                id: PeerReviewId::new(),
                project_id: new_review.project_id,
                reviewer: new_review.reviewer,
                reviewee: new_review.reviewee,
                state: PeerReviewState::Assigned,
                submitted_at: None,
                created_at: now,
            })
            .collect();
        for review in &created {
            reviews.insert(review.id, review.clone());
        }
        Ok(created)
    }

    async fn mark_submitted(
        &self,
        id: &PeerReviewId,
        submitted_at: DateTime<Utc>,
    ) -> Result<PeerReview, DomainError> {
        let mut reviews = self.reviews.write().unwrap();
        let review = reviews
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Review not found: {}", id)))?;
        review.state = PeerReviewState::Submitted;
        review.submitted_at = Some(submitted_at);
        Ok(review.clone())
    }
}

// ============================================================================
// In-Memory Criteria Response Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryCriteriaResponseRepository {
    responses: Arc<RwLock<Vec<CriteriaResponse>>>,
}

impl InMemoryCriteriaResponseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CriteriaResponseRepository for InMemoryCriteriaResponseRepository {
    async fn find_by_reviews(
        &self,
        review_ids: &[PeerReviewId],
    ) -> Result<Vec<CriteriaResponse>, DomainError> {
        let responses = self.responses.read().unwrap();
        Ok(responses
            .iter()
            .filter(|r| review_ids.contains(&r.review_id))
            .cloned()
            .collect())
    }

    async fn replace_for_review(
        &self,
        review_id: &PeerReviewId,
        new_responses: &[NewCriteriaResponse],
    ) -> Result<Vec<CriteriaResponse>, DomainError> {
        let mut responses = self.responses.write().unwrap();
        responses.retain(|r| r.review_id != *review_id);

        let created: Vec<CriteriaResponse> = new_responses
            .iter()
            .map(|new_response| CriteriaResponse {
                id: CriteriaResponseId::new(),
                review_id: *review_id,
                criteria_id: new_response.criteria_id,
                answer: new_response.answer.clone(),
            })
            .collect();
        responses.extend(created.iter().cloned());
        Ok(created)
    }
}
