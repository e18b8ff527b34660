//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::{Duration, Utc};

use crate::domain::entities::{
    Course, CourseId, CriteriaId, Enrollment, EnrollmentId, Project, ProjectId, ProjectState,
    ProjectSubmission, ReviewCriteria, ReviewCriteriaType, ScoringDirection, SubmissionForm,
    SubmissionId, UserId,
};

/// Create a test course with its own instructor
pub fn test_course() -> Course {
    Course {
        id: CourseId::new(),
        slug: "mlops-zoomcamp".to_string(),
        title: "MLOps Zoomcamp".to_string(),
        description: Some("A test course".to_string()),
        instructor_id: UserId::new(),
        finished: false,
        created_at: Utc::now(),
    }
}

/// Create a test enrollment
pub fn test_enrollment(course_id: &CourseId, student_id: &UserId) -> Enrollment {
    Enrollment {
        id: EnrollmentId::new(),
        course_id: *course_id,
        student_id: *student_id,
        enrollment_date: Utc::now(),
    }
}

/// Create a project collecting submissions. The submission deadline is a day
/// away and peer review closes a week after that.
pub fn test_project() -> Project {
    test_project_for(&CourseId::new(), ProjectState::CollectingSubmissions)
}

/// Create a test project in a specific lifecycle state
pub fn test_project_in_state(state: ProjectState) -> Project {
    test_project_for(&CourseId::new(), state)
}

/// Create a test project of a course in a specific lifecycle state
pub fn test_project_for(course_id: &CourseId, state: ProjectState) -> Project {
    let now = Utc::now();
    Project {
        id: ProjectId::new(),
        course_id: *course_id,
        slug: "test-project".to_string(),
        title: "Test project".to_string(),
        description: Some("A test project".to_string()),
        submission_due_date: now + Duration::days(1),
        peer_review_due_date: now + Duration::days(8),
        state,
        points_for_peer_review: 10.0,
        created_at: now,
    }
}

/// Create a valid submission form with the given commit id
pub fn test_submission_form(commit_id: &str) -> SubmissionForm {
    SubmissionForm {
        github_link: "https://github.com/testuser/project".to_string(),
        commit_id: commit_id.to_string(),
        time_spent: Some(2.0),
        problems_comments: None,
        faq_contribution: None,
    }
}

/// Create a submission to a project by a fresh student
pub fn test_submission(project: &Project) -> ProjectSubmission {
    let id = SubmissionId::new();
    ProjectSubmission {
        id,
        project_id: project.id,
        student_id: UserId::new(),
        enrollment_id: EnrollmentId::new(),
        github_link: format!("https://github.com/student-{}/project", id.0.simple()),
        commit_id: "1234567".to_string(),
        time_spent: Some(2.0),
        problems_comments: None,
        faq_contribution: None,
        submitted_at: Utc::now(),
        peer_review_score: None,
        needs_manual_review: false,
        reviews_completed: 0,
    }
}

fn labels(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{} {}", prefix, i)).collect()
}

/// Create a radio-button criterion with `n` options
pub fn test_radio_criteria(n: usize) -> ReviewCriteria {
    test_radio_criteria_for(&CourseId::new(), n)
}

/// Create a checkbox criterion with `n` options
pub fn test_checkbox_criteria(n: usize) -> ReviewCriteria {
    test_checkbox_criteria_for(&CourseId::new(), n)
}

/// Create a radio-button criterion of a course
pub fn test_radio_criteria_for(course_id: &CourseId, n: usize) -> ReviewCriteria {
    ReviewCriteria {
        id: CriteriaId::new(),
        course_id: *course_id,
        description: "Problem description".to_string(),
        review_criteria_type: ReviewCriteriaType::RadioButtons,
        options: labels("Level", n),
        direction: ScoringDirection::HigherIsBetter,
    }
}

/// Create a checkbox criterion of a course
pub fn test_checkbox_criteria_for(course_id: &CourseId, n: usize) -> ReviewCriteria {
    ReviewCriteria {
        id: CriteriaId::new(),
        course_id: *course_id,
        description: "Best practices".to_string(),
        review_criteria_type: ReviewCriteriaType::Checkboxes,
        options: labels("Practice", n),
        direction: ScoringDirection::HigherIsBetter,
    }
}
