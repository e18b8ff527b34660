//! Course and enrollment domain entities
//!
//! A course owns projects and review criteria. Students join a course through
//! an enrollment, which is created lazily on their first project submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a platform user (student or instructor).
///
/// Users are managed by the external authentication service; the core only
/// ever sees their ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseId(pub Uuid);

impl CourseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CourseId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CourseId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A course run by a single instructor
#[derive(Debug, Clone, Serialize)]
pub struct Course {
    pub id: CourseId,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub instructor_id: UserId,
    pub finished: bool,
    pub created_at: DateTime<Utc>,
}

impl Course {
    /// Check if a user is allowed to run administrative operations on this course
    pub fn is_managed_by(&self, user_id: &UserId) -> bool {
        self.instructor_id == *user_id
    }
}

/// The authenticated user behind a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub is_superuser: bool,
}

impl Actor {
    pub fn student(user_id: UserId) -> Self {
        Self {
            user_id,
            is_superuser: false,
        }
    }

    /// Superusers manage every course; instructors only their own
    pub fn can_manage(&self, course: &Course) -> bool {
        self.is_superuser || course.is_managed_by(&self.user_id)
    }
}

/// Unique identifier for an enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnrollmentId(pub Uuid);

impl EnrollmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EnrollmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EnrollmentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A student's membership in a course. Unique per (course, student).
#[derive(Debug, Clone, Serialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub course_id: CourseId,
    pub student_id: UserId,
    pub enrollment_date: DateTime<Utc>,
}

/// Key used to look up or create an enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewEnrollment {
    pub course_id: CourseId,
    pub student_id: UserId,
}
