//! SeaORM entity models
//!
//! Table-shaped structs used by the PostgreSQL adapters. Domain code never
//! sees these; the adapters convert them with `From` impls.

pub mod courses;
pub mod criteria_responses;
pub mod enrollments;
pub mod peer_reviews;
pub mod project_submissions;
pub mod projects;
pub mod review_criteria;
