//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod admin;
pub mod projects;
pub mod reviews;

pub use admin::{
    add_criteria, assign_reviews, close_project, create_project, list_projects, score_project,
};
pub use projects::{get_project, get_reviews, submit_project};
pub use reviews::submit_review;
