//! CourseKit API Server
//!
//! Course project submissions with anonymous peer review and rubric scoring.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sea_orm::Database;
use serde::Serialize;
use tokio::sync::Mutex;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    PostgresCourseRepository, PostgresCriteriaResponseRepository, PostgresEnrollmentRepository,
    PostgresPeerReviewRepository, PostgresProjectRepository, PostgresReviewCriteriaRepository,
    PostgresSubmissionRepository,
};
use app::{ProjectService, ReviewService, SubmissionService};
use config::Config;

pub type AppSubmissionService = SubmissionService<
    PostgresProjectRepository,
    PostgresEnrollmentRepository,
    PostgresSubmissionRepository,
>;

pub type AppReviewService = ReviewService<
    PostgresProjectRepository,
    PostgresSubmissionRepository,
    PostgresReviewCriteriaRepository,
    PostgresPeerReviewRepository,
    PostgresCriteriaResponseRepository,
>;

pub type AppProjectService = ProjectService<
    PostgresCourseRepository,
    PostgresProjectRepository,
    PostgresSubmissionRepository,
    PostgresReviewCriteriaRepository,
    PostgresPeerReviewRepository,
    PostgresCriteriaResponseRepository,
>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub submission_service: Arc<AppSubmissionService>,
    pub review_service: Arc<AppReviewService>,
    pub project_service: Arc<AppProjectService>,
    /// Randomness for review assignment, shared with the deadline sweeper
    pub rng: Arc<Mutex<StdRng>>,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Independent RNG for the deadline sweeper, derived from the shared one so a
/// fixed assignment seed still gives reproducible runs
fn sweeper_rng(shared: &mut StdRng) -> StdRng {
    StdRng::seed_from_u64(shared.gen())
}

/// Periodically move projects whose deadlines have passed
fn spawn_deadline_sweeper(state: AppState) {
    let period = Duration::from_secs(state.config.deadline_sweep_secs);
    tokio::spawn(async move {
        // The sweeper owns its RNG so manual assignments never wait on a sweep
        let mut rng = sweeper_rng(&mut *state.rng.lock().await);
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;

            if let Err(e) = state
                .project_service
                .advance_due_projects(Utc::now(), &mut rng)
                .await
            {
                tracing::error!(error = %e, "Deadline sweep failed");
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,coursekit_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CourseKit API...");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Create adapters
    let course_repo = Arc::new(PostgresCourseRepository::new(db.clone()));
    let enrollment_repo = Arc::new(PostgresEnrollmentRepository::new(db.clone()));
    let project_repo = Arc::new(PostgresProjectRepository::new(db.clone()));
    let submission_repo = Arc::new(PostgresSubmissionRepository::new(db.clone()));
    let criteria_repo = Arc::new(PostgresReviewCriteriaRepository::new(db.clone()));
    let review_repo = Arc::new(PostgresPeerReviewRepository::new(db.clone()));
    let response_repo = Arc::new(PostgresCriteriaResponseRepository::new(db.clone()));

    // Create application services
    let submission_service = Arc::new(SubmissionService::new(
        project_repo.clone(),
        enrollment_repo.clone(),
        submission_repo.clone(),
    ));

    let review_service = Arc::new(ReviewService::new(
        project_repo.clone(),
        submission_repo.clone(),
        criteria_repo.clone(),
        review_repo.clone(),
        response_repo.clone(),
    ));

    let project_service = Arc::new(ProjectService::new(
        course_repo.clone(),
        project_repo.clone(),
        submission_repo.clone(),
        criteria_repo.clone(),
        review_repo.clone(),
        response_repo.clone(),
        config.reviews_per_submission,
    ));

    let rng = match config.assignment_seed {
        Some(seed) => {
            tracing::info!(seed, "Using fixed assignment seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    // Create app state
    let state = AppState {
        submission_service,
        review_service,
        project_service,
        rng: Arc::new(Mutex::new(rng)),
        config: config.clone(),
    };

    if config.sweeper_enabled() {
        tracing::info!(
            every_secs = config.deadline_sweep_secs,
            "Starting deadline sweeper"
        );
        spawn_deadline_sweeper(state.clone());
    }

    // Rate limiting config: 2 req/sec sustained, burst of 5
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .context("Failed to build governor config")?,
    );

    // Rate-limited student writes
    let student_writes = Router::new()
        .route("/projects/:id/submissions", post(handlers::submit_project))
        .route("/reviews/:id", post(handlers::submit_review))
        .layer(GovernorLayer {
            config: governor_config,
        })
        .layer(middleware::from_fn(auth::actor_middleware));

    // Student reads
    let student_reads = Router::new()
        .route("/projects/:id/reviews", get(handlers::get_reviews))
        .layer(middleware::from_fn(auth::actor_middleware));

    // Instructor endpoints
    let admin = Router::new()
        .route("/admin/projects", get(handlers::list_projects))
        .route("/admin/courses/:id/projects", post(handlers::create_project))
        .route("/admin/courses/:id/criteria", post(handlers::add_criteria))
        .route("/admin/projects/:id/assign", post(handlers::assign_reviews))
        .route("/admin/projects/:id/score", post(handlers::score_project))
        .route("/admin/projects/:id/close", post(handlers::close_project))
        .layer(middleware::from_fn(auth::actor_middleware));

    // Build router
    let app = Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        // Public endpoints (optional auth)
        .route(
            "/projects/:id",
            get(handlers::get_project)
                .layer(middleware::from_fn(auth::optional_actor_middleware)),
        )
        .merge(student_writes)
        .merge(student_reads)
        .merge(admin)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweeper_rng_follows_the_assignment_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);

        let mut sweeper_a = sweeper_rng(&mut a);
        let mut sweeper_b = sweeper_rng(&mut b);
        assert_eq!(sweeper_a.gen::<u64>(), sweeper_b.gen::<u64>());

        // Both shared streams advanced by the same draw
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }

    #[tokio::test]
    async fn shared_rng_is_free_while_the_sweeper_runs() {
        let shared = Arc::new(Mutex::new(StdRng::seed_from_u64(1)));
        let mut sweeper = sweeper_rng(&mut *shared.lock().await);

        // Sweeper draws without touching the shared lock
        let _guard = shared.try_lock().expect("shared rng should be unlocked");
        let _: u64 = sweeper.gen();
    }
}
