//! Actor middleware
//!
//! Reads `X-User-Id` (a UUID) and `X-Superuser` (`true`/`1`) set by the
//! authenticating proxy and injects the [`Actor`] into request extensions.

use axum::{
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::domain::entities::{Actor, UserId};
use crate::error::AppError;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const SUPERUSER_HEADER: &str = "X-Superuser";

/// Parse the actor from request headers.
///
/// Returns `Ok(None)` when no user header is present and `Unauthorized` when
/// it is present but not a UUID.
pub fn actor_from_headers(headers: &HeaderMap) -> Result<Option<Actor>, AppError> {
    let Some(raw) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };

    let user_id = raw
        .to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or(AppError::Unauthorized)?;

    let is_superuser = headers
        .get(SUPERUSER_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1"))
        .unwrap_or(false);

    Ok(Some(Actor {
        user_id: UserId(user_id),
        is_superuser,
    }))
}

/// Authentication middleware
///
/// Rejects requests without an authenticated user.
pub async fn actor_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let actor = actor_from_headers(request.headers())?.ok_or(AppError::Unauthorized)?;
    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

/// Optional authentication middleware
///
/// Like `actor_middleware` but lets anonymous requests through without an
/// actor in extensions.
pub async fn optional_actor_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(actor) = actor_from_headers(request.headers())? {
        request.extensions_mut().insert(actor);
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderValue, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    async fn whoami(actor: Option<Extension<Actor>>) -> String {
        actor
            .map(|Extension(a)| a.user_id.to_string())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn request(user: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn missing_header_is_anonymous() {
        let headers = HeaderMap::new();
        assert!(actor_from_headers(&headers).unwrap().is_none());
    }

    #[test]
    fn parses_user_and_superuser_flag() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());

        let actor = actor_from_headers(&headers).unwrap().unwrap();
        assert_eq!(actor.user_id, UserId(id));
        assert!(!actor.is_superuser);

        headers.insert(SUPERUSER_HEADER, HeaderValue::from_static("true"));
        let actor = actor_from_headers(&headers).unwrap().unwrap();
        assert!(actor.is_superuser);
    }

    #[test]
    fn malformed_user_id_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(matches!(
            actor_from_headers(&headers),
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn required_middleware_rejects_anonymous() {
        let app = Router::new()
            .route("/", get(whoami))
            .layer(middleware::from_fn(actor_middleware));

        let response = app.oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn optional_middleware_passes_anonymous_and_injects_actor() {
        let app = Router::new()
            .route("/", get(whoami))
            .layer(middleware::from_fn(optional_actor_middleware));

        let response = app.clone().oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let id = Uuid::new_v4().to_string();
        let response = app.oneshot(request(Some(&id))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, id.as_bytes());
    }
}
