//! Authentication Middleware
//! Mission: Protect API endpoints with JWT validation

use crate::api::error::ApiError;
use crate::auth::{errors::AuthFailure, models::AuthenticatedIdentity, service::AuthService};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

/// Auth middleware that validates bearer tokens.
///
/// Requests without an `Authorization` header pass through untouched; a header
/// that is present but malformed or carries a bad token ends the request with 401.
pub async fn auth_middleware(
    State(auth): State<Arc<AuthService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorized = match req.headers().get(AUTHORIZATION) {
        Some(value) => match value.to_str() {
            Ok(raw) => auth.authorize_request(Some(raw)),
            Err(_) => Err(AuthFailure::MalformedHeader),
        },
        None => Ok(None),
    };

    let identity = authorized.map_err(|failure| {
        warn!(
            kind = failure.kind(),
            path = %req.uri().path(),
            "🚫 Request rejected"
        );
        failure
    })?;

    if let Some(identity) = identity {
        // Add identity to request extensions so handlers can access it
        req.extensions_mut().insert(identity);
    }

    Ok(next.run(req).await)
}

/// Handlers that take an `AuthenticatedIdentity` reject anonymous callers with 401.
#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .ok_or_else(|| {
                warn!(
                    kind = AuthFailure::Unauthenticated.kind(),
                    path = %parts.uri.path(),
                    "🚫 Request rejected"
                );
                ApiError::Auth(AuthFailure::Unauthenticated)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::authenticator::tests::MapStore;
    use crate::auth::jwt::JwtHandler;
    use axum::{
        body::Body,
        http::{HeaderValue, Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    const SECRET: &str = "middleware-test-secret";

    async fn whoami(identity: AuthenticatedIdentity) -> String {
        identity.username
    }

    async fn open() -> &'static str {
        "open"
    }

    fn app() -> Router {
        let auth = Arc::new(AuthService::new(
            Arc::new(MapStore::default()),
            JwtHandler::new(SECRET),
        ));
        Router::new()
            .route("/whoami", get(whoami))
            .route("/open", get(open))
            .route_layer(middleware::from_fn_with_state(auth, auth_middleware))
    }

    async fn call(uri: &str, header: Option<&str>) -> Response {
        let mut builder = HttpRequest::builder().uri(uri);
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let token = JwtHandler::new(SECRET).generate_token("alice").unwrap();
        let response = call("/whoami", Some(&format!("Bearer {}", token))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"alice");
    }

    #[tokio::test]
    async fn test_no_header_passes_through_but_identity_required() {
        assert_eq!(call("/open", None).await.status(), StatusCode::OK);
        assert_eq!(
            call("/whoami", None).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_wrong_scheme_rejected_even_on_open_route() {
        let response = call("/open", Some("Basic abc")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_foreign_token_rejected() {
        let token = JwtHandler::new("some-other-secret")
            .generate_token("alice")
            .unwrap();
        let response = call("/whoami", Some(&format!("Bearer {}", token))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_utf8_header_is_malformed() {
        let value = HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap();
        assert!(value.to_str().is_err());

        let request = HttpRequest::builder()
            .uri("/open")
            .header(AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json["error"],
            AuthFailure::MalformedHeader.public_message()
        );
    }
}
