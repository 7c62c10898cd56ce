//! API error type: every handler failure ends up here and becomes one JSON response.

use crate::auth::errors::{AuthError, AuthFailure, TokenError};
use crate::auth::user_store::UserStoreError;
use crate::validation::FieldErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 for every authentication failure kind.
    #[error(transparent)]
    Auth(#[from] AuthFailure),
    /// Body that could not be read as the expected JSON.
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Validation(#[from] FieldErrors),
    #[error("{0}")]
    NotFound(String),
    /// Valid caller, but the resource belongs to someone else.
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Failure(failure) => ApiError::Auth(failure),
            AuthError::Internal(e) => ApiError::Internal(e),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Internal(anyhow::Error::new(err))
    }
}

impl From<UserStoreError> for ApiError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::DuplicateUsername(_) => {
                ApiError::Conflict("Username already exists".to_string())
            }
            UserStoreError::Other(e) => ApiError::Internal(e),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::Auth(failure) => json!({ "error": failure.public_message() }),
            ApiError::Validation(errors) => json!({
                "error": errors.first_message().unwrap_or("Invalid request"),
                "fields": errors.into_vec(),
            }),
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Forbidden(msg)
            | ApiError::Conflict(msg) => {
                json!({ "error": msg })
            }
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                json!({ "error": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}
