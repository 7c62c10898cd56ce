//! Request body helpers.
//!
//! Handlers take `Result<Json<T>, JsonRejection>` so malformed bodies become
//! a 400 [`ApiError`] with the usual JSON shape instead of axum's plaintext
//! 415/422 rejections.

use axum::{extract::rejection::JsonRejection, Json};

use crate::api::error::ApiError;
use crate::validation::Validate;

/// Unwrap a JSON body, mapping deserialization failures to 400.
pub fn extract_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Unwrap a JSON body and run its field validation.
pub fn extract_validated_json<T: Validate>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    let value = extract_json(body)?;
    value.validate()?;
    Ok(value)
}

/// Run store work (SQLite, bcrypt) on the blocking pool.
pub async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("Blocking task failed")))?
}
