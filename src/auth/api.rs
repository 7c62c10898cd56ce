//! Authentication API Endpoints
//! Mission: Provide registration, login and profile endpoints

use crate::api::{
    error::ApiError,
    extract::{extract_validated_json, run_blocking},
    AppState,
};
use crate::auth::{
    models::{AuthenticatedIdentity, LoginRequest, RegisterRequest, TokenResponse, UserResponse},
    user_store::NewUser,
};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use tracing::info;

/// Login endpoint - POST /login/authenticate
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let LoginRequest { username, password } = extract_validated_json(body)?;

    info!("🔐 Login attempt: {}", username);

    // Store lookup and bcrypt both block; keep them off the async workers.
    let auth = state.auth.clone();
    let user = run_blocking(move || Ok(auth.authenticate(&username, &password)?)).await?;

    let token = state.auth.issue_token(&user)?;

    Ok(Json(TokenResponse {
        token,
        expires_in: state.auth.token_ttl_secs(),
    }))
}

/// Registration endpoint - POST /api/users
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let payload = extract_validated_json(body)?;

    let new_user = NewUser {
        username: payload.username,
        password: payload.password,
        email: payload.email,
        git_addr: payload.git_addr,
    };

    let users = state.users.clone();
    let user = run_blocking(move || Ok(users.create_user(&new_user)?)).await?;

    info!("👤 Registered user: {}", user.username);

    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

/// Current user profile - GET /api/users/me
pub async fn get_current_user(
    State(state): State<AppState>,
    identity: AuthenticatedIdentity,
) -> Result<Json<UserResponse>, ApiError> {
    let users = state.users.clone();
    let username = identity.username;

    // A valid token can outlive its account.
    let user = run_blocking(move || {
        users
            .get_user_by_username(&username)?
            .ok_or_else(|| ApiError::NotFound(format!("User {} not found", username)))
    })
    .await?;

    Ok(Json(UserResponse::from_user(&user)))
}
