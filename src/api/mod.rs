//! HTTP surface: shared state, router assembly and the public utility endpoints.

pub mod error;
pub mod extract;
pub mod hal;
pub mod pagination;

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};

use crate::{
    auth::{api as auth_api, auth_middleware, AuthService, JwtHandler, UserStore},
    config::Config,
    db::Database,
    introductions::{api as introductions_api, IntroductionStore},
    middleware::request_logging,
};
use hal::{LinkBuilder, Links};

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserStore>,
    pub introductions: Arc<IntroductionStore>,
    pub links: LinkBuilder,
}

impl AppState {
    /// Wire every component from configuration and an open database.
    pub fn new(config: Config, db: Database) -> Self {
        let users = Arc::new(UserStore::with_hash_cost(db.clone(), config.bcrypt_cost));
        let jwt = JwtHandler::with_expiration(&config.jwt_secret, config.jwt_expiration_secs);
        let auth = Arc::new(AuthService::new(users.clone(), jwt));
        let introductions = Arc::new(IntroductionStore::new(db));
        let links = LinkBuilder::new(config.base_url());

        Self {
            config: Arc::new(config),
            auth,
            users,
            introductions,
            links,
        }
    }
}

/// Create the API router
pub fn build_router(state: AppState) -> Router {
    // Registration and login must work without a token
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api", get(index))
        .route("/api/users", post(auth_api::register))
        .route("/login/authenticate", post(auth_api::login));

    // Everything else goes through the bearer-token filter
    let protected_routes = Router::new()
        .route("/api/users/me", get(auth_api::get_current_user))
        .route(
            "/api/introductions",
            get(introductions_api::list_introductions)
                .post(introductions_api::create_introduction),
        )
        .route(
            "/api/introductions/:id",
            get(introductions_api::get_introduction)
                .put(introductions_api::update_introduction)
                .delete(introductions_api::delete_introduction),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(TimeoutLayer::new(state.config.request_timeout()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct IndexResponse {
    #[serde(rename = "_links")]
    links: Links,
}

/// API root - GET /api
async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    let links = &state.links;
    Json(IndexResponse {
        links: Links::new()
            .with("self", links.href("/api"))
            .with("introductions", links.href(introductions_api::INTRODUCTIONS_PATH))
            .with("register", links.href("/api/users"))
            .with("me", links.href("/api/users/me"))
            .with("login", links.href("/login/authenticate")),
    })
}
