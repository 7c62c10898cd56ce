//! Introduction API Endpoints
//!
//! # Endpoints
//!
//! - `GET /api/introductions` - Caller's documents, paged (`page`, `size`)
//! - `POST /api/introductions` - Create a document (201 + `Location`)
//! - `GET /api/introductions/:id` - Fetch one document
//! - `PUT /api/introductions/:id` - Replace a document
//! - `DELETE /api/introductions/:id` - Delete a document
//!
//! All routes need an authenticated caller. Documents owned by someone else
//! answer 403, missing ones 404.

use crate::api::{
    error::ApiError,
    extract::{extract_json, run_blocking},
    hal::{LinkBuilder, Links, PagedResources, Resource},
    pagination::{PageQuery, PageRequest},
    AppState,
};
use crate::auth::AuthenticatedIdentity;
use crate::introductions::models::{Introduction, IntroductionDto};
use crate::introductions::store::IntroductionStore;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

pub const INTRODUCTIONS_PATH: &str = "/api/introductions";
pub const PROJECTS_PATH: &str = "/api/projects";
pub const MAIN_PATH: &str = "/api";

fn item_path(id: i64) -> String {
    format!("{}/{}", INTRODUCTIONS_PATH, id)
}

fn to_resource(links: &LinkBuilder, introduction: Introduction) -> Resource<Introduction> {
    let self_href = links.href(&item_path(introduction.id));
    Resource {
        links: Links::new()
            .with("self", self_href.clone())
            .with("update", self_href.clone())
            .with("delete", self_href)
            .with("introductions", links.href(INTRODUCTIONS_PATH)),
        content: introduction,
    }
}

/// Load a document and make sure the caller owns it.
fn load_owned(store: &IntroductionStore, owner: &str, id: i64) -> Result<Introduction, ApiError> {
    let introduction = store
        .get(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Introduction {} not found", id)))?;

    if introduction.owner != owner {
        return Err(ApiError::Forbidden(
            "You do not have access to this introduction".to_string(),
        ));
    }

    Ok(introduction)
}

/// GET /api/introductions
pub async fn list_introductions(
    State(state): State<AppState>,
    identity: AuthenticatedIdentity,
    Query(query): Query<PageQuery>,
) -> Result<Json<PagedResources<Introduction>>, ApiError> {
    let request = PageRequest::from_query(
        &query,
        state.config.page_size_default,
        state.config.page_size_max,
    );

    let store = state.introductions.clone();
    let owner = identity.username;
    let page = run_blocking(move || Ok(store.list_by_owner(&owner, request)?)).await?;

    let links = state
        .links
        .page_links(INTRODUCTIONS_PATH, &page.metadata)
        .with("projects", state.links.href(PROJECTS_PATH))
        .with("main", state.links.href(MAIN_PATH));

    let items = page
        .items
        .into_iter()
        .map(|i| to_resource(&state.links, i))
        .collect();

    Ok(Json(PagedResources::new(
        "introductions",
        items,
        links,
        page.metadata,
    )))
}

/// POST /api/introductions
pub async fn create_introduction(
    State(state): State<AppState>,
    identity: AuthenticatedIdentity,
    body: Result<Json<IntroductionDto>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Resource<Introduction>>), ApiError>
{
    let draft = extract_json(body)?.into_draft()?;

    let store = state.introductions.clone();
    let owner = identity.username.clone();
    let introduction = run_blocking(move || Ok(store.create(&owner, &draft)?)).await?;

    info!(
        "📝 Introduction {} created by {}",
        introduction.id, identity.username
    );

    let location = state.links.href(&item_path(introduction.id));
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(to_resource(&state.links, introduction)),
    ))
}

/// GET /api/introductions/:id
pub async fn get_introduction(
    State(state): State<AppState>,
    identity: AuthenticatedIdentity,
    Path(id): Path<i64>,
) -> Result<Json<Resource<Introduction>>, ApiError> {
    let store = state.introductions.clone();
    let owner = identity.username;
    let introduction = run_blocking(move || load_owned(&store, &owner, id)).await?;

    Ok(Json(to_resource(&state.links, introduction)))
}

/// PUT /api/introductions/:id
///
/// Ownership is checked before the body, so a stranger learns nothing from
/// validation errors.
pub async fn update_introduction(
    State(state): State<AppState>,
    identity: AuthenticatedIdentity,
    Path(id): Path<i64>,
    body: Result<Json<IntroductionDto>, JsonRejection>,
) -> Result<Json<Resource<Introduction>>, ApiError> {
    let store = state.introductions.clone();
    let owner = identity.username.clone();
    let updated = run_blocking(move || {
        load_owned(&store, &owner, id)?;
        let draft = extract_json(body)?.into_draft()?;

        store
            .update(id, &draft)?
            .ok_or_else(|| ApiError::NotFound(format!("Introduction {} not found", id)))
    })
    .await?;

    info!("✏️  Introduction {} updated by {}", id, identity.username);

    Ok(Json(to_resource(&state.links, updated)))
}

/// DELETE /api/introductions/:id
pub async fn delete_introduction(
    State(state): State<AppState>,
    identity: AuthenticatedIdentity,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let store = state.introductions.clone();
    let owner = identity.username.clone();
    run_blocking(move || {
        load_owned(&store, &owner, id)?;

        if !store.delete(id)? {
            return Err(ApiError::NotFound(format!("Introduction {} not found", id)));
        }
        Ok(())
    })
    .await?;

    info!("🗑️  Introduction {} deleted by {}", id, identity.username);

    Ok(Json(json!({
        "deleted": id,
        "_links": { "introductions": { "href": state.links.href(INTRODUCTIONS_PATH) } },
    })))
}
