use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::avatar::AvatarResult;
use crate::models::project::{DEFAULT_FEATURED_LIMIT, DEFAULT_LIST_LIMIT};
use crate::models::{
    Contact, ContactInput, ContactStatus, Project, ProjectInput, User, UserInput, UserPatch,
};
use crate::server::state::AppState;
use crate::{PortfolioError, Result};

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;

// Malformed bodies answer with the same `{"error": ...}` shape as
// every other failure.
fn body<T>(payload: JsonBody<T>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| PortfolioError::Validation(rejection.body_text()))
}

#[derive(Debug, Deserialize)]
pub struct AvatarQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

pub async fn avatar_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvatarQuery>,
) -> Result<Json<AvatarResult>> {
    let user_id = query
        .user_id
        .map(|id| id.trim().to_owned())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            PortfolioError::Validation("Discord User ID is required".to_owned())
        })?;

    Ok(Json(state.resolver.resolve(&user_id).await))
}

pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Path(discord_id): Path<String>,
) -> Result<Json<User>> {
    let user = state.store.users()?.find_by_discord_id(&discord_id);
    user.map(Json)
        .ok_or_else(|| PortfolioError::NotFound("User".to_owned()))
}

/// Create or refresh a user; a missing avatar is looked up first.
pub async fn upsert_user_handler(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<UserInput>,
) -> Result<Json<User>> {
    let mut input = body(payload)?;
    input.validate()?;
    if input.avatar_url.is_none() {
        let avatar = state.resolver.resolve(input.discord_id.trim()).await;
        input.avatar_url = Some(avatar.avatar_url);
    }

    let user = state.store.users_mut()?.create_or_update(input)?;
    Ok(Json(user))
}

pub async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    Path(discord_id): Path<String>,
    payload: JsonBody<UserPatch>,
) -> Result<Json<User>> {
    let patch = body(payload)?;
    let user = state
        .store
        .users_mut()?
        .update_by_discord_id(&discord_id, patch)?;
    user.map(Json)
        .ok_or_else(|| PortfolioError::NotFound("User".to_owned()))
}

#[derive(Debug, Deserialize)]
pub struct ProjectQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    #[serde(rename = "isPublic")]
    is_public: Option<String>,
    featured: Option<String>,
    limit: Option<String>,
}

impl ProjectQuery {
    // Unparsable or zero limits fall back to the default.
    fn limit_or(&self, default: usize) -> usize {
        self.limit
            .as_deref()
            .and_then(|limit| limit.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(default)
    }
}

pub async fn list_projects_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<Vec<Project>>> {
    let projects = state.store.projects()?;

    let list = if query.featured.as_deref() == Some("true") {
        projects.find_featured(query.limit_or(DEFAULT_FEATURED_LIMIT))
    } else if let Some(user_id) = query.user_id.as_deref() {
        let public_only = query.is_public.as_deref() != Some("false");
        projects.find_by_user_id(user_id, public_only)
    } else {
        projects.find_all(query.limit_or(DEFAULT_LIST_LIMIT))
    };

    Ok(Json(list))
}

pub async fn create_project_handler(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<ProjectInput>,
) -> Result<Json<Project>> {
    let input = body(payload)?;
    let project = state.store.projects_mut()?.create(input)?;
    Ok(Json(project))
}

pub async fn list_contacts_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Contact>>> {
    let contacts = state.store.contacts()?.find_all();
    Ok(Json(contacts))
}

pub async fn create_contact_handler(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<ContactInput>,
) -> Result<Json<Contact>> {
    let input = body(payload)?;
    let contact = state.store.contacts_mut()?.create(input)?;
    Ok(Json(contact))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    status: ContactStatus,
}

pub async fn update_contact_status_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: JsonBody<StatusUpdate>,
) -> Result<Json<Contact>> {
    let update = body(payload)?;
    let contact = state
        .store
        .contacts_mut()?
        .update_status(&id, update.status)?;
    contact
        .map(Json)
        .ok_or_else(|| PortfolioError::NotFound("Contact".to_owned()))
}
