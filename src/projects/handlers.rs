use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::repo_types::{NewProject, Project};
use crate::{
    auth::extractors::BearerToken,
    error::{ApiError, RepoError},
    state::AppState,
};

pub fn bookmark_routes() -> Router<AppState> {
    Router::new().route(
        "/users/:id/bookmarked_projects",
        get(list_bookmarked_projects).post(add_bookmarked_project),
    )
}

fn parse_user_id(raw: &str) -> Result<i32, ApiError> {
    raw.trim().parse::<i32>().map_err(|_| {
        warn!(id = %raw, "problem converting id to integer");
        ApiError::InvalidUserId
    })
}

#[instrument(skip(state, bearer))]
pub async fn list_bookmarked_projects(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    bearer: BearerToken,
) -> Result<Json<Vec<Project>>, ApiError> {
    let user_id = parse_user_id(&raw_id)?;
    bearer.authorize(&state, user_id)?;

    let projects = state
        .projects
        .fetch_bookmarked_projects(user_id)
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "fetch bookmarked projects failed");
            ApiError::BookmarkFetch
        })?;
    Ok(Json(projects))
}

/// Bookmark a project for the user, creating the project on first sight.
#[instrument(skip(state, bearer, payload))]
pub async fn add_bookmarked_project(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    bearer: BearerToken,
    payload: Result<Json<NewProject>, JsonRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let user_id = parse_user_id(&raw_id)?;
    bearer.authorize(&state, user_id)?;
    let Json(project) = payload.map_err(|e| {
        warn!(error = %e, "malformed project body");
        ApiError::InvalidBody
    })?;

    let existing = state
        .projects
        .project_exists(&project.name, &project.author, &project.language)
        .await;

    match existing {
        Ok(project_id) => {
            state
                .projects
                .bookmark_project(user_id, project_id)
                .await
                .map_err(|e| {
                    error!(error = %e, user_id, project_id, "problem bookmarking existing project");
                    ApiError::BookmarkExistingProject
                })?;
            info!(user_id, project_id, "bookmarked existing project");
            Ok(Json("Bookmarked existing project"))
        }
        Err(RepoError::NotFound) => {
            let project_id = state.projects.add_project(&project).await.map_err(|e| {
                error!(error = %e, user_id, "problem saving new project");
                ApiError::ProjectCreate
            })?;
            state
                .projects
                .bookmark_project(user_id, project_id)
                .await
                .map_err(|e| {
                    error!(error = %e, user_id, project_id, "problem bookmarking new project");
                    ApiError::BookmarkNewProject
                })?;
            info!(user_id, project_id, "bookmarked new project");
            Ok(Json("Bookmarked new project"))
        }
        Err(e) => {
            error!(error = %e, user_id, "project lookup failed");
            Err(ApiError::ProjectCreate)
        }
    }
}
