use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use docgen_core::{Project, ProjectDraft};
use tracing::info;

use super::AppState;
use crate::error::{ApiError, Result};

/// GET /api/projects
pub async fn list_projects_handler(State(state): State<AppState>) -> Result<Json<Vec<Project>>> {
    Ok(Json(state.projects.list_projects().await?))
}

/// GET /api/projects/{id}
pub async fn get_project_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>> {
    let project = state
        .projects
        .get_project(&id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;
    Ok(Json(project))
}

/// POST /api/projects
pub async fn create_project_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProjectDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>)> {
    let Json(draft) = payload?;
    let project = state.projects.create_project(draft).await?;
    info!("Created project {} ({})", project.id, project.name);
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/projects/{id}
pub async fn update_project_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ProjectDraft>, JsonRejection>,
) -> Result<Json<Project>> {
    let Json(draft) = payload?;
    let project = state
        .projects
        .update_project(&id, draft)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;
    Ok(Json(project))
}

/// DELETE /api/projects/{id}
pub async fn delete_project_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.projects.delete_project(&id).await? {
        return Err(ApiError::NotFound("Project"));
    }
    info!("Deleted project {}", id);
    Ok(StatusCode::NO_CONTENT)
}
