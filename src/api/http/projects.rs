// src/api/http/projects.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::api::error::{ApiError, ApiResult, IntoApiError, IntoApiErrorOption};
use crate::project::types::{CreateProjectRequest, ProjectsResponse};
use crate::state::AppState;

pub async fn create_project_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> impl IntoResponse {
    let result: ApiResult<_> = async {
        let project = app_state
            .projects
            .create(payload.name, payload.owner)
            .await
            .into_api_error("Failed to create project")?;

        Ok((StatusCode::CREATED, Json(project)))
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn get_project_handler(
    State(app_state): State<AppState>,
    Path(project_id): Path<String>,
) -> impl IntoResponse {
    let result: ApiResult<_> = async {
        let project = app_state
            .projects
            .get(&project_id)
            .await
            .into_api_error("Failed to get project")?
            .ok_or_not_found("Project not found")?;

        Ok(Json(project))
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn list_projects_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    let result: ApiResult<_> = async {
        let projects = app_state
            .projects
            .list()
            .await
            .into_api_error("Failed to list projects")?;

        let response = ProjectsResponse {
            total: projects.len(),
            projects,
        };

        Ok(Json(response))
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn delete_project_handler(
    State(app_state): State<AppState>,
    Path(project_id): Path<String>,
) -> impl IntoResponse {
    let result: ApiResult<_> = async {
        let deleted = app_state
            .projects
            .delete(&project_id)
            .await
            .into_api_error("Failed to delete project")?;

        if deleted {
            Ok(StatusCode::NO_CONTENT)
        } else {
            Err(ApiError::not_found("Project not found"))
        }
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}
