// src/api/http/files.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::api::error::{ApiError, ApiResult, IntoApiError, IntoApiErrorOption};
use crate::files::types::{FilesResponse, UploadFileRequest, VerifiedResponse};
use crate::files::ProjectFile;
use crate::state::AppState;

/// Direct user upload: writes the bytes into the project's working directory
/// and tracks them through the same natural-key upsert the reconciler uses.
pub async fn upload_file_handler(
    State(app_state): State<AppState>,
    Path(project_id): Path<String>,
    Json(payload): Json<UploadFileRequest>,
) -> impl IntoResponse {
    let result: ApiResult<_> = async {
        validate_relative_path(&payload.path)?;

        app_state
            .projects
            .get(&project_id)
            .await
            .into_api_error("Failed to get project")?
            .ok_or_not_found("Project not found")?;

        let on_disk = app_state.projects.project_root(&project_id).join(&payload.path);
        if let Some(parent) = on_disk.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .into_api_error("Failed to create file directory")?;
        }
        tokio::fs::write(&on_disk, payload.content.as_bytes())
            .await
            .into_api_error("Failed to write file")?;

        let file = app_state
            .files
            .upsert(
                &project_id,
                &payload.path,
                payload.content.as_bytes(),
                payload.file_type.as_deref(),
                Utc::now(),
            )
            .await
            .into_api_error("Failed to track file")?;

        Ok((StatusCode::CREATED, Json(file)))
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn list_files_handler(
    State(app_state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<FilesResponse>> {
    let files = app_state
        .files
        .list(&project_id)
        .await
        .into_api_error("Failed to list files")?;

    Ok(Json(FilesResponse {
        total: files.len(),
        files,
    }))
}

pub async fn get_file_handler(
    State(app_state): State<AppState>,
    Path((project_id, file_id)): Path<(String, String)>,
) -> ApiResult<Json<ProjectFile>> {
    let file = fetch_project_file(&app_state, &project_id, &file_id).await?;
    Ok(Json(file))
}

/// The stored bytes, served under the declared content type.
pub async fn raw_file_handler(
    State(app_state): State<AppState>,
    Path((project_id, file_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let file = fetch_project_file(&app_state, &project_id, &file_id).await?;

    let content = app_state
        .files
        .content(&file.id)
        .await
        .into_api_error("Failed to read file content")?
        .ok_or_not_found("File content not found")?;

    Ok(([(header::CONTENT_TYPE, file.file_type)], content))
}

/// Computed on demand from the verification hierarchy; never cached.
pub async fn file_verified_handler(
    State(app_state): State<AppState>,
    Path((project_id, file_id)): Path<(String, String)>,
) -> ApiResult<Json<VerifiedResponse>> {
    let file = fetch_project_file(&app_state, &project_id, &file_id).await?;

    let verified = app_state
        .verification
        .file_is_verified(&file.id)
        .await
        .into_api_error("Failed to compute verified status")?;

    Ok(Json(VerifiedResponse { verified }))
}

/// Removes the record and the backing content in the working directory.
pub async fn delete_file_handler(
    State(app_state): State<AppState>,
    Path((project_id, file_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let file = fetch_project_file(&app_state, &project_id, &file_id).await?;

    app_state
        .files
        .delete(&file.id)
        .await
        .into_api_error("Failed to delete file")?;

    let on_disk = app_state.projects.project_root(&project_id).join(&file.path);
    if let Err(e) = tokio::fs::remove_file(&on_disk).await {
        // The record is gone either way; a missing backing file is not an
        // error worth surfacing to the caller.
        tracing::warn!("Failed to unlink {}: {}", on_disk.display(), e);
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_project_file(
    app_state: &AppState,
    project_id: &str,
    file_id: &str,
) -> ApiResult<ProjectFile> {
    let file = app_state
        .files
        .get(file_id)
        .await
        .into_api_error("Failed to get file")?
        .ok_or_not_found("File not found")?;

    if file.project_id != project_id {
        return Err(ApiError::not_found("File not found"));
    }

    Ok(file)
}

fn validate_relative_path(path: &str) -> ApiResult<()> {
    let escapes = path.is_empty()
        || path.starts_with('/')
        || path.split('/').any(|segment| segment == "..");
    if escapes {
        return Err(ApiError::bad_request("File path must be relative to the project root"));
    }
    Ok(())
}
