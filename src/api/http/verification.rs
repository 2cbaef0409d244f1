// src/api/http/verification.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::error::{ApiResult, IntoApiError, IntoApiErrorOption};
use crate::state::AppState;
use crate::verification::types::{
    CreateObligationRequest, CreateVerificationFileRequest, UpdateObligationRequest,
};
use crate::verification::{ProofObligation, VerificationFile};

pub async fn create_verification_file_handler(
    State(app_state): State<AppState>,
    Path((_project_id, file_id)): Path<(String, String)>,
    Json(payload): Json<CreateVerificationFileRequest>,
) -> ApiResult<(StatusCode, Json<VerificationFile>)> {
    app_state
        .files
        .get(&file_id)
        .await
        .into_api_error("Failed to get file")?
        .ok_or_not_found("File not found")?;

    let vf = app_state
        .verification
        .create_verification_file(&file_id, payload.content)
        .await
        .into_api_error("Failed to create verification file")?;

    Ok((StatusCode::CREATED, Json(vf)))
}

pub async fn list_verification_files_handler(
    State(app_state): State<AppState>,
    Path((_project_id, file_id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<VerificationFile>>> {
    let vfs = app_state
        .verification
        .list_for_file(&file_id)
        .await
        .into_api_error("Failed to list verification files")?;

    Ok(Json(vfs))
}

pub async fn create_obligation_handler(
    State(app_state): State<AppState>,
    Path(verification_id): Path<String>,
    Json(payload): Json<CreateObligationRequest>,
) -> ApiResult<(StatusCode, Json<ProofObligation>)> {
    app_state
        .verification
        .get_verification_file(&verification_id)
        .await
        .into_api_error("Failed to get verification file")?
        .ok_or_not_found("Verification file not found")?;

    let po = app_state
        .verification
        .create_obligation(&verification_id, payload.goal, payload.strategy)
        .await
        .into_api_error("Failed to create proof obligation")?;

    Ok((StatusCode::CREATED, Json(po)))
}

pub async fn list_obligations_handler(
    State(app_state): State<AppState>,
    Path(verification_id): Path<String>,
) -> ApiResult<Json<Vec<ProofObligation>>> {
    let obligations = app_state
        .verification
        .list_obligations(&verification_id)
        .await
        .into_api_error("Failed to list proof obligations")?;

    Ok(Json(obligations))
}

pub async fn update_obligation_handler(
    State(app_state): State<AppState>,
    Path(obligation_id): Path<String>,
    Json(payload): Json<UpdateObligationRequest>,
) -> ApiResult<Json<ProofObligation>> {
    let po = app_state
        .verification
        .set_obligation_status(&obligation_id, payload.status)
        .await
        .into_api_error("Failed to update proof obligation")?
        .ok_or_not_found("Proof obligation not found")?;

    Ok(Json(po))
}
