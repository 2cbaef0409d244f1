// src/api/http/operations.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::error::{ApiError, ApiResult, IntoApiError, IntoApiErrorOption};
use crate::operations::{
    CreateOperationRequest, Operation, OperationsResponse, OperationStatus, ToolListing,
};
use crate::state::AppState;

/// Registry listing for discovery UIs, in registration order.
pub async fn list_tools_handler(State(app_state): State<AppState>) -> Json<Vec<ToolListing>> {
    let tools = app_state
        .registry
        .list_available()
        .map(|(name, label)| ToolListing {
            name: name.to_string(),
            human_readable_name: label.to_string(),
        })
        .collect();

    Json(tools)
}

/// Creates a Planned operation. The tool name is deliberately not validated
/// here: it is resolved at execution time, and an unknown name crashes that
/// run with an explanatory log.
pub async fn create_operation_handler(
    State(app_state): State<AppState>,
    Path(project_id): Path<String>,
    Json(payload): Json<CreateOperationRequest>,
) -> ApiResult<(StatusCode, Json<Operation>)> {
    app_state
        .projects
        .get(&project_id)
        .await
        .into_api_error("Failed to get project")?
        .ok_or_not_found("Project not found")?;

    if let Some(trigger_id) = &payload.triggered_by {
        app_state
            .operations
            .get(trigger_id)
            .await
            .into_api_error("Failed to get triggering operation")?
            .ok_or_not_found("Triggering operation not found")?;
    }

    let operation = Operation::new(
        project_id,
        payload.tool,
        payload.sent_by,
        payload.triggered_by,
    );
    app_state
        .operations
        .create(&operation)
        .await
        .into_api_error("Failed to create operation")?;

    Ok((StatusCode::CREATED, Json(operation)))
}

pub async fn list_operations_handler(
    State(app_state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<OperationsResponse>> {
    let operations = app_state
        .operations
        .list_for_project(&project_id)
        .await
        .into_api_error("Failed to list operations")?;

    let available_tools = app_state
        .registry
        .list_available()
        .map(|(name, label)| ToolListing {
            name: name.to_string(),
            human_readable_name: label.to_string(),
        })
        .collect();

    Ok(Json(OperationsResponse {
        operations,
        available_tools,
    }))
}

pub async fn get_operation_handler(
    State(app_state): State<AppState>,
    Path((project_id, operation_id)): Path<(String, String)>,
) -> ApiResult<Json<Operation>> {
    let operation = fetch_operation(&app_state, &project_id, &operation_id).await?;
    Ok(Json(operation))
}

/// Enqueues the run and returns immediately: the caller observes only the
/// Planned state synchronously and polls the operation for completion. If
/// the queue is unavailable the operation stays Planned and the failure is
/// surfaced here; resubmission is the retry policy.
///
/// Only Planned operations may be submitted. Terminal states are never
/// re-entered; re-running means creating a new operation with triggered_by.
pub async fn run_operation_handler(
    State(app_state): State<AppState>,
    Path((project_id, operation_id)): Path<(String, String)>,
) -> ApiResult<(StatusCode, Json<Operation>)> {
    let operation = fetch_operation(&app_state, &project_id, &operation_id).await?;

    if operation.status != OperationStatus::Planned {
        return Err(ApiError::conflict(format!(
            "Operation is {}; create a new operation with triggered_by to re-run it",
            operation.status
        )));
    }

    app_state
        .dispatcher
        .enqueue(&operation.id)
        .map_err(|e| ApiError::unavailable(e.to_string()))?;

    Ok((StatusCode::ACCEPTED, Json(operation)))
}

/// Removes the operation; operations it triggered cascade away with it.
pub async fn delete_operation_handler(
    State(app_state): State<AppState>,
    Path((project_id, operation_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let operation = fetch_operation(&app_state, &project_id, &operation_id).await?;

    app_state
        .operations
        .delete(&operation.id)
        .await
        .into_api_error("Failed to delete operation")?;

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_operation(
    app_state: &AppState,
    project_id: &str,
    operation_id: &str,
) -> ApiResult<Operation> {
    let operation = app_state
        .operations
        .get(operation_id)
        .await
        .into_api_error("Failed to get operation")?
        .ok_or_not_found("Operation not found")?;

    if operation.project_id != project_id {
        return Err(ApiError::not_found("Operation not found"));
    }

    Ok(operation)
}
