// src/api/http/router.rs
// HTTP router composition for REST API endpoints

use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;

use super::files::{
    delete_file_handler, file_verified_handler, get_file_handler, list_files_handler,
    raw_file_handler, upload_file_handler,
};
use super::operations::{
    create_operation_handler, delete_operation_handler, get_operation_handler,
    list_operations_handler, list_tools_handler, run_operation_handler,
};
use super::projects::{
    create_project_handler, delete_project_handler, get_project_handler, list_projects_handler,
};
use super::verification::{
    create_obligation_handler, create_verification_file_handler, list_obligations_handler,
    list_verification_files_handler, update_obligation_handler,
};
use crate::state::AppState;

/// Main HTTP router: projects, their files and operations, the verification
/// hierarchy, and tool discovery.
pub fn http_router(app_state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health_handler))

        // Tool discovery
        .route("/tools", get(list_tools_handler))

        // Projects
        .route("/projects", post(create_project_handler).get(list_projects_handler))
        .route(
            "/projects/{project_id}",
            get(get_project_handler).delete(delete_project_handler),
        )

        // Tracked files
        .route(
            "/projects/{project_id}/files",
            post(upload_file_handler).get(list_files_handler),
        )
        .route(
            "/projects/{project_id}/files/{file_id}",
            get(get_file_handler).delete(delete_file_handler),
        )
        .route("/projects/{project_id}/files/{file_id}/raw", get(raw_file_handler))
        .route(
            "/projects/{project_id}/files/{file_id}/verified",
            get(file_verified_handler),
        )

        // Verification hierarchy
        .route(
            "/projects/{project_id}/files/{file_id}/verifications",
            post(create_verification_file_handler).get(list_verification_files_handler),
        )
        .route(
            "/verifications/{verification_id}/obligations",
            post(create_obligation_handler).get(list_obligations_handler),
        )
        .route("/obligations/{obligation_id}", patch(update_obligation_handler))

        // Operations
        .route(
            "/projects/{project_id}/ops",
            post(create_operation_handler).get(list_operations_handler),
        )
        .route(
            "/projects/{project_id}/ops/{operation_id}",
            get(get_operation_handler).delete(delete_operation_handler),
        )
        .route(
            "/projects/{project_id}/ops/{operation_id}/run",
            post(run_operation_handler),
        )
        .with_state(app_state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
