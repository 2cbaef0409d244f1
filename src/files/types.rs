// src/files/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tracked file within a project, uniquely keyed by (project, path).
///
/// The content bytes are stored in the database but not carried on this
/// struct; they are fetched separately and exposed through the raw endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectFile {
    pub id: String,
    pub project_id: String,
    pub path: String,
    pub file_type: String,
    pub content_hash: String,
    pub last_mod: DateTime<Utc>,
}

// Request/Response types for API

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadFileRequest {
    pub path: String,
    pub content: String,
    pub file_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilesResponse {
    pub files: Vec<ProjectFile>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifiedResponse {
    pub verified: bool,
}
