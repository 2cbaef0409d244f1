// src/operations/mod.rs

pub mod engine;
pub mod store;

pub use engine::OperationEngine;
pub use store::OperationStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One invocation of a registered tool against a project.
/// Maps directly to the `operations` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Operation {
    pub id: String,
    pub project_id: String,
    /// Registry identifier of the tool to run. Validated at execution time,
    /// not at creation: an operation whose tool was never registered runs to
    /// Crashed with an explanatory log.
    pub tool_name: String,
    /// Causal chain for automated re-runs; deleting the triggering operation
    /// cascades to the operations it triggered.
    pub triggered_by: Option<String>,
    pub sent_by: String,
    pub sent_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub status: OperationStatus,
    pub log: Option<String>,
}

/// Lifecycle: Planned → Running → {Finished | Crashed}. Terminal states are
/// never re-entered; a re-run is a new operation referencing the prior one
/// through `triggered_by`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OperationStatus {
    Planned,
    Running,
    Finished,
    Crashed,
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationStatus::Planned => write!(f, "planned"),
            OperationStatus::Running => write!(f, "running"),
            OperationStatus::Finished => write!(f, "finished"),
            OperationStatus::Crashed => write!(f, "crashed"),
        }
    }
}

impl std::str::FromStr for OperationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(OperationStatus::Planned),
            "running" => Ok(OperationStatus::Running),
            "finished" => Ok(OperationStatus::Finished),
            "crashed" => Ok(OperationStatus::Crashed),
            _ => Err(format!("Unknown operation status: {s}")),
        }
    }
}

impl Operation {
    pub fn new(
        project_id: String,
        tool_name: String,
        sent_by: String,
        triggered_by: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_id,
            tool_name,
            triggered_by,
            sent_by,
            sent_at: Utc::now(),
            started_at: None,
            finished_at: None,
            status: OperationStatus::Planned,
            log: None,
        }
    }
}

// Request/Response types for API

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOperationRequest {
    pub tool: String,
    pub sent_by: String,
    pub triggered_by: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolListing {
    pub name: String,
    pub human_readable_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OperationsResponse {
    pub operations: Vec<Operation>,
    /// Tools currently available for new operations, in registration order.
    pub available_tools: Vec<ToolListing>,
}
