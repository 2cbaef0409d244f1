// src/operations/store.rs

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;

use super::{Operation, OperationStatus};

const COLUMNS: &str =
    "id, project_id, tool_name, triggered_by, sent_by, sent_at, started_at, finished_at, status, log";

/// Persistence for operations. Status (plus log and the lifecycle
/// timestamps) is the only thing mutated after creation.
pub struct OperationStore {
    pool: SqlitePool,
}

impl OperationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, operation: &Operation) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO operations (id, project_id, tool_name, triggered_by, sent_by, sent_at, started_at, finished_at, status, log)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&operation.id)
        .bind(&operation.project_id)
        .bind(&operation.tool_name)
        .bind(&operation.triggered_by)
        .bind(&operation.sent_by)
        .bind(operation.sent_at)
        .bind(operation.started_at)
        .bind(operation.finished_at)
        .bind(operation.status)
        .bind(&operation.log)
        .execute(&self.pool)
        .await
        .context("Failed to create operation")?;

        Ok(())
    }

    pub async fn get(&self, operation_id: &str) -> Result<Option<Operation>> {
        let op = sqlx::query_as::<_, Operation>(&format!(
            "SELECT {COLUMNS} FROM operations WHERE id = ?"
        ))
        .bind(operation_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get operation")?;

        Ok(op)
    }

    pub async fn list_for_project(&self, project_id: &str) -> Result<Vec<Operation>> {
        let ops = sqlx::query_as::<_, Operation>(&format!(
            "SELECT {COLUMNS} FROM operations WHERE project_id = ? ORDER BY sent_at"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list operations")?;

        Ok(ops)
    }

    /// Planned → Running, committed before execution begins so an observer
    /// can distinguish "not started" from "in progress" even across a
    /// process crash.
    pub async fn mark_running(&self, operation_id: &str) -> Result<()> {
        sqlx::query("UPDATE operations SET status = ?, started_at = ? WHERE id = ?")
            .bind(OperationStatus::Running)
            .bind(Utc::now())
            .bind(operation_id)
            .execute(&self.pool)
            .await
            .context("Failed to mark operation running")?;

        Ok(())
    }

    pub async fn mark_finished(&self, operation_id: &str, log: &str) -> Result<()> {
        self.mark_terminal(operation_id, OperationStatus::Finished, log)
            .await
    }

    pub async fn mark_crashed(&self, operation_id: &str, log: &str) -> Result<()> {
        self.mark_terminal(operation_id, OperationStatus::Crashed, log)
            .await
    }

    async fn mark_terminal(
        &self,
        operation_id: &str,
        status: OperationStatus,
        log: &str,
    ) -> Result<()> {
        sqlx::query("UPDATE operations SET status = ?, finished_at = ?, log = ? WHERE id = ?")
            .bind(status)
            .bind(Utc::now())
            .bind(log)
            .bind(operation_id)
            .execute(&self.pool)
            .await
            .context("Failed to mark operation terminal")?;

        Ok(())
    }

    /// Operations triggered by this one are removed too (schema cascade).
    pub async fn delete(&self, operation_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM operations WHERE id = ?")
            .bind(operation_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete operation")?;

        Ok(result.rows_affected() > 0)
    }
}
