// src/operations/engine.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::files::FileReconciler;
use crate::project::ProjectStore;
use crate::tools::{ExecutionResult, Tool, ToolError, ToolRegistry, WorkdirScope};

use super::store::OperationStore;
use super::OperationStatus;

/// Drives one operation through its lifecycle: resolve the tool, enter the
/// project's working directory, execute, reconcile the filesystem side
/// effects into tracked records, and commit the terminal status.
///
/// Tool faults never propagate past the runner: every failure mode becomes
/// a Crashed transition with a human-readable log. `run` only returns `Err`
/// for infrastructure faults (the database being unreachable, an unknown
/// operation id), where no status can be recorded at all.
pub struct OperationEngine {
    operations: Arc<OperationStore>,
    projects: Arc<ProjectStore>,
    reconciler: FileReconciler,
    registry: Arc<ToolRegistry>,
}

impl OperationEngine {
    pub fn new(
        operations: Arc<OperationStore>,
        projects: Arc<ProjectStore>,
        reconciler: FileReconciler,
        registry: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            operations,
            projects,
            reconciler,
            registry,
        }
    }

    pub async fn run(&self, operation_id: &str) -> Result<()> {
        let operation = self
            .operations
            .get(operation_id)
            .await?
            .with_context(|| format!("Operation {operation_id} not found"))?;

        // Terminal states are never re-entered and Running is not restarted;
        // a re-run is a new operation chained through triggered_by. Duplicate
        // queue deliveries land here too.
        if operation.status != OperationStatus::Planned {
            warn!(
                "Operation {} is {}, refusing to run it again",
                operation.id, operation.status
            );
            return Ok(());
        }

        info!(
            "Running operation {} (tool {}) for project {}",
            operation.id, operation.tool_name, operation.project_id
        );

        // Durable before anything executes, so a process restart mid-run
        // leaves an observable Running state needing manual inspection.
        self.operations.mark_running(&operation.id).await?;

        let tool = match self.registry.resolve(&operation.tool_name) {
            Ok(tool) => tool,
            Err(e) => {
                warn!("Operation {} crashed: {}", operation.id, e);
                self.operations
                    .mark_crashed(&operation.id, &e.to_string())
                    .await?;
                return Ok(());
            }
        };

        let Some(project) = self.projects.get(&operation.project_id).await? else {
            self.operations
                .mark_crashed(
                    &operation.id,
                    &format!("project {} no longer exists", operation.project_id),
                )
                .await?;
            return Ok(());
        };
        let root = self.projects.project_root(&project.id);

        match execute_in_scope(tool, root.clone()).await {
            Ok(result) => {
                let mut log = result.log.clone();

                let outcome = self
                    .reconciler
                    .reconcile(&project.id, &root, &result.touched_files)
                    .await;
                for note in &outcome.notes {
                    log.push('\n');
                    log.push_str(note);
                }

                if result.ok {
                    info!(
                        "Operation {} finished, {} touched files",
                        operation.id,
                        result.touched_files.len()
                    );
                    self.operations.mark_finished(&operation.id, &log).await?;
                } else {
                    warn!("Operation {} reported failure", operation.id);
                    self.operations.mark_crashed(&operation.id, &log).await?;
                }
            }
            Err(e) => {
                error!("Operation {} crashed: {}", operation.id, e);
                self.operations
                    .mark_crashed(&operation.id, &e.to_string())
                    .await?;
            }
        }

        Ok(())
    }
}

/// Runs the tool on the blocking pool with the CWD scoped to the project
/// root. The scope guard restores the prior directory on every exit path,
/// including a panicking tool unwinding through it.
async fn execute_in_scope(
    tool: Arc<dyn Tool>,
    root: PathBuf,
) -> Result<ExecutionResult, ToolError> {
    tokio::task::spawn_blocking(move || {
        let _scope = WorkdirScope::enter(&root)?;
        tool.execute()
    })
    .await
    .map_err(|e| ToolError::Execution(format!("tool task aborted: {e}")))?
}
