// src/state.rs

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::task::JoinHandle;

use crate::files::{FileReconciler, FileStore};
use crate::operations::{OperationEngine, OperationStore};
use crate::project::ProjectStore;
use crate::tasks::OperationDispatcher;
use crate::tools::ToolRegistry;
use crate::verification::VerificationStore;

/// Shared application state handed to every HTTP handler. The tool registry
/// is injected here rather than looked up through a process-wide default, so
/// tests can assemble per-test tool sets.
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<ProjectStore>,
    pub files: Arc<FileStore>,
    pub operations: Arc<OperationStore>,
    pub verification: Arc<VerificationStore>,
    pub registry: Arc<ToolRegistry>,
    pub dispatcher: Arc<OperationDispatcher>,
}

impl AppState {
    /// Wire stores, engine and worker together over one pool. The returned
    /// handle is the operation worker; it ends when the state (and with it
    /// every dispatcher clone) is dropped.
    pub fn assemble(
        pool: SqlitePool,
        projects_root: PathBuf,
        registry: ToolRegistry,
    ) -> (Self, JoinHandle<()>) {
        let projects = Arc::new(ProjectStore::new(pool.clone(), projects_root));
        let files = Arc::new(FileStore::new(pool.clone()));
        let operations = Arc::new(OperationStore::new(pool.clone()));
        let verification = Arc::new(VerificationStore::new(pool));
        let registry = Arc::new(registry);

        let engine = Arc::new(OperationEngine::new(
            operations.clone(),
            projects.clone(),
            FileReconciler::new(files.clone()),
            registry.clone(),
        ));
        let (dispatcher, worker) = OperationDispatcher::spawn(engine);

        (
            Self {
                projects,
                files,
                operations,
                verification,
                registry,
                dispatcher: Arc::new(dispatcher),
            },
            worker,
        )
    }
}
