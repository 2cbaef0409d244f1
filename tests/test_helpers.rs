// tests/test_helpers.rs
#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use tempfile::TempDir;
use tokio::task::JoinHandle;

use verihub::operations::{Operation, OperationStatus};
use verihub::server::db;
use verihub::state::AppState;
use verihub::tools::{FakeTransformTool, ToolRegistry};

/// Serializes tests that actually execute a tool: runs chdir into the
/// project root, and the working-directory scope is process-wide.
pub static RUN_LOCK: Mutex<()> = Mutex::new(());

/// A full AppState over a temp SQLite database and temp project storage.
/// Keep the env alive for the whole test; dropping it deletes the data.
pub struct TestEnv {
    pub state: AppState,
    pub worker: JoinHandle<()>,
    _data_dir: TempDir,
}

pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(std::sync::Arc::new(FakeTransformTool::default()));
    registry
}

pub async fn create_test_env() -> TestEnv {
    create_test_env_with_registry(default_registry()).await
}

pub async fn create_test_env_with_registry(registry: ToolRegistry) -> TestEnv {
    let data_dir = tempfile::tempdir().expect("create temp dir");
    let db_path = data_dir.path().join("verihub.db");

    let pool = db::create_pool(&format!("sqlite://{}", db_path.display()))
        .await
        .expect("create sqlite pool");

    let migrations = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    db::run_migrations(&pool, &migrations)
        .await
        .expect("run migrations");

    let projects_root = data_dir.path().join("projects");
    let (state, worker) = AppState::assemble(pool, projects_root, registry);

    TestEnv {
        state,
        worker,
        _data_dir: data_dir,
    }
}

/// Polls the operation until it leaves Planned/Running.
pub async fn wait_for_terminal(state: &AppState, operation_id: &str) -> Operation {
    for _ in 0..500 {
        let op = state
            .operations
            .get(operation_id)
            .await
            .expect("get operation")
            .expect("operation exists");
        if matches!(
            op.status,
            OperationStatus::Finished | OperationStatus::Crashed
        ) {
            return op;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("operation {operation_id} never reached a terminal state");
}
