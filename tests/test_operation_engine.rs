// tests/test_operation_engine.rs
//
// End-to-end runs through the dispatcher: tool resolution, the working
// directory scope, reconciliation and the status state machine.

mod test_helpers;

use std::sync::Arc;

use chrono::Utc;
use verihub::files::store::DEFAULT_FILE_TYPE;
use verihub::operations::{Operation, OperationStatus};
use verihub::project::Project;
use verihub::tools::{ExecutionResult, Tool, ToolError};

use test_helpers::{create_test_env, create_test_env_with_registry, wait_for_terminal, TestEnv, RUN_LOCK};

/// Tool that reports logical failure without faulting.
struct RefusingTool;

impl Tool for RefusingTool {
    fn name(&self) -> &str {
        "refusing"
    }

    fn execute(&self) -> Result<ExecutionResult, ToolError> {
        Ok(ExecutionResult {
            ok: false,
            log: "input rejected: nothing to analyze".to_string(),
            touched_files: vec![],
        })
    }
}

/// Tool whose implementation faults.
struct FaultingTool;

impl Tool for FaultingTool {
    fn name(&self) -> &str {
        "faulting"
    }

    fn execute(&self) -> Result<ExecutionResult, ToolError> {
        Err(ToolError::Execution("solver binary not found".to_string()))
    }
}

/// Tool that claims to have touched a path it never wrote.
struct LyingTool;

impl Tool for LyingTool {
    fn name(&self) -> &str {
        "lying"
    }

    fn execute(&self) -> Result<ExecutionResult, ToolError> {
        Ok(ExecutionResult {
            ok: true,
            log: "done".to_string(),
            touched_files: vec!["ghost.out".to_string()],
        })
    }
}

async fn create_project_with_source(env: &TestEnv, source: &str) -> Project {
    let project = env
        .state
        .projects
        .create("demo".to_string(), Some("alice".to_string()))
        .await
        .expect("create project");

    let root = env.state.projects.project_root(&project.id);
    tokio::fs::write(root.join(source), b"fn main() {}\n")
        .await
        .expect("write source file");
    env.state
        .files
        .upsert(&project.id, source, b"fn main() {}\n", None, Utc::now())
        .await
        .expect("track source file");

    project
}

async fn submit_and_run(env: &TestEnv, project_id: &str, tool: &str) -> Operation {
    let operation = Operation::new(
        project_id.to_string(),
        tool.to_string(),
        "alice".to_string(),
        None,
    );
    env.state
        .operations
        .create(&operation)
        .await
        .expect("create operation");

    env.state
        .dispatcher
        .enqueue(&operation.id)
        .expect("enqueue operation");

    wait_for_terminal(&env.state, &operation.id).await
}

#[tokio::test]
async fn fake_transform_run_tracks_output_files() {
    let _lock = RUN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let cwd_before = std::env::current_dir().unwrap();

    let env = create_test_env().await;
    let project = create_project_with_source(&env, "a.src").await;

    let op = submit_and_run(&env, &project.id, "fake_transform").await;

    assert_eq!(op.status, OperationStatus::Finished);
    assert!(op.started_at.is_some());
    assert!(op.finished_at.is_some());
    let log = op.log.expect("terminal operation carries a log");
    assert!(!log.is_empty());

    // The derived file is tracked with the generic default type and the
    // content the tool wrote on disk.
    let out = env
        .state
        .files
        .get_by_path(&project.id, "a.src.out")
        .await
        .unwrap()
        .expect("a.src.out tracked");
    assert_eq!(out.file_type, DEFAULT_FILE_TYPE);
    let content = env.state.files.content(&out.id).await.unwrap().unwrap();
    assert_eq!(content, b"fn main() {}\n");

    // Working directory restored after the run.
    assert_eq!(std::env::current_dir().unwrap(), cwd_before);
}

#[tokio::test]
async fn rerunning_reconciliation_yields_no_duplicates() {
    let _lock = RUN_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let env = create_test_env().await;
    let project = create_project_with_source(&env, "a.src").await;

    let first = submit_and_run(&env, &project.id, "fake_transform").await;
    assert_eq!(first.status, OperationStatus::Finished);

    // A re-run is a new operation chained through triggered_by; the upsert
    // keyed on (project, path) keeps one record per path.
    let rerun = Operation::new(
        project.id.clone(),
        "fake_transform".to_string(),
        "alice".to_string(),
        Some(first.id.clone()),
    );
    env.state.operations.create(&rerun).await.unwrap();
    env.state.dispatcher.enqueue(&rerun.id).unwrap();
    let rerun = wait_for_terminal(&env.state, &rerun.id).await;
    assert_eq!(rerun.status, OperationStatus::Finished);
    assert_eq!(rerun.triggered_by, Some(first.id));

    let files = env.state.files.list(&project.id).await.unwrap();
    let out_records: Vec<_> = files.iter().filter(|f| f.path == "a.src.out").collect();
    assert_eq!(out_records.len(), 1);

    // Only a.src and a.src.out; the rerun rewrote the same output path.
    assert_eq!(files.len(), 2);
}

#[tokio::test]
async fn terminal_operation_is_not_reexecuted_on_duplicate_enqueue() {
    let _lock = RUN_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let env = create_test_env().await;
    let project = create_project_with_source(&env, "a.src").await;

    let first = submit_and_run(&env, &project.id, "fake_transform").await;
    assert_eq!(first.status, OperationStatus::Finished);

    // Deliver the same id again, then run a fresh operation through the
    // worker; it is strictly sequential, so once the fresh one is terminal
    // the duplicate delivery has been processed too.
    env.state.dispatcher.enqueue(&first.id).unwrap();
    let drain = submit_and_run(&env, &project.id, "fake_transform").await;
    assert_eq!(drain.status, OperationStatus::Finished);

    // The terminal operation was refused, not re-entered.
    let unchanged = env
        .state
        .operations
        .get(&first.id)
        .await
        .unwrap()
        .expect("operation exists");
    assert_eq!(unchanged.status, OperationStatus::Finished);
    assert_eq!(unchanged.started_at, first.started_at);
    assert_eq!(unchanged.finished_at, first.finished_at);
    assert_eq!(unchanged.log, first.log);
}

#[tokio::test]
async fn unknown_tool_crashes_without_mutating_files() {
    let env = create_test_env().await;
    let project = create_project_with_source(&env, "a.src").await;
    let before = env.state.files.list(&project.id).await.unwrap();

    let op = submit_and_run(&env, &project.id, "nope").await;

    assert_eq!(op.status, OperationStatus::Crashed);
    let log = op.log.expect("crashed operation carries a log");
    assert!(log.contains("unknown tool"));
    assert!(log.contains("nope"));

    let after = env.state.files.list(&project.id).await.unwrap();
    assert_eq!(before.len(), after.len());
}

#[tokio::test]
async fn logical_tool_failure_becomes_crashed_with_tool_log() {
    let _lock = RUN_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let mut registry = test_helpers::default_registry();
    registry.register(Arc::new(RefusingTool));
    let env = create_test_env_with_registry(registry).await;
    let project = create_project_with_source(&env, "a.src").await;

    let op = submit_and_run(&env, &project.id, "refusing").await;

    assert_eq!(op.status, OperationStatus::Crashed);
    assert_eq!(op.log.as_deref(), Some("input rejected: nothing to analyze"));
}

#[tokio::test]
async fn faulting_tool_is_caught_at_the_runner_boundary() {
    let _lock = RUN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let cwd_before = std::env::current_dir().unwrap();

    let mut registry = test_helpers::default_registry();
    registry.register(Arc::new(FaultingTool));
    let env = create_test_env_with_registry(registry).await;
    let project = create_project_with_source(&env, "a.src").await;

    let op = submit_and_run(&env, &project.id, "faulting").await;

    assert_eq!(op.status, OperationStatus::Crashed);
    assert!(op.log.unwrap().contains("solver binary not found"));

    // Restored even though the tool faulted inside the scope.
    assert_eq!(std::env::current_dir().unwrap(), cwd_before);
}

#[tokio::test]
async fn unreadable_touched_path_is_noted_but_does_not_crash_the_run() {
    let _lock = RUN_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let mut registry = test_helpers::default_registry();
    registry.register(Arc::new(LyingTool));
    let env = create_test_env_with_registry(registry).await;
    let project = create_project_with_source(&env, "a.src").await;

    let op = submit_and_run(&env, &project.id, "lying").await;

    // The tool succeeded; the unreconcilable path is surfaced in the log
    // instead of failing the operation.
    assert_eq!(op.status, OperationStatus::Finished);
    let log = op.log.unwrap();
    assert!(log.contains("could not reconcile ghost.out"));

    assert!(env
        .state
        .files
        .get_by_path(&project.id, "ghost.out")
        .await
        .unwrap()
        .is_none());
}
