// src/tools/mod.rs

//! The pluggable tool framework: the capability contract every analysis or
//! transformation tool satisfies, the registry that resolves stable tool
//! names to implementations, and the working-directory scope a run executes
//! under.

pub mod fake_transform;
pub mod registry;
pub mod scope;

pub use fake_transform::FakeTransformTool;
pub use registry::ToolRegistry;
pub use scope::{ScopeError, WorkdirScope};

use thiserror::Error;

/// Outcome contract a tool returns from `execute`.
///
/// `ok = false` is the tool's own logical failure, not an engine fault; it is
/// a normal result path. `touched_files` lists every path (relative to the
/// project root) the tool created or modified, in discovery order;
/// reconciliation processes them in exactly this order.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub ok: bool,
    pub log: String,
    pub touched_files: Vec<String>,
}

/// Failures of the tool framework itself, as opposed to a tool reporting
/// `ok = false`.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The operation references a tool name the registry does not know.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The tool implementation faulted while executing.
    #[error("tool execution failed: {0}")]
    Execution(String),

    /// The working-directory scope could not be entered.
    #[error(transparent)]
    Scope(#[from] ScopeError),
}

/// A unit of work that transforms files in a project working directory.
///
/// `execute` runs synchronously with the process CWD set to the project root
/// by a [`WorkdirScope`]; any concurrency inside a tool is private to it and
/// invisible to the engine.
pub trait Tool: Send + Sync {
    /// Stable identifier, unique within a registry.
    fn name(&self) -> &str;

    /// Display label for discovery UIs.
    fn human_readable_name(&self) -> &str {
        self.name()
    }

    /// Subset of the input files the tool actually needs. The default keeps
    /// the full set: always correct, even if the transfer is not optimal.
    fn relevant_files(&self, files: Vec<String>) -> Vec<String> {
        files
    }

    fn execute(&self) -> Result<ExecutionResult, ToolError>;
}

impl std::fmt::Debug for dyn Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool").field("name", &self.name()).finish()
    }
}
