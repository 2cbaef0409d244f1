// src/tools/registry.rs

use std::sync::Arc;

use super::{Tool, ToolError};

/// Maps stable tool names to implementations.
///
/// The registry is not append-only: registering a tool under an existing name
/// silently replaces the previous implementation (last write wins) while
/// keeping its original listing position. There is no hidden process-wide
/// default; callers build a registry and inject it into the engine, so tests
/// can use isolated tool sets.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own `name()`. Last write wins.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(slot) => *slot = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Tool>, ToolError> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .cloned()
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    /// (name, human-readable name) pairs in registration order. The iterator
    /// is finite and restartable; call again for a fresh pass.
    pub fn list_available(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tools
            .iter()
            .map(|t| (t.name(), t.human_readable_name()))
    }
}
