// src/tools/fake_transform.rs

use std::fs;

use glob::glob;
use tracing::debug;

use super::{ExecutionResult, Tool, ToolError};

/// Identity-transform tool used to exercise the execution engine end to end:
/// every file matching the source pattern is copied to `<path><suffix>` and
/// reported as a touched file.
pub struct FakeTransformTool {
    pattern: String,
    suffix: String,
}

impl FakeTransformTool {
    pub fn new(pattern: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            suffix: suffix.into(),
        }
    }
}

impl Default for FakeTransformTool {
    fn default() -> Self {
        Self::new("**/*.src", ".out")
    }
}

impl Tool for FakeTransformTool {
    fn name(&self) -> &str {
        "fake_transform"
    }

    fn human_readable_name(&self) -> &str {
        "Fake identity transform"
    }

    fn execute(&self) -> Result<ExecutionResult, ToolError> {
        let entries = glob(&self.pattern)
            .map_err(|e| ToolError::Execution(format!("bad source pattern: {e}")))?;

        let mut created = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    // An unreadable directory entry fails the run logically,
                    // keeping what was produced so far.
                    return Ok(ExecutionResult {
                        ok: false,
                        log: format!("failed to read directory entry: {e}"),
                        touched_files: created,
                    });
                }
            };

            let source = path.to_string_lossy().into_owned();
            let output = format!("{source}{}", self.suffix);
            debug!("Passing {} through identity transform", source);

            if let Err(e) = fs::copy(&path, &output) {
                return Ok(ExecutionResult {
                    ok: false,
                    log: format!("failed to transform {source}: {e}"),
                    touched_files: created,
                });
            }
            created.push(output);
        }

        Ok(ExecutionResult {
            ok: true,
            log: "All files passed through the identity transform".to_string(),
            touched_files: created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::WorkdirScope;

    #[test]
    fn transforms_matching_files_in_discovery_order() {
        let _lock = crate::tools::scope::TEST_CWD_LOCK
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.src"), b"alpha").unwrap();
        fs::write(dir.path().join("b.src"), b"beta").unwrap();
        fs::write(dir.path().join("ignored.txt"), b"nope").unwrap();

        let result = {
            let _scope = WorkdirScope::enter(dir.path()).unwrap();
            FakeTransformTool::default().execute().unwrap()
        };

        assert!(result.ok);
        assert_eq!(
            result.touched_files,
            vec!["a.src.out".to_string(), "b.src.out".to_string()]
        );
        assert_eq!(fs::read(dir.path().join("a.src.out")).unwrap(), b"alpha");
        assert_eq!(fs::read(dir.path().join("b.src.out")).unwrap(), b"beta");
    }
}
