// src/tools/scope.rs

use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{debug, error};

// The current directory is process state, so the guard is process-wide even
// though a run only needs it on one thread.
static SCOPE_ACTIVE: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Error)]
pub enum ScopeError {
    /// Nested acquisition is a programmer error; fail fast instead of
    /// silently clobbering the outer scope's directory.
    #[error("a working-directory scope is already active")]
    AlreadyActive,

    #[error("failed to change working directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Scoped "current working directory = project root".
///
/// Entering saves the prior directory and chdirs into `root`; dropping the
/// guard restores the prior directory on every exit path, including tool
/// failure and panics unwinding through the scope.
#[derive(Debug)]
pub struct WorkdirScope {
    previous: PathBuf,
}

impl WorkdirScope {
    pub fn enter(root: &Path) -> Result<Self, ScopeError> {
        if SCOPE_ACTIVE.swap(true, Ordering::Acquire) {
            return Err(ScopeError::AlreadyActive);
        }

        let previous = match env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                SCOPE_ACTIVE.store(false, Ordering::Release);
                return Err(e.into());
            }
        };

        if let Err(e) = env::set_current_dir(root) {
            SCOPE_ACTIVE.store(false, Ordering::Release);
            return Err(e.into());
        }

        debug!("Entered working directory {}", root.display());
        Ok(Self { previous })
    }
}

impl Drop for WorkdirScope {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            // Nothing sensible to do beyond reporting; the process cwd is
            // now unknown.
            error!(
                "Failed to restore working directory {}: {}",
                self.previous.display(),
                e
            );
        }
        SCOPE_ACTIVE.store(false, Ordering::Release);
    }
}

/// Serializes tests that touch the process working directory.
#[cfg(test)]
pub(crate) static TEST_CWD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    // A single test fn: the guard is process-wide, so exercising enter,
    // nesting, and restore sequentially avoids interference from the test
    // harness running in parallel threads.
    #[test]
    fn scope_enters_nests_and_restores() {
        let _lock = TEST_CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = env::current_dir().unwrap();
        let dir = tempfile::tempdir().unwrap();

        {
            let _scope = WorkdirScope::enter(dir.path()).unwrap();
            assert_eq!(
                env::current_dir().unwrap().canonicalize().unwrap(),
                dir.path().canonicalize().unwrap()
            );

            // Nested acquisition fails fast.
            let err = WorkdirScope::enter(dir.path()).unwrap_err();
            assert!(matches!(err, ScopeError::AlreadyActive));
        }

        // Restored on drop, and re-enterable afterwards.
        assert_eq!(env::current_dir().unwrap(), before);
        let reentered = WorkdirScope::enter(dir.path()).unwrap();
        drop(reentered);
        assert_eq!(env::current_dir().unwrap(), before);
    }
}
