// src/files/reconciler.rs

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::store::FileStore;

/// Turns a tool's reported touched paths into tracked file records.
///
/// Each path is independent: a read failure skips that path, records a note
/// for the operation log, and reconciliation continues with the rest.
pub struct FileReconciler {
    files: Arc<FileStore>,
}

/// Notes accumulated while reconciling; appended to the operation log so
/// partial failures are never silently dropped.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    pub notes: Vec<String>,
}

impl FileReconciler {
    pub fn new(files: Arc<FileStore>) -> Self {
        Self { files }
    }

    /// Upserts one record per touched path, in the order given. Content is
    /// read from the tool's on-disk output under `root`; `last_mod` is the
    /// filesystem's modification timestamp of that output, keeping the
    /// stored metadata honest about what the tool actually produced.
    pub async fn reconcile(
        &self,
        project_id: &str,
        root: &Path,
        touched_files: &[String],
    ) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();

        for path in touched_files {
            let on_disk = root.join(path);

            let content = match tokio::fs::read(&on_disk).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping touched file {}: {}", path, e);
                    outcome
                        .notes
                        .push(format!("could not reconcile {path}: {e}"));
                    continue;
                }
            };

            let last_mod = match file_mtime(&on_disk).await {
                Ok(mtime) => mtime,
                Err(e) => {
                    warn!("Skipping touched file {}: {}", path, e);
                    outcome
                        .notes
                        .push(format!("could not reconcile {path}: {e}"));
                    continue;
                }
            };

            match self
                .files
                .upsert(project_id, path, &content, None, last_mod)
                .await
            {
                Ok(file) => {
                    info!("Reconciled {} ({} bytes)", file.path, content.len());
                }
                Err(e) => {
                    warn!("Failed to persist touched file {}: {:#}", path, e);
                    outcome
                        .notes
                        .push(format!("could not reconcile {path}: {e}"));
                }
            }
        }

        outcome
    }
}

async fn file_mtime(path: &Path) -> std::io::Result<DateTime<Utc>> {
    let metadata = tokio::fs::metadata(path).await?;
    Ok(metadata.modified()?.into())
}
