// src/files/store.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::types::ProjectFile;

const COLUMNS: &str = "id, project_id, path, file_type, content_hash, last_mod";

/// Default declared type when nothing better can be inferred from the path.
pub const DEFAULT_FILE_TYPE: &str = "text/plain";

/// CRUD for tracked files. All writes go through the natural-key upsert so
/// that two records can never share a path within one project.
pub struct FileStore {
    pool: SqlitePool,
}

impl FileStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Atomic get-or-create keyed on (project, path).
    ///
    /// On insert the declared type is `file_type` (or, when `None`, a type
    /// inferred from the path falling back to `text/plain`); on update the
    /// existing declared type is preserved and only content, hash and
    /// `last_mod` change. `last_mod` is the caller's timestamp; for
    /// reconciliation that is the filesystem mtime, not "now".
    pub async fn upsert(
        &self,
        project_id: &str,
        path: &str,
        content: &[u8],
        file_type: Option<&str>,
        last_mod: DateTime<Utc>,
    ) -> Result<ProjectFile> {
        let declared_type = match file_type {
            Some(t) => t.to_string(),
            None => infer_file_type(path),
        };
        let content_hash = hash_content(content);
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO project_files (id, project_id, path, file_type, content, content_hash, last_mod)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(project_id, path) DO UPDATE SET
                content = excluded.content,
                content_hash = excluded.content_hash,
                last_mod = excluded.last_mod
            "#,
        )
        .bind(&id)
        .bind(project_id)
        .bind(path)
        .bind(&declared_type)
        .bind(content)
        .bind(&content_hash)
        .bind(last_mod)
        .execute(&self.pool)
        .await
        .context("Failed to upsert project file")?;

        self.get_by_path(project_id, path)
            .await?
            .context("Upserted project file disappeared")
    }

    pub async fn get(&self, file_id: &str) -> Result<Option<ProjectFile>> {
        let file = sqlx::query_as::<_, ProjectFile>(&format!(
            "SELECT {COLUMNS} FROM project_files WHERE id = ?"
        ))
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get project file")?;

        Ok(file)
    }

    pub async fn get_by_path(&self, project_id: &str, path: &str) -> Result<Option<ProjectFile>> {
        let file = sqlx::query_as::<_, ProjectFile>(&format!(
            "SELECT {COLUMNS} FROM project_files WHERE project_id = ? AND path = ?"
        ))
        .bind(project_id)
        .bind(path)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get project file by path")?;

        Ok(file)
    }

    pub async fn list(&self, project_id: &str) -> Result<Vec<ProjectFile>> {
        let files = sqlx::query_as::<_, ProjectFile>(&format!(
            "SELECT {COLUMNS} FROM project_files WHERE project_id = ? ORDER BY path"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list project files")?;

        Ok(files)
    }

    /// The stored content blob, fetched on demand.
    pub async fn content(&self, file_id: &str) -> Result<Option<Vec<u8>>> {
        let row: Option<(Vec<u8>,)> =
            sqlx::query_as("SELECT content FROM project_files WHERE id = ?")
                .bind(file_id)
                .fetch_optional(&self.pool)
                .await
                .context("Failed to read project file content")?;

        Ok(row.map(|(content,)| content))
    }

    /// Removes the record, returning it so the caller can unlink the backing
    /// file in the working directory.
    pub async fn delete(&self, file_id: &str) -> Result<Option<ProjectFile>> {
        let Some(file) = self.get(file_id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM project_files WHERE id = ?")
            .bind(file_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete project file")?;

        Ok(Some(file))
    }
}

/// MIME type from the path extension, defaulting to plain text.
pub fn infer_file_type(path: &str) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_FILE_TYPE)
        .to_string()
}

fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extensions_fall_back_to_plain_text() {
        assert_eq!(infer_file_type("a.src"), "text/plain");
        assert_eq!(infer_file_type("a.src.out"), "text/plain");
        assert_eq!(infer_file_type("report.json"), "application/json");
    }
}
