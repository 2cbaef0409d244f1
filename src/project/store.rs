// src/project/store.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

use super::types::Project;

/// CRUD for projects plus their working-directory lifecycle. The directory
/// is created together with the record and removed recursively when the
/// project is destroyed.
pub struct ProjectStore {
    pool: SqlitePool,
    projects_root: PathBuf,
}

impl ProjectStore {
    pub fn new(pool: SqlitePool, projects_root: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            projects_root: projects_root.into(),
        }
    }

    /// Working-directory path: a deterministic function of the project id.
    pub fn project_root(&self, project_id: &str) -> PathBuf {
        self.projects_root.join(project_id)
    }

    pub async fn create(&self, name: String, owner: Option<String>) -> Result<Project> {
        let project = Project::new(name, owner);

        tokio::fs::create_dir_all(self.project_root(&project.id))
            .await
            .context("Failed to create project working directory")?;

        sqlx::query(
            "INSERT INTO projects (id, name, owner, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&project.id)
        .bind(&project.name)
        .bind(&project.owner)
        .bind(project.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create project")?;

        info!("Created project {} at {}", project.id, self.project_root(&project.id).display());
        Ok(project)
    }

    pub async fn get(&self, project_id: &str) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, name, owner, created_at FROM projects WHERE id = ?",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get project")?;

        Ok(project)
    }

    pub async fn list(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, name, owner, created_at FROM projects ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list projects")?;

        Ok(projects)
    }

    /// Deletes the record (files, operations and the verification hierarchy
    /// cascade) and removes the working directory recursively.
    pub async fn delete(&self, project_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(project_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete project")?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        let root = self.project_root(project_id);
        if root.exists() {
            tokio::fs::remove_dir_all(&root)
                .await
                .context("Failed to remove project working directory")?;
        }

        info!("Deleted project {}", project_id);
        Ok(true)
    }
}
