// src/verification/store.rs

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::aggregator;
use super::types::{ProofObligation, ProofStatus, VerificationFile};

/// Thin record storage for the verification hierarchy, plus the on-demand
/// verified predicate built on the pure aggregator.
pub struct VerificationStore {
    pool: SqlitePool,
}

impl VerificationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_verification_file(
        &self,
        project_file_id: &str,
        content: String,
    ) -> Result<VerificationFile> {
        let vf = VerificationFile {
            id: Uuid::new_v4().to_string(),
            project_file_id: project_file_id.to_string(),
            content,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO verification_files (id, project_file_id, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&vf.id)
        .bind(&vf.project_file_id)
        .bind(&vf.content)
        .bind(vf.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create verification file")?;

        Ok(vf)
    }

    pub async fn get_verification_file(&self, id: &str) -> Result<Option<VerificationFile>> {
        let vf = sqlx::query_as::<_, VerificationFile>(
            "SELECT id, project_file_id, content, created_at FROM verification_files WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get verification file")?;

        Ok(vf)
    }

    pub async fn list_for_file(&self, project_file_id: &str) -> Result<Vec<VerificationFile>> {
        let vfs = sqlx::query_as::<_, VerificationFile>(
            "SELECT id, project_file_id, content, created_at FROM verification_files WHERE project_file_id = ? ORDER BY created_at",
        )
        .bind(project_file_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list verification files")?;

        Ok(vfs)
    }

    pub async fn create_obligation(
        &self,
        verification_file_id: &str,
        goal: String,
        strategy: Option<String>,
    ) -> Result<ProofObligation> {
        let po = ProofObligation {
            id: Uuid::new_v4().to_string(),
            verification_file_id: verification_file_id.to_string(),
            goal,
            strategy,
            status: ProofStatus::default(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO proof_obligations (id, verification_file_id, goal, strategy, status, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&po.id)
        .bind(&po.verification_file_id)
        .bind(&po.goal)
        .bind(&po.strategy)
        .bind(po.status)
        .bind(po.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create proof obligation")?;

        Ok(po)
    }

    pub async fn list_obligations(
        &self,
        verification_file_id: &str,
    ) -> Result<Vec<ProofObligation>> {
        let obligations = sqlx::query_as::<_, ProofObligation>(
            "SELECT id, verification_file_id, goal, strategy, status, created_at FROM proof_obligations WHERE verification_file_id = ? ORDER BY created_at",
        )
        .bind(verification_file_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list proof obligations")?;

        Ok(obligations)
    }

    pub async fn set_obligation_status(
        &self,
        obligation_id: &str,
        status: ProofStatus,
    ) -> Result<Option<ProofObligation>> {
        let result = sqlx::query("UPDATE proof_obligations SET status = ? WHERE id = ?")
            .bind(status)
            .bind(obligation_id)
            .execute(&self.pool)
            .await
            .context("Failed to update proof obligation")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let po = sqlx::query_as::<_, ProofObligation>(
            "SELECT id, verification_file_id, goal, strategy, status, created_at FROM proof_obligations WHERE id = ?",
        )
        .bind(obligation_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to reload proof obligation")?;

        Ok(po)
    }

    /// Computed on demand when a file's verified status is queried; nothing
    /// is cached or pushed eagerly. Short-circuits on the first verification
    /// file that fails.
    pub async fn file_is_verified(&self, project_file_id: &str) -> Result<bool> {
        let verification_files = self.list_for_file(project_file_id).await?;

        let mut verdicts = Vec::with_capacity(verification_files.len());
        for vf in &verification_files {
            let obligations = self.list_obligations(&vf.id).await?;
            let verdict = aggregator::verification_file_verified(&obligations);
            if !verdict {
                return Ok(false);
            }
            verdicts.push(verdict);
        }

        // Zero verification files falls through to "never verified" here.
        Ok(aggregator::project_file_verified(verdicts))
    }
}
