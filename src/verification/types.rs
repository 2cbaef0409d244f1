// src/verification/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A derived verification artifact attached to exactly one source file.
/// Multiple verification files may exist per source.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VerificationFile {
    pub id: String,
    pub project_file_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A single provable goal extracted from a verification file.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProofObligation {
    pub id: String,
    pub verification_file_id: String,
    pub goal: String,
    pub strategy: Option<String>,
    pub status: ProofStatus,
    pub created_at: DateTime<Utc>,
}

/// Tri-state proof status. New obligations start Undetermined.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ProofStatus {
    Verified,
    NotVerified,
    #[default]
    Undetermined,
}

impl std::fmt::Display for ProofStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofStatus::Verified => write!(f, "verified"),
            ProofStatus::NotVerified => write!(f, "not_verified"),
            ProofStatus::Undetermined => write!(f, "undetermined"),
        }
    }
}

impl std::str::FromStr for ProofStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verified" => Ok(ProofStatus::Verified),
            "not_verified" => Ok(ProofStatus::NotVerified),
            "undetermined" => Ok(ProofStatus::Undetermined),
            _ => Err(format!("Unknown proof status: {s}")),
        }
    }
}

// Request/Response types for API

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateVerificationFileRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateObligationRequest {
    pub goal: String,
    pub strategy: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateObligationRequest {
    pub status: ProofStatus,
}
