//! Persisted deployment history types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a recorded deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    Active,
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentStatus::Active => write!(f, "active"),
        }
    }
}

/// Fields supplied by the caller when recording a deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeployment {
    pub deployment_id: String,
    pub code: String,
    pub language: String,
    pub live_url: String,
}

/// A deployment as stored for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// Record id, distinct from the deployment id.
    pub id: String,
    pub deployment_id: String,
    pub user_id: String,
    pub code: String,
    pub language: String,
    pub live_url: String,
    pub status: DeploymentStatus,
    /// Unix timestamp (milliseconds).
    pub created_at: u64,
    /// Unix timestamp (milliseconds).
    pub updated_at: u64,
}

impl DeploymentRecord {
    pub fn new(user_id: &str, new: NewDeployment, now_ms: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            deployment_id: new.deployment_id,
            user_id: user_id.to_string(),
            code: new.code,
            language: new.language,
            live_url: new.live_url,
            status: DeploymentStatus::Active,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    pub fn table_key(&self) -> String {
        table_key(&self.user_id, &self.deployment_id)
    }
}

pub fn table_key(user_id: &str, deployment_id: &str) -> String {
    format!("{user_id}/{deployment_id}")
}
