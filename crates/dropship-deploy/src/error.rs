//! Error types for the deployment pipeline.

use std::path::PathBuf;
use std::time::Duration;

use dropship_core::ErrorKind;
use dropship_scaffold::ScaffoldError;
use thiserror::Error;

/// Filesystem failures while managing a build workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("workspace already exists: {0}")]
    InUse(PathBuf),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Only ever logged; never replaces a run's outcome.
    #[error("failed to remove workspace {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures invoking the external deployment tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} step failed (exit code {}): {detail}", exit_label(.code))]
    Failed {
        step: String,
        code: Option<i32>,
        detail: String,
    },

    #[error("{program} timed out after {limit:?}")]
    Timeout { program: String, limit: Duration },
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// Any failure of a deployment run.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    ExternalTool(#[from] ToolError),
}

impl DeployError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::Validation(_) => ErrorKind::Validation,
            DeployError::Scaffold(_) => ErrorKind::Scaffold,
            DeployError::Workspace(_) => ErrorKind::Workspace,
            DeployError::ExternalTool(_) => ErrorKind::ExternalTool,
        }
    }
}

pub type DeployResult<T> = Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_step_message_carries_detail() {
        let err = ToolError::Failed {
            step: "launch".to_string(),
            code: Some(1),
            detail: "Error: app name taken".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "launch step failed (exit code 1): Error: app name taken"
        );

        let err = ToolError::Failed {
            step: "deploy".to_string(),
            code: None,
            detail: "killed".to_string(),
        };
        assert!(err.to_string().contains("exit code none"));
    }

    #[test]
    fn kinds_map_one_to_one() {
        assert_eq!(DeployError::Validation("x".into()).kind(), ErrorKind::Validation);
        let tool = ToolError::Timeout {
            program: "flyctl".into(),
            limit: Duration::from_secs(1),
        };
        assert_eq!(DeployError::from(tool).kind(), ErrorKind::ExternalTool);
        let ws = WorkspaceError::InUse(PathBuf::from("/tmp/x"));
        assert_eq!(DeployError::from(ws).kind(), ErrorKind::Workspace);
    }

    #[test]
    fn timeout_keeps_sub_second_precision() {
        let err = ToolError::Timeout {
            program: "flyctl".into(),
            limit: Duration::from_millis(100),
        };
        assert_eq!(err.to_string(), "flyctl timed out after 100ms");
    }
}
