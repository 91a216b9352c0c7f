//! Entry point for a deployment run.

use std::sync::Arc;

use dropship_core::{DeploymentFailure, DeploymentResult};
use tracing::{error, info, warn};

use crate::Deployer;
use crate::error::DeployError;

/// Message returned for empty or missing input.
pub const NO_CODE_MESSAGE: &str = "No code provided";

/// Validates input, classifies it and hands it to a [`Deployer`], mapping
/// any failure into a [`DeploymentFailure`].
#[derive(Clone)]
pub struct Orchestrator {
    deployer: Arc<dyn Deployer>,
}

impl Orchestrator {
    pub fn new(deployer: Arc<dyn Deployer>) -> Self {
        Self { deployer }
    }

    pub async fn handle(&self, source: Option<&str>) -> DeploymentResult {
        let source = match source {
            Some(s) if !s.is_empty() => s,
            _ => {
                let err = DeployError::Validation(NO_CODE_MESSAGE.to_string());
                warn!(error = %err, "rejected submission");
                return Err(failure(&err));
            }
        };

        let language = dropship_detect::classify(source);

        match self.deployer.deploy(source, language).await {
            Ok(deployment) => {
                info!(
                    deployment_id = %deployment.deployment_id,
                    %language,
                    url = %deployment.live_url,
                    "deployment succeeded"
                );
                Ok(deployment)
            }
            Err(e) => {
                error!(%language, kind = ?e.kind(), error = ?e, "deployment failed");
                Err(failure(&e))
            }
        }
    }
}

/// Caller-facing shape of `err`. Validation messages pass through as-is.
fn failure(err: &DeployError) -> DeploymentFailure {
    let message = match err {
        DeployError::Validation(msg) => msg.clone(),
        other => format!("Deployment failed: {other}"),
    };
    DeploymentFailure {
        kind: err.kind(),
        message,
    }
}
