//! flyctl deployment driver.
//!
//! Two strictly sequential invocations against a materialized workspace:
//! 1. `flyctl launch --name <app> --region <region> --no-deploy --yes`
//!    registers the app without publishing
//! 2. `flyctl deploy` builds the Dockerfile and ships it
//!
//! The publish step is never attempted if registration fails. The public URL
//! is derived from the app name and the platform domain.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use dropship_core::DeploymentId;
use dropship_core::config::DeployConfig;
use tracing::{info, warn};

use crate::error::ToolError;
use crate::runner::{CommandOutput, CommandRunner, CommandSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Launch,
    Deploy,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Launch => f.write_str("launch"),
            Step::Deploy => f.write_str("deploy"),
        }
    }
}

pub struct FlyDriver {
    runner: Arc<dyn CommandRunner>,
    flyctl: String,
    region: String,
    domain: String,
}

impl FlyDriver {
    pub fn new(runner: Arc<dyn CommandRunner>, config: &DeployConfig) -> Self {
        Self {
            runner,
            flyctl: config.flyctl.clone(),
            region: config.region.clone(),
            domain: config.domain.clone(),
        }
    }

    pub fn launch_command(&self, workspace: &Path, id: &DeploymentId) -> CommandSpec {
        CommandSpec::new(&self.flyctl)
            .arg("launch")
            .args(["--name", id.app_name().as_str()])
            .args(["--region", self.region.as_str()])
            .arg("--no-deploy")
            .arg("--yes")
            .cwd(workspace)
    }

    pub fn deploy_command(&self, workspace: &Path) -> CommandSpec {
        CommandSpec::new(&self.flyctl).arg("deploy").cwd(workspace)
    }

    pub fn public_url(&self, id: &DeploymentId) -> String {
        format!("https://{}.{}", id.app_name(), self.domain)
    }

    /// Register and publish the app for `id` from `workspace`.
    pub async fn deploy(&self, workspace: &Path, id: &DeploymentId) -> Result<String, ToolError> {
        self.run_step(Step::Launch, id, &self.launch_command(workspace, id))
            .await?;
        self.run_step(Step::Deploy, id, &self.deploy_command(workspace))
            .await?;

        let url = self.public_url(id);
        info!(deployment_id = %id, %url, "app published");
        Ok(url)
    }

    async fn run_step(
        &self,
        step: Step,
        id: &DeploymentId,
        spec: &CommandSpec,
    ) -> Result<CommandOutput, ToolError> {
        info!(deployment_id = %id, %step, args = ?spec.args_lossy(), "running flyctl");

        let output = self.runner.run(spec).await?;
        if !output.success {
            let detail = output.failure_detail();
            warn!(deployment_id = %id, %step, code = ?output.code, %detail, "flyctl step failed");
            return Err(ToolError::Failed {
                step: step.to_string(),
                code: output.code,
                detail,
            });
        }
        Ok(output)
    }
}
