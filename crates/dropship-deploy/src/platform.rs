//! Live deployments: scaffold, materialize, publish.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use dropship_core::{Deployment, DeploymentId, DropshipConfig, Language};
use tracing::info;

use crate::Deployer;
use crate::driver::FlyDriver;
use crate::error::{DeployError, DeployResult};
use crate::runner::{CommandRunner, ProcessRunner};
use crate::workspace::{with_workspace, write_project};

pub struct PlatformDeployer {
    build_root: PathBuf,
    driver: FlyDriver,
}

impl PlatformDeployer {
    pub fn new(build_root: impl Into<PathBuf>, driver: FlyDriver) -> Self {
        Self {
            build_root: build_root.into(),
            driver,
        }
    }

    /// Real child processes, with the configured per-step deadline.
    pub fn from_config(config: &DropshipConfig) -> Self {
        let runner = ProcessRunner::with_timeout(config.deploy.command_timeout());
        Self::with_runner(config, Arc::new(runner))
    }

    pub fn with_runner(config: &DropshipConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(
            config.deploy.build_root.clone(),
            FlyDriver::new(runner, &config.deploy),
        )
    }
}

#[async_trait]
impl Deployer for PlatformDeployer {
    async fn deploy(&self, source: &str, language: Language) -> DeployResult<Deployment> {
        let id = DeploymentId::generate();
        let project = dropship_scaffold::scaffold(language, source, &id)?;

        info!(deployment_id = %id, %language, "starting deployment");

        let (project, run_id) = (&project, &id);
        let live_url = with_workspace(&self.build_root, &id, |dir| async move {
            write_project(&dir, project)?;
            let url = self.driver.deploy(&dir, run_id).await?;
            Ok::<_, DeployError>(url)
        })
        .await?;

        Ok(Deployment {
            live_url,
            language,
            deployment_id: id,
        })
    }
}
