//! dropship-deploy — turn submitted source into a live app.
//!
//! Pipeline for one run:
//! 1. Reject empty input
//! 2. Classify the language
//! 3. Mint a deployment id and scaffold the project
//! 4. Materialize it in a workspace owned by the run
//! 5. `flyctl launch` then `flyctl deploy`
//! 6. Remove the workspace, whatever happened
//!
//! Steps 3–6 sit behind the [`Deployer`] trait so the simulated mode and
//! tests can replace them.

pub mod driver;
pub mod error;
pub mod orchestrator;
pub mod platform;
pub mod runner;
pub mod simulated;
pub mod workspace;

use std::sync::Arc;

use async_trait::async_trait;
use dropship_core::{DeployMode, Deployment, DropshipConfig, Language};

pub use driver::FlyDriver;
pub use error::{DeployError, DeployResult, ToolError, WorkspaceError};
pub use orchestrator::Orchestrator;
pub use platform::PlatformDeployer;
pub use runner::{CommandOutput, CommandRunner, CommandSpec, ProcessRunner};
pub use simulated::SimulatedDeployer;
pub use workspace::{Workspace, with_workspace, write_project};

/// Publishes classified source and reports where it is served.
#[async_trait]
pub trait Deployer: Send + Sync {
    async fn deploy(&self, source: &str, language: Language) -> DeployResult<Deployment>;
}

/// Pick the deployer for `mode`.
pub fn deployer_for(mode: DeployMode, config: &DropshipConfig) -> Arc<dyn Deployer> {
    match mode {
        DeployMode::Live => Arc::new(PlatformDeployer::from_config(config)),
        DeployMode::Simulated => Arc::new(SimulatedDeployer::from_config(&config.simulation)),
    }
}
