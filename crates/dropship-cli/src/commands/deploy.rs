use std::path::Path;

use dropship_core::{DeployMode, Deployment, DropshipConfig};
use dropship_deploy::{Orchestrator, deployer_for};

pub fn deploy(path: &Path, config: Option<&Path>) -> anyhow::Result<()> {
    let source = super::read_source(path)?;
    let config = DropshipConfig::load(config)?;
    let orchestrator = Orchestrator::new(deployer_for(DeployMode::from_env(), &config));

    let deployment = run(&orchestrator, &source)?;
    println!("✓ Deployed {} app", deployment.language);
    println!("  ID:  {}", deployment.deployment_id);
    println!("  URL: {}", deployment.live_url);
    Ok(())
}

/// One orchestrator run; the failure message is reported by `main`.
fn run(orchestrator: &Orchestrator, source: &str) -> anyhow::Result<Deployment> {
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(orchestrator.handle(Some(source)))?)
}
