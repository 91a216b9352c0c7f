//! Simulated deployments for environments without platform access.
//!
//! No files are written and no processes run: after a fixed delay a URL is
//! synthesized from the language and a fresh id. The success value has the
//! same shape as a live deployment.

use std::time::Duration;

use async_trait::async_trait;
use dropship_core::config::SimulationConfig;
use dropship_core::{Deployment, DeploymentId, Language};
use tracing::info;

use crate::Deployer;
use crate::error::DeployResult;

#[derive(Debug, Clone)]
pub struct SimulatedDeployer {
    delay: Duration,
    domain: String,
}

impl SimulatedDeployer {
    pub fn new(delay: Duration, domain: impl Into<String>) -> Self {
        Self {
            delay,
            domain: domain.into(),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.delay(), config.domain.clone())
    }
}

#[async_trait]
impl Deployer for SimulatedDeployer {
    async fn deploy(&self, _source: &str, language: Language) -> DeployResult<Deployment> {
        tokio::time::sleep(self.delay).await;

        let id = DeploymentId::generate();
        let live_url = format!("https://{}-app-{}.{}", language.slug(), id, self.domain);
        info!(deployment_id = %id, %live_url, "simulated deployment");

        Ok(Deployment {
            live_url,
            language,
            deployment_id: id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn synthesizes_url_after_delay() {
        let deployer = SimulatedDeployer::new(Duration::from_millis(20), "example.com");
        let started = Instant::now();
        let d = deployer.deploy("print(1)", Language::Python).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));

        let prefix = "https://python-app-";
        assert!(d.live_url.starts_with(prefix), "{}", d.live_url);
        assert!(d.live_url.ends_with(".example.com"));
        let id = &d.live_url[prefix.len()..d.live_url.len() - ".example.com".len()];
        assert_eq!(id, d.deployment_id.as_str());
        assert_eq!(d.language, Language::Python);
    }

    #[tokio::test]
    async fn each_run_gets_a_new_id() {
        let deployer = SimulatedDeployer::new(Duration::ZERO, "example.com");
        let a = deployer.deploy("x", Language::JavaScript).await.unwrap();
        let b = deployer.deploy("x", Language::JavaScript).await.unwrap();
        assert_ne!(a.deployment_id, b.deployment_id);
        assert!(a.live_url.starts_with("https://javascript-app-"));
    }
}
