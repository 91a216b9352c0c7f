//! dropship.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment switch that turns on simulated deployments.
pub const SIMULATE_ENV: &str = "DROPSHIP_SIMULATE";

/// Environment override for the deployment tool binary.
pub const FLYCTL_PATH_ENV: &str = "DROPSHIP_FLYCTL_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DropshipConfig {
    pub server: ServerConfig,
    pub deploy: DeployConfig,
    pub simulation: SimulationConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Parent directory for per-deployment workspaces.
    pub build_root: PathBuf,
    /// Deployment tool binary (name on `$PATH` or absolute path).
    pub flyctl: String,
    pub region: String,
    /// Hosting platform domain; apps are served at `<app>.<domain>`.
    pub domain: String,
    /// Optional deadline applied to each external invocation.
    pub command_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub delay_ms: u64,
    pub domain: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Bearer token → user id.
    pub tokens: HashMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            build_root: std::env::temp_dir().join("dropship-builds"),
            flyctl: "flyctl".to_string(),
            region: "iad".to_string(),
            domain: "fly.dev".to_string(),
            command_timeout_secs: None,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            delay_ms: 3000,
            domain: "example.com".to_string(),
        }
    }
}

impl DeployConfig {
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

impl SimulationConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl DropshipConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DropshipConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise defaults; then apply env overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides using the given lookup.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(FLYCTL_PATH_ENV).filter(|p| !p.is_empty()) {
            self.deploy.flyctl = path;
        }
        self
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Whether runs hit the real hosting platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployMode {
    Live,
    Simulated,
}

impl DeployMode {
    /// Simulation is only active when `DROPSHIP_SIMULATE` is explicitly set.
    pub fn from_env() -> Self {
        Self::from_switch(std::env::var(SIMULATE_ENV).ok().as_deref())
    }

    pub fn from_switch(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes") => DeployMode::Simulated,
            _ => DeployMode::Live,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial() {
        let toml_str = r#"
[deploy]
region = "ams"
command_timeout_secs = 600

[auth.tokens]
secret = "user-1"
"#;
        let config: DropshipConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.deploy.region, "ams");
        assert_eq!(config.deploy.flyctl, "flyctl");
        assert_eq!(config.deploy.command_timeout(), Some(Duration::from_secs(600)));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.simulation.delay(), Duration::from_millis(3000));
        assert_eq!(config.auth.tokens.get("secret").map(String::as_str), Some("user-1"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dropship.toml");
        std::fs::write(&path, "[server]\nport = 8088\n").unwrap();
        let config = DropshipConfig::from_file(&path).unwrap();
        assert_eq!(config.server.port, 8088);
        assert!(config.deploy.command_timeout().is_none());
    }

    #[test]
    fn test_env_override_flyctl() {
        let config = DropshipConfig::default().with_env_overrides(|key| {
            (key == FLYCTL_PATH_ENV).then(|| "/opt/fly/bin/flyctl".to_string())
        });
        assert_eq!(config.deploy.flyctl, "/opt/fly/bin/flyctl");
    }

    #[test]
    fn test_mode_switch() {
        assert_eq!(DeployMode::from_switch(None), DeployMode::Live);
        assert_eq!(DeployMode::from_switch(Some("")), DeployMode::Live);
        assert_eq!(DeployMode::from_switch(Some("0")), DeployMode::Live);
        assert_eq!(DeployMode::from_switch(Some("1")), DeployMode::Simulated);
        assert_eq!(DeployMode::from_switch(Some("TRUE")), DeployMode::Simulated);
        assert_eq!(DeployMode::from_switch(Some("yes")), DeployMode::Simulated);
    }

    #[test]
    fn test_round_trip_toml() {
        let toml_str = DropshipConfig::default().to_toml_string().unwrap();
        assert!(toml_str.contains("flyctl"));
        let parsed: DropshipConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.deploy.region, "iad");
    }
}
