//! fly.toml hosting configuration.

use dropship_core::DeploymentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{HTTP_PORT, INTERNAL_PORT, ScaffoldError, TLS_PORT};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlyConfig {
    pub app: String,
    pub build: FlyBuild,
    pub env: BTreeMap<String, String>,
    pub services: Vec<FlyService>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlyBuild {
    pub dockerfile: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlyService {
    pub internal_port: u16,
    pub protocol: String,
    pub ports: Vec<FlyPort>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlyPort {
    pub port: u16,
    pub handlers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_https: Option<bool>,
}

impl FlyConfig {
    /// Config for the app registered for `id`: one TCP service on the
    /// internal port, HTTP on 80 (redirected to HTTPS) and TLS on 443.
    pub fn for_deployment(id: &DeploymentId) -> Self {
        let mut env = BTreeMap::new();
        env.insert("PORT".to_string(), INTERNAL_PORT.to_string());

        FlyConfig {
            app: id.app_name(),
            build: FlyBuild {
                dockerfile: crate::DOCKERFILE.to_string(),
            },
            env,
            services: vec![FlyService {
                internal_port: INTERNAL_PORT,
                protocol: "tcp".to_string(),
                ports: vec![
                    FlyPort {
                        port: HTTP_PORT,
                        handlers: vec!["http".to_string()],
                        force_https: Some(true),
                    },
                    FlyPort {
                        port: TLS_PORT,
                        handlers: vec!["tls".to_string(), "http".to_string()],
                        force_https: None,
                    },
                ],
            }],
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ScaffoldError> {
        toml::to_string_pretty(self).map_err(|e| ScaffoldError::Render {
            file: crate::HOSTING_CONFIG,
            reason: e.to_string(),
        })
    }
}

pub(crate) fn render(id: &DeploymentId) -> Result<String, ScaffoldError> {
    FlyConfig::for_deployment(id).to_toml_string()
}
