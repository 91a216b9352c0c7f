//! Shared types used across dropship crates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Language a submission was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Python,
    JavaScript,
    /// Present in the data model; the classifier always picks a side.
    Unknown,
}

impl Language {
    /// Display label, as returned to API callers.
    pub fn label(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::Unknown => "Unknown",
        }
    }

    /// Lowercase form used in hostnames.
    pub fn slug(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "javascript" | "js" | "node" => Ok(Language::JavaScript),
            _ => Err(UnsupportedLanguage(s.to_string())),
        }
    }
}

// ── Deployment id ──────────────────────────────────────────────────

/// Longest id accepted by [`DeploymentId::parse`]. Keeps the derived app
/// name within hostname label limits.
const MAX_ID_LEN: usize = 40;

/// Unique identifier minted once per deployment run.
///
/// Namespaces the build workspace, the hosting application name and the
/// public URL. Ids only contain `[a-z0-9-]`, so they are safe to use as a
/// path component and inside a hostname.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentId(String);

#[derive(Debug, Error, PartialEq)]
pub enum InvalidDeploymentId {
    #[error("deployment id is empty")]
    Empty,
    #[error("deployment id longer than {MAX_ID_LEN} characters: {0}")]
    TooLong(String),
    #[error("deployment id may only contain lowercase letters, digits and '-': {0}")]
    InvalidCharacter(String),
}

impl DeploymentId {
    /// Mint a fresh id (UUIDv4, simple hex form).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Accept an externally supplied id, e.g. from the CLI.
    pub fn parse(raw: &str) -> Result<Self, InvalidDeploymentId> {
        if raw.is_empty() {
            return Err(InvalidDeploymentId::Empty);
        }
        if raw.len() > MAX_ID_LEN {
            return Err(InvalidDeploymentId::TooLong(raw.to_string()));
        }
        let valid = raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid || raw.starts_with('-') || raw.ends_with('-') {
            return Err(InvalidDeploymentId::InvalidCharacter(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the hosting application registered for this deployment.
    pub fn app_name(&self) -> String {
        format!("dropship-{}", self.0)
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Scaffolded project ─────────────────────────────────────────────

/// Relative path → file content for one deployable project.
///
/// Backed by a `BTreeMap` so iteration order (and therefore write order)
/// is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScaffoldedProject {
    files: BTreeMap<String, String>,
}

impl ScaffoldedProject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn paths(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

// ── Outcome ────────────────────────────────────────────────────────

/// Successful deployment, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub live_url: String,
    pub language: Language,
    pub deployment_id: DeploymentId,
}

/// Category of a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Empty or missing input. Nothing was attempted.
    Validation,
    Scaffold,
    Workspace,
    ExternalTool,
}

impl ErrorKind {
    /// Whether the caller, rather than the pipeline, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ErrorKind::Validation)
    }
}

/// Uniform failure shape returned from a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for DeploymentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DeploymentFailure {}

/// Exactly one of success or failure per run.
pub type DeploymentResult = Result<Deployment, DeploymentFailure>;
