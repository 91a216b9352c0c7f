//! Project scaffolding for submitted source.
//!
//! Given a language, the raw submission and a deployment id, produce every
//! file needed to build and host the submission:
//!
//! 1. The submission itself at the language's canonical entry point
//! 2. A wrapper HTTP service, unless the submission already serves HTTP
//! 3. A dependency manifest (fixed base set + substring-triggered additions)
//! 4. A `Dockerfile`
//! 5. A `fly.toml` hosting configuration
//!
//! Everything here is pure: no filesystem access, no randomness.

use dropship_core::{DeploymentId, Language, ScaffoldedProject};
use thiserror::Error;

mod docker;
pub mod hosting;
pub mod javascript;
pub mod python;

/// Port the generated service listens on inside the container.
pub const INTERNAL_PORT: u16 = 8080;
/// Public HTTP ingress port.
pub const HTTP_PORT: u16 = 80;
/// Public TLS ingress port.
pub const TLS_PORT: u16 = 443;

pub const DOCKERFILE: &str = "Dockerfile";
pub const HOSTING_CONFIG: &str = "fly.toml";

/// Text the wrapper returns when user code exposes nothing public.
pub const EMPTY_MODULE_MESSAGE: &str =
    "Code deployed successfully, but it exposes no public members.";
/// Reported for a callable that needs arguments.
pub const NEEDS_ARGUMENTS: &str = "<requires arguments>";

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("no templates for language: {0}")]
    UnsupportedLanguage(Language),

    #[error("failed to render {file}: {reason}")]
    Render { file: &'static str, reason: String },
}

/// A substring that, when present in the submission, adds packages to the
/// dependency manifest.
#[derive(Debug, Clone, Copy)]
pub struct Trigger {
    pub marker: &'static str,
    pub packages: &'static [(&'static str, &'static str)],
}

/// Packages pulled in by the triggers that fire for `source`, in table
/// order, without duplicates.
pub(crate) fn triggered_packages(
    source: &str,
    triggers: &[Trigger],
) -> Vec<(&'static str, &'static str)> {
    let mut out: Vec<(&'static str, &'static str)> = Vec::new();
    for trigger in triggers.iter().filter(|t| source.contains(t.marker)) {
        for pkg in trigger.packages {
            if !out.iter().any(|(name, _)| *name == pkg.0) {
                out.push(*pkg);
            }
        }
    }
    out
}

/// Build the full project for `source`.
pub fn scaffold(
    language: Language,
    source: &str,
    id: &DeploymentId,
) -> Result<ScaffoldedProject, ScaffoldError> {
    let project = match language {
        Language::Python => python::scaffold(source, id)?,
        Language::JavaScript => javascript::scaffold(source, id)?,
        Language::Unknown => return Err(ScaffoldError::UnsupportedLanguage(language)),
    };

    tracing::debug!(
        deployment_id = %id,
        %language,
        files = ?project.paths(),
        "scaffolded project"
    );

    Ok(project)
}

/// Whether the submission already runs its own HTTP server.
pub fn is_self_hosted(language: Language, source: &str) -> bool {
    match language {
        Language::Python => python::is_self_hosted(source),
        Language::JavaScript => javascript::is_self_hosted(source),
        Language::Unknown => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> DeploymentId {
        DeploymentId::parse("abc123").unwrap()
    }

    #[test]
    fn unknown_language_is_rejected() {
        let err = scaffold(Language::Unknown, "x", &id()).unwrap_err();
        assert!(matches!(err, ScaffoldError::UnsupportedLanguage(Language::Unknown)));
    }

    #[test]
    fn scaffold_is_deterministic() {
        for (lang, src) in [
            (Language::Python, "import pandas\ndef f():\n    return 1\n"),
            (Language::JavaScript, "const axios = require('axios')\nmodule.exports = {}"),
        ] {
            let a = scaffold(lang, src, &id()).unwrap();
            let b = scaffold(lang, src, &id()).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn every_project_has_docker_and_hosting_files() {
        for lang in [Language::Python, Language::JavaScript] {
            let p = scaffold(lang, "x = 1", &id()).unwrap();
            assert!(p.contains(DOCKERFILE));
            assert!(p.contains(HOSTING_CONFIG));
        }
    }

    #[test]
    fn triggers_are_additive_and_deduplicated() {
        const TRIGGERS: &[Trigger] = &[
            Trigger { marker: "a", packages: &[("pkg-a", "1")] },
            Trigger { marker: "b", packages: &[("pkg-b", "1"), ("pkg-a", "1")] },
        ];
        assert!(triggered_packages("zzz", TRIGGERS).is_empty());
        assert_eq!(triggered_packages("b", TRIGGERS), vec![("pkg-b", "1"), ("pkg-a", "1")]);
        assert_eq!(triggered_packages("ab", TRIGGERS), vec![("pkg-a", "1"), ("pkg-b", "1")]);
    }

    #[test]
    fn self_hosted_dispatch() {
        assert!(is_self_hosted(Language::Python, "from flask import Flask"));
        assert!(is_self_hosted(Language::JavaScript, "require('http').createServer()"));
        assert!(!is_self_hosted(Language::Unknown, "from flask import Flask"));
    }
}
