//! Python templates: Flask wrapper, requirements.txt, Dockerfile.

use dropship_core::{DeploymentId, ScaffoldedProject};

use crate::docker::{self, DockerSpec};
use crate::{EMPTY_MODULE_MESSAGE, INTERNAL_PORT, NEEDS_ARGUMENTS, ScaffoldError, Trigger};

pub const ENTRY_POINT: &str = "main.py";
pub const WRAPPER: &str = "server.py";
pub const MANIFEST: &str = "requirements.txt";
pub const BASE_IMAGE: &str = "python:3.11-slim";

const BASE_PACKAGES: &[&str] = &["flask", "gunicorn"];

/// Imports or primitives that mean the submission serves HTTP itself.
const SERVICE_MARKERS: &[&str] = &[
    "from flask import",
    "import flask",
    "from fastapi import",
    "import fastapi",
    "from django",
    "import django",
    "http.server",
    "socketserver",
    "serve_forever(",
];

const TRIGGERS: &[Trigger] = &[
    Trigger { marker: "pandas", packages: &[("pandas", "")] },
    Trigger { marker: "numpy", packages: &[("numpy", "")] },
    Trigger { marker: "requests", packages: &[("requests", "")] },
    Trigger { marker: "fastapi", packages: &[("fastapi", ""), ("uvicorn", "")] },
    Trigger { marker: "django", packages: &[("django", "")] },
];

pub fn is_self_hosted(source: &str) -> bool {
    SERVICE_MARKERS.iter().any(|m| source.contains(m))
}

pub fn scaffold(source: &str, id: &DeploymentId) -> Result<ScaffoldedProject, ScaffoldError> {
    let self_hosted = is_self_hosted(source);
    let mut project = ScaffoldedProject::new();

    project.insert(ENTRY_POINT, source);
    if !self_hosted {
        project.insert(WRAPPER, generate_wrapper());
    }
    project.insert(MANIFEST, generate_requirements(source));

    let run = if self_hosted { ENTRY_POINT } else { WRAPPER };
    project.insert(
        crate::DOCKERFILE,
        docker::render(&DockerSpec {
            image: BASE_IMAGE,
            manifest: MANIFEST,
            install: "pip install --no-cache-dir -r requirements.txt",
            cmd: &["python", run],
        }),
    );
    project.insert(crate::HOSTING_CONFIG, crate::hosting::render(id)?);

    Ok(project)
}

/// requirements.txt: base packages, then whatever the triggers add.
pub fn generate_requirements(source: &str) -> String {
    let mut names: Vec<&str> = BASE_PACKAGES.to_vec();
    for (name, _) in crate::triggered_packages(source, TRIGGERS) {
        if !names.contains(&name) {
            names.push(name);
        }
    }

    let mut out = names.join("\n");
    out.push('\n');
    out
}

/// Flask service that imports `main` and reports on its public members.
pub fn generate_wrapper() -> String {
    WRAPPER_TEMPLATE
        .replace("%NEEDS_ARGUMENTS%", NEEDS_ARGUMENTS)
        .replace("%EMPTY_MESSAGE%", EMPTY_MODULE_MESSAGE)
        .replace("%PORT%", &INTERNAL_PORT.to_string())
}

const WRAPPER_TEMPLATE: &str = r#"# Generated by dropship. Serves main.py over HTTP.
import inspect
import os

from flask import Flask, jsonify

import main as user_module

app = Flask(__name__)

NEEDS_ARGUMENTS = "%NEEDS_ARGUMENTS%"
EMPTY_MESSAGE = "%EMPTY_MESSAGE%"


def _public_members():
    return {
        name: value
        for name, value in vars(user_module).items()
        if not name.startswith("_") and not inspect.ismodule(value)
    }


def _defined_in_user_module(value):
    return getattr(value, "__module__", None) == user_module.__name__


def _requires_arguments(func):
    try:
        signature = inspect.signature(func)
    except (TypeError, ValueError):
        return False
    for param in signature.parameters.values():
        if param.default is not inspect.Parameter.empty:
            continue
        if param.kind in (param.VAR_POSITIONAL, param.VAR_KEYWORD):
            continue
        return True
    return False


def _invocable(value):
    return callable(value) and _defined_in_user_module(value)


def _invoke(func):
    if _requires_arguments(func):
        return NEEDS_ARGUMENTS
    try:
        return str(func())
    except Exception as exc:
        return "<error: {}>".format(exc)


def report():
    """Functions and classes from main.py are called with no arguments.
    Without any, every public member is reported by value instead."""
    members = _public_members()
    invocable = {name: value for name, value in members.items() if _invocable(value)}
    if invocable:
        return {name: _invoke(invocable[name]) for name in sorted(invocable)}

    if members:
        return {name: str(members[name]) for name in sorted(members)}

    return {"message": EMPTY_MESSAGE}


@app.route("/")
def index():
    return jsonify(report())


if __name__ == "__main__":
    app.run(host="0.0.0.0", port=int(os.environ.get("PORT", "%PORT%")))
"#;
