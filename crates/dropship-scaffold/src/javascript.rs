//! JavaScript templates: Express wrapper, package.json, Dockerfile.
//!
//! The wrapper is written as CommonJS (`server.cjs`) and loads the
//! submission with dynamic `import()`, so it works whether the submission
//! is CommonJS or an ES module.

use dropship_core::{DeploymentId, ScaffoldedProject};
use serde_json::{Map, Value, json};

use crate::docker::{self, DockerSpec};
use crate::{EMPTY_MODULE_MESSAGE, INTERNAL_PORT, NEEDS_ARGUMENTS, ScaffoldError, Trigger};

pub const ENTRY_POINT: &str = "index.js";
pub const WRAPPER: &str = "server.cjs";
pub const MANIFEST: &str = "package.json";
pub const BASE_IMAGE: &str = "node:20-slim";

const BASE_PACKAGES: &[(&str, &str)] = &[("express", "^4.19.2")];

const SERVICE_MARKERS: &[&str] = &[
    "require('express')",
    "require(\"express\")",
    "from 'express'",
    "from \"express\"",
    "require('http')",
    "require(\"http\")",
    "require('node:http')",
    "require(\"node:http\")",
    "from 'http'",
    "from \"http\"",
    "from 'node:http'",
    "from \"node:http\"",
    "createServer(",
    ".listen(",
];

const TRIGGERS: &[Trigger] = &[
    Trigger { marker: "axios", packages: &[("axios", "^1.7.2")] },
    Trigger { marker: "node-fetch", packages: &[("node-fetch", "^2.7.0")] },
    Trigger { marker: "lodash", packages: &[("lodash", "^4.17.21")] },
    Trigger { marker: "danfojs", packages: &[("danfojs-node", "^1.1.2")] },
    Trigger { marker: "dayjs", packages: &[("dayjs", "^1.11.11")] },
];

pub fn is_self_hosted(source: &str) -> bool {
    SERVICE_MARKERS.iter().any(|m| source.contains(m))
}

/// Whether the submission uses ES module syntax at the top level.
pub fn uses_esm(source: &str) -> bool {
    source.lines().map(str::trim_start).any(|line| {
        line.starts_with("export ")
            || (line.starts_with("import ") && line.contains(" from "))
            || line.starts_with("import '")
            || line.starts_with("import \"")
    })
}

pub fn scaffold(source: &str, id: &DeploymentId) -> Result<ScaffoldedProject, ScaffoldError> {
    let self_hosted = is_self_hosted(source);
    let run = if self_hosted { ENTRY_POINT } else { WRAPPER };
    let mut project = ScaffoldedProject::new();

    project.insert(ENTRY_POINT, source);
    if !self_hosted {
        project.insert(WRAPPER, generate_wrapper());
    }
    project.insert(MANIFEST, generate_package_json(source, id, run)?);
    project.insert(
        crate::DOCKERFILE,
        docker::render(&DockerSpec {
            image: BASE_IMAGE,
            manifest: MANIFEST,
            install: "npm install --omit=dev",
            cmd: &["node", run],
        }),
    );
    project.insert(crate::HOSTING_CONFIG, crate::hosting::render(id)?);

    Ok(project)
}

/// package.json with base dependencies plus whatever the triggers add.
///
/// `serde_json::Map` keeps keys sorted, so output is stable.
pub fn generate_package_json(
    source: &str,
    id: &DeploymentId,
    run: &str,
) -> Result<String, ScaffoldError> {
    let mut deps = Map::new();
    for (name, version) in BASE_PACKAGES
        .iter()
        .copied()
        .chain(crate::triggered_packages(source, TRIGGERS))
    {
        deps.entry(name)
            .or_insert_with(|| Value::String(version.to_string()));
    }

    let mut pkg = json!({
        "name": id.app_name(),
        "version": "1.0.0",
        "private": true,
        "main": ENTRY_POINT,
        "scripts": { "start": format!("node {run}") },
        "engines": { "node": ">=20" },
        "dependencies": deps,
    });
    if uses_esm(source) {
        pkg["type"] = json!("module");
    }

    let mut out = serde_json::to_string_pretty(&pkg).map_err(|e| ScaffoldError::Render {
        file: MANIFEST,
        reason: e.to_string(),
    })?;
    out.push('\n');
    Ok(out)
}

/// Express service that loads `index.js` and reports on its exports.
pub fn generate_wrapper() -> String {
    WRAPPER_TEMPLATE
        .replace("%NEEDS_ARGUMENTS%", NEEDS_ARGUMENTS)
        .replace("%EMPTY_MESSAGE%", EMPTY_MODULE_MESSAGE)
        .replace("%PORT%", &INTERNAL_PORT.to_string())
}

const WRAPPER_TEMPLATE: &str = r#"// Generated by dropship. Serves index.js over HTTP.
const path = require("path");
const { pathToFileURL } = require("url");
const express = require("express");

const NEEDS_ARGUMENTS = "%NEEDS_ARGUMENTS%";
const EMPTY_MESSAGE = "%EMPTY_MESSAGE%";

function flattenExports(namespace) {
  const out = {};
  for (const [name, value] of Object.entries(namespace)) {
    if (name === "default" && value !== null && typeof value === "object") {
      Object.assign(out, value);
    } else {
      out[name] = value;
    }
  }
  return out;
}

function isClass(value) {
  return /^class[\s{]/.test(Function.prototype.toString.call(value));
}

async function invoke(fn) {
  if (fn.length > 0) {
    return NEEDS_ARGUMENTS;
  }
  try {
    return String(isClass(fn) ? new fn() : await fn());
  } catch (err) {
    return `<error: ${err && err.message ? err.message : err}>`;
  }
}

async function loadExports() {
  const entry = pathToFileURL(path.join(__dirname, "index.js")).href;
  return flattenExports(await import(entry));
}

// Exported functions and classes are called with no arguments (classes
// through `new`). Without any, every public export is reported by value.
async function report(exported) {
  const names = Object.keys(exported)
    .filter((name) => !name.startsWith("_"))
    .sort();

  const invocable = names.filter((name) => typeof exported[name] === "function");
  if (invocable.length > 0) {
    const results = {};
    for (const name of invocable) {
      results[name] = await invoke(exported[name]);
    }
    return results;
  }

  if (names.length > 0) {
    const values = {};
    for (const name of names) {
      values[name] = String(exported[name]);
    }
    return values;
  }

  return { message: EMPTY_MESSAGE };
}

async function main() {
  const exported = await loadExports();
  const app = express();

  app.get("/", async (req, res) => {
    res.json(await report(exported));
  });

  const port = Number(process.env.PORT || "%PORT%");
  app.listen(port, "0.0.0.0", () => {
    console.log(`dropship wrapper listening on ${port}`);
  });
}

module.exports = { loadExports, report };

if (require.main === module) {
  main().catch((err) => {
    console.error(err);
    process.exit(1);
  });
}
"#;
