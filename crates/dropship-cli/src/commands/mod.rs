pub mod deploy;
pub mod detect;
pub mod scaffold;

use std::path::Path;

use anyhow::Context;

fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
