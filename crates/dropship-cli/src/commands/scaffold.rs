use std::path::Path;

use dropship_core::{DeploymentId, Language};
use dropship_deploy::write_project;

pub fn scaffold(
    path: &Path,
    out: &Path,
    id: Option<&str>,
    lang: Option<&str>,
) -> anyhow::Result<()> {
    let (language, id, files) = scaffold_to(path, out, id, lang)?;
    println!("✓ Scaffolded {language} project {id}");
    for file in files {
        println!("  {}", out.join(file).display());
    }
    Ok(())
}

/// Write the project for `path` into `out`; returns the written paths.
pub fn scaffold_to(
    path: &Path,
    out: &Path,
    id: Option<&str>,
    lang: Option<&str>,
) -> anyhow::Result<(Language, DeploymentId, Vec<String>)> {
    let source = super::read_source(path)?;
    let language = match lang {
        Some(l) => l.parse::<Language>()?,
        None => dropship_detect::classify(&source),
    };
    let id = match id {
        Some(raw) => DeploymentId::parse(raw)?,
        None => DeploymentId::generate(),
    };

    let project = dropship_scaffold::scaffold(language, &source, &id)?;
    std::fs::create_dir_all(out)?;
    write_project(out, &project)?;

    let files = project.paths().into_iter().map(str::to_string).collect();
    Ok((language, id, files))
}
