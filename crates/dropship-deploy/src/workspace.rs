//! Per-deployment build workspaces.
//!
//! A [`Workspace`] is a directory `<build_root>/<deployment_id>` owned by a
//! single run. It is removed when the guard drops, so every exit path
//! (success, error, panic, or a cancelled future) releases it. Removal
//! failures are logged and never surface as the run's outcome.

use std::fs;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dropship_core::{DeploymentId, ScaffoldedProject};
use tracing::{debug, warn};

use crate::error::WorkspaceError;

#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    /// Create `<root>/<id>`. Fails if that directory already exists.
    pub fn create(root: &Path, id: &DeploymentId) -> Result<Self, WorkspaceError> {
        fs::create_dir_all(root).map_err(|source| WorkspaceError::Create {
            path: root.to_path_buf(),
            source,
        })?;

        let path = root.join(id.as_str());
        match fs::create_dir(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(WorkspaceError::InUse(path));
            }
            Err(source) => return Err(WorkspaceError::Create { path, source }),
        }

        debug!(deployment_id = %id, path = %path.display(), "workspace created");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn remove(&self) -> Result<(), WorkspaceError> {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(WorkspaceError::Cleanup {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        match self.remove() {
            Ok(()) => debug!(path = %self.path.display(), "workspace removed"),
            Err(e) => warn!(error = %e, "workspace cleanup failed"),
        }
    }
}

/// Run `body` inside a fresh workspace for `id`, removing it afterwards.
///
/// The body's result is returned unchanged; a cleanup failure never
/// replaces it.
pub async fn with_workspace<T, E, F, Fut>(
    root: &Path,
    id: &DeploymentId,
    body: F,
) -> Result<T, E>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<WorkspaceError>,
{
    let workspace = Workspace::create(root, id)?;
    let result = body(workspace.path().to_path_buf()).await;
    drop(workspace);
    result
}

/// Write every file of `project` under `dir`.
pub fn write_project(dir: &Path, project: &ScaffoldedProject) -> Result<(), WorkspaceError> {
    for (relative, content) in project.files() {
        let target = dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| WorkspaceError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&target, content).map_err(|source| WorkspaceError::Write {
            path: target.clone(),
            source,
        })?;
    }
    debug!(dir = %dir.display(), files = project.len(), "project written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DeploymentId {
        DeploymentId::parse(s).unwrap()
    }

    #[test]
    fn guard_removes_directory_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let path = {
            let ws = Workspace::create(root.path(), &id("one")).unwrap();
            fs::write(ws.path().join("file.txt"), "x").unwrap();
            fs::create_dir(ws.path().join("nested")).unwrap();
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn create_is_exclusive_per_id() {
        let root = tempfile::tempdir().unwrap();
        let _ws = Workspace::create(root.path(), &id("same")).unwrap();
        let err = Workspace::create(root.path(), &id("same")).unwrap_err();
        assert!(matches!(err, WorkspaceError::InUse(_)));
    }

    #[test]
    fn distinct_ids_get_distinct_directories() {
        let root = tempfile::tempdir().unwrap();
        let a = Workspace::create(root.path(), &id("a")).unwrap();
        let b = Workspace::create(root.path(), &id("b")).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn creates_nested_build_root() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("x").join("y");
        let ws = Workspace::create(&nested, &id("n")).unwrap();
        assert!(ws.path().is_dir());
    }

    #[test]
    fn drop_tolerates_already_removed_directory() {
        let root = tempfile::tempdir().unwrap();
        let ws = Workspace::create(root.path(), &id("gone")).unwrap();
        fs::remove_dir_all(ws.path()).unwrap();
        drop(ws);
    }

    #[test]
    fn write_project_materializes_files() {
        let root = tempfile::tempdir().unwrap();
        let mut project = ScaffoldedProject::new();
        project.insert("main.py", "print(1)");
        project.insert("conf/app.toml", "a = 1");
        write_project(root.path(), &project).unwrap();
        assert_eq!(fs::read_to_string(root.path().join("main.py")).unwrap(), "print(1)");
        assert_eq!(fs::read_to_string(root.path().join("conf/app.toml")).unwrap(), "a = 1");
    }

    #[tokio::test]
    async fn with_workspace_cleans_up_on_success() {
        let root = tempfile::tempdir().unwrap();
        let seen = with_workspace(root.path(), &id("ok"), |dir| async move {
            assert!(dir.is_dir());
            Ok::<_, WorkspaceError>(dir)
        })
        .await
        .unwrap();
        assert!(!seen.exists());
    }

    #[tokio::test]
    async fn with_workspace_cleans_up_on_error() {
        let root = tempfile::tempdir().unwrap();
        let result: Result<(), WorkspaceError> =
            with_workspace(root.path(), &id("err"), |dir| async move {
                Err(WorkspaceError::InUse(dir))
            })
            .await;
        assert!(matches!(result, Err(WorkspaceError::InUse(_))));
        assert!(!root.path().join("err").exists());
        // Same id can be acquired again once released.
        Workspace::create(root.path(), &id("err")).unwrap();
    }
}
