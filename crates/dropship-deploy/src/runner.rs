//! External process execution.
//!
//! All tool invocations go through [`CommandSpec`], which keeps arguments as
//! discrete argv elements (never a shell string), and a [`CommandRunner`],
//! which tests replace with a recording fake.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::ToolError;

/// A command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    /// Arguments as discrete elements, not shell strings.
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Arguments as lossy UTF-8, for logging and assertions.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    pub fn program_lossy(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code; `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Most useful text for an error message: stderr, else stdout.
    pub fn failure_detail(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion. A non-zero exit is an `Ok` output with
    /// `success == false`; only failing to run at all is an error.
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ToolError>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill and fail any process that runs longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ToolError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).kill_on_drop(true);
        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }

        debug!(program = %spec.program_lossy(), args = ?spec.args_lossy(), "running command");

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| ToolError::Timeout {
                    program: spec.program_lossy(),
                    limit,
                })?,
            None => cmd.output().await,
        }
        .map_err(|source| ToolError::Spawn {
            program: spec.program_lossy(),
            source,
        })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_builder_keeps_discrete_args() {
        let spec = CommandSpec::new("flyctl")
            .arg("launch")
            .args(["--name", "app one"])
            .cwd("/tmp/x");
        assert_eq!(spec.program_lossy(), "flyctl");
        assert_eq!(spec.args_lossy(), vec!["launch", "--name", "app one"]);
        assert_eq!(spec.cwd, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn failure_detail_prefers_stderr() {
        let out = CommandOutput {
            stdout: "out".into(),
            stderr: "  err\n".into(),
            ..Default::default()
        };
        assert_eq!(out.failure_detail(), "err");
        let out = CommandOutput {
            stdout: "only stdout\n".into(),
            ..Default::default()
        };
        assert_eq!(out.failure_detail(), "only stdout");
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let runner = ProcessRunner::new();
        let err = runner
            .run(&CommandSpec::new("dropship-definitely-not-installed"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_exit_status_and_output() {
        let runner = ProcessRunner::new();
        let out = runner
            .run(&CommandSpec::new("sh").args(["-c", "echo hi; echo oops >&2; exit 3"]))
            .await
            .unwrap();
        assert!(!out.success);
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stdout.trim(), "hi");
        assert_eq!(out.failure_detail(), "oops");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "").unwrap();
        let out = ProcessRunner::new()
            .run(&CommandSpec::new("ls").cwd(dir.path()))
            .await
            .unwrap();
        assert!(out.success);
        assert!(out.stdout.contains("marker.txt"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_kills_slow_process() {
        let runner = ProcessRunner::with_timeout(Some(Duration::from_millis(100)));
        let err = runner
            .run(&CommandSpec::new("sleep").arg("5"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { .. }));
        assert_eq!(err.to_string(), "sleep timed out after 100ms");
    }
}
