//! External process invocation
//!
//! Every call into the Docker binaries or PowerShell goes through
//! [`CommandRunner`] so that success is decided uniformly: exit code 0.

use crate::{Error, Result};
use std::path::Path;
use std::process::Command;

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// One-line description for error messages
    pub fn describe(&self) -> String {
        let code = self
            .code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "none".to_string());
        format!(
            "exit code {}; stderr: {}; stdout: {}",
            code,
            self.stderr.trim(),
            self.stdout.trim()
        )
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run `program` to completion and capture its output.
    ///
    /// A non-zero exit is not an error here; only failing to launch is.
    fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput>;
}

/// Runs processes on the local host
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput> {
        tracing::debug!(program = %program.display(), ?args, "Running command");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|error| Error::Spawn {
                program: program.display().to_string(),
                error,
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

pub const POWERSHELL: &str = "powershell";

/// Arguments for a non-interactive PowerShell invocation of `script`
pub fn powershell_args(script: &str) -> Vec<String> {
    [
        "-NoProfile",
        "-NonInteractive",
        "-ExecutionPolicy",
        "Bypass",
        "-Command",
        script,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Escape string for PowerShell
pub fn escape_ps(s: &str) -> String {
    s.replace('\'', "''")
}
