//! Real implementations of testable traits.
//!
//! These implementations use actual git, subprocess and file operations.
//! They implement the same traits as the mocks, enabling dependency injection.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

use crate::config::CommandSpec;
use crate::testing::{CommandOutput, CommandRunner, FileSystem, Vcs};

/// Git index access through the `git` CLI.
#[derive(Debug, Clone)]
pub struct GitCli {
    project_dir: PathBuf,
}

impl GitCli {
    /// Create a new git instance for the given directory.
    #[must_use]
    pub fn new(project_dir: PathBuf) -> Self {
        Self { project_dir }
    }
}

impl Vcs for GitCli {
    fn staged_files(&self) -> Result<Vec<String>> {
        let output = Command::new("git")
            .args(["diff", "--cached", "--name-only", "-z", "--diff-filter=ACMR"])
            .current_dir(&self.project_dir)
            .output()
            .context("Failed to run git diff --cached")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("{}", stderr.trim())
        }

        // -z: unquoted paths, NUL-terminated
        Ok(String::from_utf8_lossy(&output.stdout)
            .split('\0')
            .filter(|path| !path.is_empty())
            .map(String::from)
            .collect())
    }
}

/// Runs project tools as blocking subprocesses in the project directory.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    project_dir: PathBuf,
}

impl ProcessRunner {
    #[must_use]
    pub fn new(project_dir: PathBuf) -> Self {
        Self { project_dir }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        let program = which::which_in(
            &command.program,
            std::env::var_os("PATH"),
            &self.project_dir,
        )
        .with_context(|| format!("{} not found on PATH", command.program))?;

        debug!(program = %program.display(), args = ?command.args, "Spawning");

        let output = Command::new(&program)
            .args(&command.args)
            .current_dir(&self.project_dir)
            .output()
            .with_context(|| format!("Failed to run {}", command.display()))?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Working tree rooted at the project directory.
#[derive(Debug, Clone)]
pub struct RealFileSystem {
    root: PathBuf,
}

impl RealFileSystem {
    /// Create a new file system instance rooted at the given directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &str) -> Result<String> {
        let full = self.root.join(path);
        std::fs::read_to_string(&full)
            .with_context(|| format!("Failed to read {}", full.display()))
    }
}
