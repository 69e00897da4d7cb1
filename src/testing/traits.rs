//! Trait definitions for testable abstractions.
//!
//! These traits abstract the gate's external collaborators (git, the lint
//! and test commands, the working tree) so the orchestration logic can be
//! unit tested without a real repository or Node toolchain.

use anyhow::Result;

use crate::config::CommandSpec;

/// Abstraction over the version-control index.
///
/// # Example
///
/// ```rust,ignore
/// use hookgate::testing::Vcs;
///
/// fn has_staged_changes(vcs: &impl Vcs) -> bool {
///     vcs.staged_files().map(|f| !f.is_empty()).unwrap_or(false)
/// }
/// ```
pub trait Vcs {
    /// Paths staged for the next commit, in the order git reports them.
    ///
    /// # Errors
    ///
    /// Returns an error if git is not available or not in a repository.
    fn staged_files(&self) -> Result<Vec<String>>;
}

/// Captured result of an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stdout.
    #[must_use]
    pub fn failed(exit_code: i32, stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Add stderr text.
    #[must_use]
    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    /// True when the command exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout followed by stderr.
    #[must_use]
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}

/// Abstraction for running the project's external tools.
///
/// Implementations block until the command exits. There is no timeout.
pub trait CommandRunner {
    /// Run a command and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error only if the command could not be started. A
    /// non-zero exit is reported through [`CommandOutput::exit_code`].
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput>;
}

/// Read-only view of the working tree.
pub trait FileSystem {
    /// Read a file, relative to the project root, as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist or isn't valid UTF-8.
    fn read_to_string(&self, path: &str) -> Result<String>;
}
