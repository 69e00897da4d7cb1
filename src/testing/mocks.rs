//! Mock implementations of testing traits.
//!
//! These mocks provide controllable test doubles for external dependencies,
//! enabling deterministic unit tests.

use super::traits::{CommandOutput, CommandRunner, FileSystem, Vcs};
use crate::config::CommandSpec;
use anyhow::{bail, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock implementation of the version-control index.
///
/// # Example
///
/// ```rust,ignore
/// let vcs = MockVcs::new().with_staged_files(["src/app.js"]);
/// assert_eq!(vcs.staged_files().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockVcs {
    staged: Vec<String>,
    error: Option<String>,
}

impl MockVcs {
    /// Create a new mock with nothing staged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the staged paths.
    #[must_use]
    pub fn with_staged_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.staged = files.into_iter().map(Into::into).collect();
        self
    }

    /// Configure the staged-file query to fail.
    #[must_use]
    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

impl Vcs for MockVcs {
    fn staged_files(&self) -> Result<Vec<String>> {
        match self.error {
            Some(ref error) => bail!("{}", error),
            None => Ok(self.staged.clone()),
        }
    }
}

/// Mock command runner keyed by the rendered command line.
///
/// Unknown commands succeed with empty output. Every invocation is recorded
/// so tests can assert on what ran and in which order.
///
/// # Example
///
/// ```rust,ignore
/// let runner = MockCommandRunner::new()
///     .with_output("npm run lint", CommandOutput::failed(1, "2 problems"));
/// ```
#[derive(Debug, Default)]
pub struct MockCommandRunner {
    outputs: HashMap<String, CommandOutput>,
    spawn_errors: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MockCommandRunner {
    /// Create a new mock where every command succeeds silently.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output for a command line such as `"npm run lint"`.
    #[must_use]
    pub fn with_output(mut self, command: &str, output: CommandOutput) -> Self {
        self.outputs.insert(command.to_string(), output);
        self
    }

    /// Make a command fail to start.
    #[must_use]
    pub fn with_spawn_error(mut self, command: &str, error: &str) -> Self {
        self.spawn_errors
            .insert(command.to_string(), error.to_string());
        self
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        let line = command.display();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(line.clone());
        }

        if let Some(error) = self.spawn_errors.get(&line) {
            bail!("{}", error)
        }

        Ok(self
            .outputs
            .get(&line)
            .cloned()
            .unwrap_or_else(|| CommandOutput::ok("")))
    }
}

/// Mock implementation of the working tree.
///
/// Uses an in-memory HashMap to simulate file storage.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: HashMap<String, String>,
}

impl MockFileSystem {
    /// Create a new empty mock file system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single file.
    #[must_use]
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &str) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("File not found: {}", path))
    }
}
