//! hookgate - commit-quality gate for git hooks
//!
//! Runs a project's lint and coverage tooling, scans staged files for
//! discouraged patterns and validates commit messages, blocking the commit
//! only on hard failures.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`config`] - Configuration loading and validation
//! - [`docgen`] - Markdown API reference generation from JSDoc blocks
//! - [`error`] - Custom error types and handling
//! - [`hooks`] - Git hook installation
//! - [`operations`] - Real git, subprocess and file system access
//! - [`quality`] - Pre-commit checks, orchestration and commit message rules
//! - [`testing`] - Testing infrastructure (traits, mocks, assertions)
//!
//! # Example
//!
//! ```rust,ignore
//! use hookgate::operations::{GitCli, ProcessRunner, RealFileSystem};
//! use hookgate::{GateConfig, PreCommitGate};
//!
//! let config = GateConfig::load(project, None)?;
//! let git = GitCli::new(project.to_path_buf());
//! let runner = ProcessRunner::new(project.to_path_buf());
//! let fs = RealFileSystem::new(project.to_path_buf());
//!
//! let outcome = PreCommitGate::new(&config, &git, &runner, &fs).run()?;
//! println!("{}", outcome.format());
//! ```

pub mod config;
pub mod docgen;
pub mod error;
pub mod hooks;
pub mod operations;
pub mod quality;
pub mod testing;

// Re-export commonly used types
pub use error::{GateError, Result};

pub use config::{CommandSpec, ConfigOverrides, GateConfig, CONFIG_FILE_NAME};

pub use quality::{
    check_commit_message, CheckResult, CheckStatus, CommitMessageValidator, CommitMsgReport,
    FileClassifier, Finding, GateOutcome, MessageVerdict, PreCommitGate, StagedFileSet,
};

pub use testing::{CommandOutput, CommandRunner, FileSystem, Vcs};
