//! Individual pre-commit checks.
//!
//! Each check inspects one aspect of the staged change and reports one or
//! more [`CheckResult`]s. Hard checks may report [`CheckStatus::Fail`];
//! advisory checks only ever report `Pass` or `Warn`.
//!
//! # Available Checks
//!
//! - [`LintGate`] - Runs the project's lint command (hard)
//! - [`DebugPrintScan`] - Flags debug prints in staged files (advisory)
//! - [`DocCommentScan`] - Flags undocumented function declarations (advisory)
//! - [`CoverageGate`] - Runs tests with coverage and enforces the minimum (hard)
//! - [`DocUpdateCheck`] - Reminds about docs when only code changed (advisory)

pub mod coverage;
pub mod docs;
pub mod lint;
pub mod patterns;

pub use coverage::CoverageGate;
pub use docs::{needs_doc_reminder, DocUpdateCheck, DOC_REMINDER};
pub use lint::LintGate;
pub use patterns::{find_forbidden, undocumented_functions, DebugPrintScan, DocCommentScan};

use serde::{Deserialize, Serialize};

use super::files::{FileClassifier, StagedFileSet};
use crate::config::GateConfig;
use crate::testing::{CommandRunner, FileSystem};

// ============================================================================
// Check Result Types
// ============================================================================

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    /// Status symbol used in the terminal report.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Pass => "✓",
            Self::Warn => "⚠",
            Self::Fail => "✗",
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Warn => write!(f, "WARN"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// A location-specific observation attached to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub file: String,
    pub line: Option<u32>,
    pub message: String,
}

impl Finding {
    /// Finding at a specific line.
    pub fn at(file: impl Into<String>, line: u32, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
            message: message.into(),
        }
    }

    /// Finding about a whole file.
    pub fn in_file(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
            message: message.into(),
        }
    }

    /// `path:line` or just `path`.
    #[must_use]
    pub fn location(&self) -> String {
        match self.line {
            Some(line) => format!("{}:{}", self.file, line),
            None => self.file.clone(),
        }
    }

    /// Format as a string for display.
    #[must_use]
    pub fn format(&self) -> String {
        if self.message.is_empty() {
            self.location()
        } else {
            format!("{} {}", self.location(), self.message)
        }
    }
}

/// Result reported by a check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<Finding>,
    /// Combined output of the underlying tool, if any.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,
}

impl CheckResult {
    fn new(name: impl Into<String>, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            detail: detail.into(),
            findings: Vec::new(),
            output: String::new(),
        }
    }

    /// Create a passing result.
    pub fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Pass, detail)
    }

    /// Create an advisory result.
    pub fn warn(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Warn, detail)
    }

    /// Create a blocking result.
    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Fail, detail)
    }

    /// Attach findings.
    #[must_use]
    pub fn with_findings(mut self, findings: Vec<Finding>) -> Self {
        self.findings = findings;
        self
    }

    /// Attach raw tool output.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    #[must_use]
    pub fn is_fail(&self) -> bool {
        self.status == CheckStatus::Fail
    }

    #[must_use]
    pub fn is_warn(&self) -> bool {
        self.status == CheckStatus::Warn
    }

    /// One status line, e.g. `✗ Lint: npm run lint exited with code 1`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} {}: {}", self.status.symbol(), self.name, self.detail)
    }
}

// ============================================================================
// Check Trait
// ============================================================================

/// Everything a check may look at during one run.
pub struct GateContext<'a> {
    pub config: &'a GateConfig,
    pub staged: &'a StagedFileSet,
    pub classifier: &'a FileClassifier,
    pub runner: &'a dyn CommandRunner,
    pub fs: &'a dyn FileSystem,
}

/// A single pre-commit check.
///
/// Checks never return errors: a check that can't complete reports an
/// explicit `Fail` (hard checks) or `Warn` (advisory checks) instead.
pub trait Check {
    /// Human-readable name of this check.
    fn name(&self) -> &str;

    /// Whether a failure blocks the commit.
    fn is_blocking(&self) -> bool;

    /// Run the check.
    fn run(&self, ctx: &GateContext<'_>) -> Vec<CheckResult>;
}
