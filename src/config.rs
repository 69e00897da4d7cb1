//! Configuration management for hookgate.
//!
//! Configuration lives in `.hookgate.toml` at the project root. Every key is
//! optional; missing keys fall back to the defaults below. Thresholds can be
//! overridden from the command line or environment via [`ConfigOverrides`].
//!
//! ```toml
//! [coverage]
//! min_overall = 70
//!
//! [scan]
//! forbidden_patterns = ["console.log", "debugger"]
//! ```

use crate::error::{GateError, Result};
use globset::Glob;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = ".hookgate.toml";

/// Default minimum aggregate coverage, in percent.
pub const DEFAULT_MIN_OVERALL_COVERAGE: u32 = 60;

/// Default per-file coverage below which a file is flagged, in percent.
pub const DEFAULT_MIN_FILE_COVERAGE: u32 = 20;

/// Default minimum commit message length, in characters.
pub const DEFAULT_MIN_MESSAGE_LENGTH: usize = 10;

// ============================================================================
// Command Specification
// ============================================================================

/// An external command: program plus arguments.
///
/// Serialized as a plain array, e.g. `["npm", "run", "lint"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Build a command from a program and its arguments.
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    /// Shell-like rendering for display.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TryFrom<Vec<String>> for CommandSpec {
    type Error = String;

    fn try_from(mut parts: Vec<String>) -> std::result::Result<Self, Self::Error> {
        if parts.is_empty() || parts[0].trim().is_empty() {
            return Err("command must name a program".to_string());
        }
        let program = parts.remove(0);
        Ok(Self {
            program,
            args: parts,
        })
    }
}

impl From<CommandSpec> for Vec<String> {
    fn from(spec: CommandSpec) -> Self {
        std::iter::once(spec.program).chain(spec.args).collect()
    }
}

// ============================================================================
// Sections
// ============================================================================

/// `[lint]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    pub command: CommandSpec,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            command: CommandSpec::new("npm", &["run", "lint"]),
        }
    }
}

/// `[coverage]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoverageConfig {
    pub command: CommandSpec,
    /// Blocking threshold for the truncated aggregate percentage.
    pub min_overall: u32,
    /// Advisory threshold for individual files.
    pub min_per_file: u32,
    /// Leading label of the aggregate line.
    pub aggregate_label: String,
    /// Path prefix that marks per-file lines.
    pub source_prefix: String,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            command: CommandSpec::new("npm", &["run", "test:coverage"]),
            min_overall: DEFAULT_MIN_OVERALL_COVERAGE,
            min_per_file: DEFAULT_MIN_FILE_COVERAGE,
            aggregate_label: "All files".to_string(),
            source_prefix: "src/".to_string(),
        }
    }
}

/// How far the doc-comment heuristic looks back from a function declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocLookback {
    /// Only the line immediately above the declaration.
    #[default]
    Adjacent,
    /// The nearest non-blank line above the declaration.
    SkipBlank,
}

/// `[scan]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    pub source_globs: Vec<String>,
    pub test_globs: Vec<String>,
    /// Plain substrings, not regexes.
    pub forbidden_patterns: Vec<String>,
    pub doc_lookback: DocLookback,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            source_globs: vec!["*.js".to_string(), "*.jsx".to_string()],
            test_globs: vec!["*.test.*".to_string(), "*.spec.*".to_string()],
            forbidden_patterns: vec!["console.log".to_string()],
            doc_lookback: DocLookback::Adjacent,
        }
    }
}

/// `[docs]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    /// Staged paths matching these count as a documentation update.
    pub doc_globs: Vec<String>,
    /// Root scanned by `hookgate docs`.
    pub source_dir: PathBuf,
    /// Output file written by `hookgate docs`.
    pub output: PathBuf,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            doc_globs: vec!["*.md".to_string()],
            source_dir: PathBuf::from("src"),
            output: PathBuf::from("docs/API.md"),
        }
    }
}

/// `[commit_msg]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommitMsgConfig {
    pub min_length: usize,
    pub skip_prefixes: Vec<String>,
    pub generic_words: Vec<String>,
    /// Drop `#` comment lines before checking. The hook sees the message
    /// file before git's own cleanup, so editor templates are still in it.
    pub strip_comments: bool,
}

impl Default for CommitMsgConfig {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_MESSAGE_LENGTH,
            skip_prefixes: vec!["Merge".to_string(), "Revert".to_string()],
            generic_words: ["wip", "test", "fix", "temp", "asdf", "todo", "hack", "debug"]
                .iter()
                .map(|w| (*w).to_string())
                .collect(),
            strip_comments: false,
        }
    }
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Effective hookgate configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    pub lint: LintConfig,
    pub coverage: CoverageConfig,
    pub scan: ScanConfig,
    pub docs: DocsConfig,
    pub commit_msg: CommitMsgConfig,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub min_overall: Option<u32>,
    pub min_per_file: Option<u32>,
    pub min_length: Option<usize>,
}

impl GateConfig {
    /// Path of the config file for a project directory.
    pub fn config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_FILE_NAME)
    }

    /// Parse and validate configuration text.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed TOML, unknown keys or invalid values.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: GateConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration for a project.
    ///
    /// An explicit path must exist. Without one, `.hookgate.toml` in the
    /// project directory is used when present, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or is invalid.
    pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(GateError::config_with_path(
                    format!("config file not found: {}", path.display()),
                    path.to_path_buf(),
                ));
            }
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::config_path(project_dir);
                if !path.exists() {
                    debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                    return Ok(Self::default());
                }
                path
            }
        };

        debug!(path = %path.display(), "Loading configuration");
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content).map_err(|e| match e {
            GateError::Toml(err) => GateError::config_with_path(err.to_string(), path),
            other => other,
        })
    }

    /// Apply command-line/environment overrides and re-validate.
    ///
    /// # Errors
    ///
    /// Returns an error if an override produces an invalid configuration.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self> {
        if let Some(min) = overrides.min_overall {
            self.coverage.min_overall = min;
        }
        if let Some(min) = overrides.min_per_file {
            self.coverage.min_per_file = min;
        }
        if let Some(min) = overrides.min_length {
            self.commit_msg.min_length = min;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check value ranges and glob syntax.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.coverage.min_overall > 100 {
            return Err(GateError::invalid_config(
                "coverage.min_overall",
                "must be at most 100",
            ));
        }
        if self.coverage.min_per_file > 100 {
            return Err(GateError::invalid_config(
                "coverage.min_per_file",
                "must be at most 100",
            ));
        }
        if self.coverage.aggregate_label.trim().is_empty() {
            return Err(GateError::invalid_config(
                "coverage.aggregate_label",
                "must not be empty",
            ));
        }
        if self.commit_msg.min_length == 0 {
            return Err(GateError::invalid_config(
                "commit_msg.min_length",
                "must be greater than zero",
            ));
        }
        if self.scan.forbidden_patterns.iter().any(|p| p.is_empty()) {
            return Err(GateError::invalid_config(
                "scan.forbidden_patterns",
                "patterns must not be empty",
            ));
        }

        let glob_fields = [
            ("scan.source_globs", &self.scan.source_globs),
            ("scan.test_globs", &self.scan.test_globs),
            ("docs.doc_globs", &self.docs.doc_globs),
        ];
        for (field, globs) in glob_fields {
            for glob in globs {
                Glob::new(glob)
                    .map_err(|e| GateError::invalid_config(field, format!("{glob}: {e}")))?;
            }
        }

        Ok(())
    }
}
