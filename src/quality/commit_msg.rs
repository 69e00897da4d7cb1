//! Commit message validation for the `commit-msg` hook.
//!
//! Rules, in order:
//!
//! 1. Messages starting with a skip prefix (`Merge`, `Revert`) are accepted
//!    without further checks.
//! 2. Messages shorter than the minimum length are rejected.
//! 3. Messages that are exactly a generic word (`wip`, `fix`, ...) are
//!    accepted with a suggestion.
//!
//! Independently of the verdict, a staged-file doc reminder is computed for
//! accepted messages.
//!
//! Git runs the hook on the raw message file, before it strips `#` comment
//! lines. A message typed in the editor therefore still carries the
//! template comments and is measured with them, unless
//! `commit_msg.strip_comments` is set.

use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

use super::files::{FileClassifier, StagedFileSet};
use super::gates::needs_doc_reminder;
use crate::config::CommitMsgConfig;
use crate::testing::Vcs;

/// Decision for one commit message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum MessageVerdict {
    /// Merge/revert commit, nothing checked.
    Skipped { prefix: String },
    /// Too short.
    Rejected { length: usize, min_length: usize },
    /// Long enough. `generic` is true when the message is a bare generic word.
    Accepted { generic: bool },
}

impl MessageVerdict {
    /// Exit code of the `commit-msg` hook for this verdict.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Rejected { .. } => 1,
            Self::Skipped { .. } | Self::Accepted { .. } => 0,
        }
    }
}

/// Applies the commit message rules.
#[derive(Debug, Clone)]
pub struct CommitMessageValidator {
    config: CommitMsgConfig,
}

impl CommitMessageValidator {
    pub fn new(config: CommitMsgConfig) -> Self {
        Self { config }
    }

    /// Classify a message. The length check runs before the generic-word
    /// check, so a short generic word is rejected, not warned about.
    #[must_use]
    pub fn validate(&self, message: &str) -> MessageVerdict {
        let stripped;
        let message = if self.config.strip_comments {
            stripped = strip_comment_lines(message);
            stripped.as_str()
        } else {
            message
        };

        if let Some(prefix) = self
            .config
            .skip_prefixes
            .iter()
            .find(|p| message.starts_with(p.as_str()))
        {
            debug!(%prefix, "Skipping commit message checks");
            return MessageVerdict::Skipped {
                prefix: prefix.clone(),
            };
        }

        let length = message.chars().count();
        let min_length = self.config.min_length;
        if length < min_length {
            return MessageVerdict::Rejected { length, min_length };
        }

        MessageVerdict::Accepted {
            generic: self.is_generic(message),
        }
    }

    /// True if the trimmed, lowercased message equals a generic word.
    /// Substrings don't count: `wip wip wip` is not generic.
    #[must_use]
    pub fn is_generic(&self, message: &str) -> bool {
        let normalized = message.trim().to_lowercase();
        self.config
            .generic_words
            .iter()
            .any(|w| w.to_lowercase() == normalized)
    }
}

/// Read a commit message file as the hook receives it, dropping trailing
/// newlines.
///
/// # Errors
///
/// Returns an error if the file can't be read.
pub fn read_message_file(path: &Path) -> anyhow::Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read commit message file {}", path.display()))?;
    Ok(raw.trim_end_matches(['\n', '\r']).to_string())
}

/// Line after which `git commit --verbose` appends the diff.
const SCISSORS: &str = "# ------------------------ >8 ------------------------";

/// Remove `#` comment lines and everything below the scissors line, then
/// trailing blank lines.
#[must_use]
pub fn strip_comment_lines(message: &str) -> String {
    let kept: Vec<&str> = message
        .lines()
        .take_while(|line| *line != SCISSORS)
        .filter(|line| !line.starts_with('#'))
        .collect();
    kept.join("\n").trim_end().to_string()
}

/// Example messages printed for generic commit messages.
#[must_use]
pub fn suggestion_block() -> String {
    [
        "Consider a more descriptive commit message, for example:",
        "  feat: add user authentication endpoint",
        "  fix: handle empty cart on checkout",
        "  docs: document the order API",
        "  refactor: extract price calculation into a helper",
        "  test: cover the login form validation",
    ]
    .join("\n")
}

/// Full result of the `commit-msg` hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitMsgReport {
    pub verdict: MessageVerdict,
    /// Whether the doc reminder applies. `None` when it wasn't evaluated:
    /// skipped or rejected messages, or the index couldn't be read.
    pub doc_reminder: Option<bool>,
}

impl CommitMsgReport {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }
}

/// Validate `message` and, for accepted messages, check whether the staged
/// change needs a doc reminder.
///
/// A failure to read the index only skips the reminder.
pub fn check_commit_message(
    message: &str,
    validator: &CommitMessageValidator,
    vcs: &dyn Vcs,
    classifier: &FileClassifier,
) -> CommitMsgReport {
    let verdict = validator.validate(message);

    let doc_reminder = match verdict {
        MessageVerdict::Accepted { .. } => match StagedFileSet::from_vcs(vcs) {
            Ok(staged) => Some(needs_doc_reminder(&staged, classifier)),
            Err(e) => {
                warn!(error = %e, "Could not list staged files; skipping doc reminder");
                None
            }
        },
        MessageVerdict::Skipped { .. } | MessageVerdict::Rejected { .. } => None,
    };

    CommitMsgReport {
        verdict,
        doc_reminder,
    }
}
