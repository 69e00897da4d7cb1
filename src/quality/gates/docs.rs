//! Documentation update reminder.

use super::{Check, CheckResult, GateContext};
use crate::quality::files::{FileClassifier, StagedFileSet};

/// Reminder printed when code changes without any documentation change.
pub const DOC_REMINDER: &str =
    "Source files changed but no documentation was updated. Consider updating README.md or docs/.";

/// True if at least one staged path is a source file and none is a
/// documentation file.
pub fn needs_doc_reminder(staged: &StagedFileSet, classifier: &FileClassifier) -> bool {
    !staged.source_files(classifier).is_empty() && !staged.has_docs(classifier)
}

/// Advisory check wrapping [`needs_doc_reminder`].
pub struct DocUpdateCheck;

impl Check for DocUpdateCheck {
    fn name(&self) -> &str {
        "Docs"
    }

    fn is_blocking(&self) -> bool {
        false
    }

    fn run(&self, ctx: &GateContext<'_>) -> Vec<CheckResult> {
        let result = if ctx.staged.source_files(ctx.classifier).is_empty() {
            CheckResult::pass(self.name(), "No source files staged")
        } else if needs_doc_reminder(ctx.staged, ctx.classifier) {
            CheckResult::warn(self.name(), DOC_REMINDER)
        } else {
            CheckResult::pass(self.name(), "Documentation updated")
        };
        vec![result]
    }
}
