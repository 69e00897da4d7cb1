//! Staged file set and path classification.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GateConfig;
use crate::error::{GateError, Result};
use crate::testing::Vcs;

/// Paths staged for the next commit, in git's order.
///
/// Derived fresh on every run and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedFileSet {
    paths: Vec<String>,
}

impl StagedFileSet {
    /// Wrap an already-known list of paths.
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }

    /// Query the index.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Git`] when the index can't be read. Callers in
    /// the pre-commit path treat this as fatal.
    pub fn from_vcs(vcs: &dyn Vcs) -> Result<Self> {
        let paths = vcs
            .staged_files()
            .map_err(|e| GateError::git("diff --cached", e.to_string()))?;
        debug!(count = paths.len(), "Staged files");
        Ok(Self::new(paths))
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Staged paths that are source files.
    pub fn source_files<'a>(&'a self, classifier: &'a FileClassifier) -> Vec<&'a str> {
        self.paths
            .iter()
            .map(String::as_str)
            .filter(|p| classifier.is_source(p))
            .collect()
    }

    /// True if any staged path is a documentation file.
    pub fn has_docs(&self, classifier: &FileClassifier) -> bool {
        self.paths.iter().any(|p| classifier.is_doc(p))
    }
}

/// Glob-based predicates for source, test and documentation paths.
///
/// Globs match the whole relative path with `*` crossing directory
/// separators, so `*.js` matches `src/app.js`.
#[derive(Debug, Clone)]
pub struct FileClassifier {
    source: GlobSet,
    test: GlobSet,
    docs: GlobSet,
}

impl FileClassifier {
    /// Build from the `[scan]` and `[docs]` sections.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidConfig`] for a malformed glob.
    pub fn from_config(config: &GateConfig) -> Result<Self> {
        Ok(Self {
            source: build_set("scan.source_globs", &config.scan.source_globs)?,
            test: build_set("scan.test_globs", &config.scan.test_globs)?,
            docs: build_set("docs.doc_globs", &config.docs.doc_globs)?,
        })
    }

    pub fn is_source(&self, path: &str) -> bool {
        self.source.is_match(path)
    }

    pub fn is_test(&self, path: &str) -> bool {
        self.test.is_match(path)
    }

    pub fn is_doc(&self, path: &str) -> bool {
        self.docs.is_match(path)
    }
}

fn build_set(field: &str, globs: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        builder.add(
            Glob::new(glob).map_err(|e| GateError::invalid_config(field, format!("{glob}: {e}")))?,
        );
    }
    builder
        .build()
        .map_err(|e| GateError::invalid_config(field, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockVcs;

    fn classifier() -> FileClassifier {
        FileClassifier::from_config(&GateConfig::default()).unwrap()
    }

    #[test]
    fn test_source_globs_cross_directories() {
        let c = classifier();
        assert!(c.is_source("src/app.js"));
        assert!(c.is_source("src/components/Button.jsx"));
        assert!(c.is_source("index.js"));
        assert!(!c.is_source("src/styles.css"));
        assert!(!c.is_source("src/app.json"));
    }

    #[test]
    fn test_test_file_infix() {
        let c = classifier();
        assert!(c.is_test("src/app.test.js"));
        assert!(c.is_test("src/components/Button.spec.jsx"));
        assert!(!c.is_test("src/testing.js"));
        assert!(!c.is_test("src/app.js"));
    }

    #[test]
    fn test_doc_files() {
        let c = classifier();
        assert!(c.is_doc("README.md"));
        assert!(c.is_doc("docs/api/routes.md"));
        assert!(!c.is_doc("src/app.js"));
    }

    #[test]
    fn test_from_vcs_preserves_order() {
        let vcs = MockVcs::new().with_staged_files(vec![
            "src/b.js".to_string(),
            "README.md".to_string(),
            "src/a.js".to_string(),
        ]);
        let staged = StagedFileSet::from_vcs(&vcs).unwrap();
        assert_eq!(staged.len(), 3);
        assert_eq!(staged.source_files(&classifier()), vec!["src/b.js", "src/a.js"]);
        assert!(staged.has_docs(&classifier()));
    }

    #[test]
    fn test_from_vcs_failure_is_git_error() {
        let vcs = MockVcs::new().with_error("fatal: not a git repository");
        let err = StagedFileSet::from_vcs(&vcs).unwrap_err();
        assert!(matches!(err, GateError::Git { .. }));
        assert!(err.to_string().contains("not a git repository"));
    }
}
