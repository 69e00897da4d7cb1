//! Pre-commit gate orchestration.
//!
//! The [`PreCommitGate`] runs every check in a fixed order and folds the
//! results into a single [`GateOutcome`].
//!
//! # Example
//!
//! ```rust,ignore
//! use hookgate::operations::{GitCli, ProcessRunner, RealFileSystem};
//! use hookgate::quality::PreCommitGate;
//!
//! let outcome = PreCommitGate::new(&config, &git, &runner, &fs)
//!     .run_with(|result| println!("{}", result.summary()))?;
//! std::process::exit(outcome.exit_code());
//! ```

use serde::Serialize;
use tracing::{debug, info};

use super::files::{FileClassifier, StagedFileSet};
use super::gates::{
    Check, CheckResult, CheckStatus, CoverageGate, DebugPrintScan, DocCommentScan,
    DocUpdateCheck, GateContext, LintGate,
};
use crate::config::GateConfig;
use crate::error::Result;
use crate::testing::{CommandRunner, FileSystem, Vcs};

// ============================================================================
// Gate Stages
// ============================================================================

/// Position of the orchestrator in its run.
///
/// Transitions are unconditional: every stage is visited exactly once, in
/// order, whatever the earlier stages reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStage {
    Idle,
    LintChecked,
    PatternChecked,
    CoverageChecked,
    DocChecked,
    Done,
}

impl GateStage {
    /// The stage after this one. `Done` is terminal.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::LintChecked,
            Self::LintChecked => Self::PatternChecked,
            Self::PatternChecked => Self::CoverageChecked,
            Self::CoverageChecked => Self::DocChecked,
            Self::DocChecked | Self::Done => Self::Done,
        }
    }
}

// ============================================================================
// Gate Outcome
// ============================================================================

/// Aggregated result of one pre-commit run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateOutcome {
    /// True if any result failed.
    pub blocked: bool,
    /// Summary lines of the advisory results.
    pub warnings: Vec<String>,
    /// Every result, in the order it was produced.
    pub results: Vec<CheckResult>,
}

impl GateOutcome {
    fn from_results(results: Vec<CheckResult>) -> Self {
        let blocked = results.iter().any(CheckResult::is_fail);
        let warnings = results
            .iter()
            .filter(|r| r.is_warn())
            .map(CheckResult::summary)
            .collect();
        Self {
            blocked,
            warnings,
            results,
        }
    }

    /// Process exit code: 1 if blocked, else 0.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(self.blocked)
    }

    /// Results that block the commit.
    #[must_use]
    pub fn failures(&self) -> Vec<&CheckResult> {
        self.results.iter().filter(|r| r.is_fail()).collect()
    }

    /// Summary banner printed at the end of the run.
    #[must_use]
    pub fn format(&self) -> String {
        let mut output = String::new();
        let passed = self
            .results
            .iter()
            .filter(|r| r.status == CheckStatus::Pass)
            .count();

        output.push_str(&format!(
            "{} passed, {} warning(s), {} failed\n",
            passed,
            self.warnings.len(),
            self.failures().len()
        ));

        if self.blocked {
            let names: Vec<&str> = self.failures().iter().map(|r| r.name.as_str()).collect();
            output.push_str(&format!("❌ Commit blocked by: {}\n", names.join(", ")));
        } else if self.warnings.is_empty() {
            output.push_str("✅ All checks passed\n");
        } else {
            output.push_str("✅ Commit allowed (review the warnings above)\n");
        }

        output
    }
}

// ============================================================================
// Pre-commit Gate
// ============================================================================

/// Runs lint, pattern scans, coverage and the doc reminder in order.
pub struct PreCommitGate<'a> {
    config: &'a GateConfig,
    vcs: &'a dyn Vcs,
    runner: &'a dyn CommandRunner,
    fs: &'a dyn FileSystem,
}

impl<'a> PreCommitGate<'a> {
    pub fn new(
        config: &'a GateConfig,
        vcs: &'a dyn Vcs,
        runner: &'a dyn CommandRunner,
        fs: &'a dyn FileSystem,
    ) -> Self {
        Self {
            config,
            vcs,
            runner,
            fs,
        }
    }

    /// Run every stage and collect the outcome.
    ///
    /// # Errors
    ///
    /// Fails only if the staged file list can't be read or the configured
    /// globs are invalid. Check failures are reported in the outcome.
    pub fn run(&self) -> Result<GateOutcome> {
        self.run_with(|_| {})
    }

    /// Like [`run`](Self::run), handing each result to `observer` as soon as
    /// it is produced.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn run_with<F>(&self, mut observer: F) -> Result<GateOutcome>
    where
        F: FnMut(&CheckResult),
    {
        let classifier = FileClassifier::from_config(self.config)?;
        let staged = StagedFileSet::from_vcs(self.vcs)?;
        info!(files = staged.len(), "Running pre-commit checks");

        let ctx = GateContext {
            config: self.config,
            staged: &staged,
            classifier: &classifier,
            runner: self.runner,
            fs: self.fs,
        };

        let mut results = Vec::new();
        let mut stage = GateStage::Idle;

        while stage != GateStage::Done {
            for check in self.checks_for(stage) {
                for result in run_check(check.as_ref(), &ctx) {
                    observer(&result);
                    results.push(result);
                }
            }
            let next = stage.next();
            debug!(from = ?stage, to = ?next, "Gate stage transition");
            stage = next;
        }

        let outcome = GateOutcome::from_results(results);
        debug!(blocked = outcome.blocked, "Pre-commit run finished");
        Ok(outcome)
    }

    /// Checks performed while leaving `stage`.
    fn checks_for(&self, stage: GateStage) -> Vec<Box<dyn Check>> {
        match stage {
            GateStage::Idle => vec![Box::new(LintGate::new(self.config.lint.command.clone()))],
            GateStage::LintChecked => vec![
                Box::new(DebugPrintScan::new(
                    self.config.scan.forbidden_patterns.clone(),
                )),
                Box::new(DocCommentScan::new(self.config.scan.doc_lookback)),
            ],
            GateStage::PatternChecked => {
                vec![Box::new(CoverageGate::new(self.config.coverage.clone()))]
            }
            GateStage::CoverageChecked => vec![Box::new(DocUpdateCheck)],
            GateStage::DocChecked | GateStage::Done => Vec::new(),
        }
    }
}

/// Run one check, holding advisory checks to `Pass`/`Warn`.
fn run_check(check: &dyn Check, ctx: &GateContext<'_>) -> Vec<CheckResult> {
    let mut results = check.run(ctx);
    if !check.is_blocking() {
        for result in &mut results {
            if result.status == CheckStatus::Fail {
                result.status = CheckStatus::Warn;
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        assert_allowed, assert_blocked_by, assert_check_warned, assert_finding_contains,
        CommandOutput, MockCommandRunner, MockFileSystem, MockVcs,
    };

    const LINT: &str = "npm run lint";
    const COVERAGE: &str = "npm run test:coverage";

    fn coverage_output(pct: &str) -> CommandOutput {
        CommandOutput::ok(format!("All files | {pct} | 50 | 50 | {pct} |\n"))
    }

    struct Fixture {
        config: GateConfig,
        vcs: MockVcs,
        runner: MockCommandRunner,
        fs: MockFileSystem,
    }

    impl Fixture {
        fn new(vcs: MockVcs, runner: MockCommandRunner, fs: MockFileSystem) -> Self {
            Self {
                config: GateConfig::default(),
                vcs,
                runner,
                fs,
            }
        }

        fn run(&self) -> Result<GateOutcome> {
            PreCommitGate::new(&self.config, &self.vcs, &self.runner, &self.fs).run()
        }
    }

    #[test]
    fn test_stage_order() {
        let mut stage = GateStage::Idle;
        let mut visited = vec![stage];
        while stage != GateStage::Done {
            stage = stage.next();
            visited.push(stage);
        }
        assert_eq!(
            visited,
            vec![
                GateStage::Idle,
                GateStage::LintChecked,
                GateStage::PatternChecked,
                GateStage::CoverageChecked,
                GateStage::DocChecked,
                GateStage::Done,
            ]
        );
        assert_eq!(GateStage::Done.next(), GateStage::Done);
    }

    #[test]
    fn test_debug_print_warns_but_allows_commit() {
        let fixture = Fixture::new(
            MockVcs::new().with_staged_files(vec!["src/app.js"]),
            MockCommandRunner::new().with_output(COVERAGE, coverage_output("75")),
            MockFileSystem::new().with_file("src/app.js", "/** App. */\nconsole.log(\"x\");\n"),
        );

        let outcome = fixture.run().unwrap();
        assert_allowed(&outcome);
        assert_eq!(outcome.exit_code(), 0);

        let debug = outcome
            .results
            .iter()
            .find(|r| r.name == "Debug statements")
            .unwrap();
        assert_check_warned(debug);
        assert_eq!(debug.findings.len(), 1);
        assert_finding_contains(debug, "src/app.js:2");
    }

    #[test]
    fn test_lint_failure_blocks_and_later_checks_still_run() {
        let fixture = Fixture::new(
            MockVcs::new().with_staged_files(vec!["src/app.js", "README.md"]),
            MockCommandRunner::new()
                .with_output(LINT, CommandOutput::failed(1, "1 error"))
                .with_output(COVERAGE, coverage_output("95")),
            MockFileSystem::new().with_file("src/app.js", "const a = 1;\n"),
        );

        let outcome = fixture.run().unwrap();
        assert!(outcome.blocked);
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(fixture.runner.calls(), vec![LINT, COVERAGE]);

        let names: Vec<&str> = outcome.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Lint",
                "Debug statements",
                "Documentation",
                "Tests",
                "Coverage",
                "Docs"
            ]
        );
        assert_eq!(outcome.failures().len(), 1);
        assert!(outcome.format().contains("❌ Commit blocked by: Lint"));
    }

    #[test]
    fn test_low_coverage_blocks() {
        let fixture = Fixture::new(
            MockVcs::new().with_staged_files(vec!["src/app.js"]),
            MockCommandRunner::new().with_output(COVERAGE, coverage_output("42.50")),
            MockFileSystem::new().with_file("src/app.js", "const a = 1;\n"),
        );

        let outcome = fixture.run().unwrap();
        assert_blocked_by(&outcome, &["Coverage"]);
        let failure = outcome.failures()[0];
        assert_eq!(failure.name, "Coverage");
        assert_eq!(failure.detail, "Coverage is 42.5% (minimum 60%)");
    }

    #[test]
    fn test_unknown_coverage_does_not_block() {
        let fixture = Fixture::new(
            MockVcs::new().with_staged_files(vec!["package.json"]),
            MockCommandRunner::new().with_output(COVERAGE, CommandOutput::ok("no table")),
            MockFileSystem::new(),
        );

        let outcome = fixture.run().unwrap();
        assert_allowed(&outcome);
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.contains("Could not determine coverage")));
    }

    #[test]
    fn test_runs_are_idempotent() {
        let fixture = Fixture::new(
            MockVcs::new().with_staged_files(vec!["src/app.js", "src/util.js"]),
            MockCommandRunner::new().with_output(COVERAGE, coverage_output("61.2")),
            MockFileSystem::new()
                .with_file("src/app.js", "function a() {}\n")
                .with_file("src/util.js", "console.log(1);\n"),
        );

        let first = fixture.run().unwrap();
        let second = fixture.run().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_staged_listing_failure_is_fatal() {
        let fixture = Fixture::new(
            MockVcs::new().with_error("fatal: not a git repository"),
            MockCommandRunner::new(),
            MockFileSystem::new(),
        );

        let err = fixture.run().unwrap_err();
        assert!(err.to_string().contains("not a git repository"));
        assert!(fixture.runner.calls().is_empty());
    }

    #[test]
    fn test_observer_sees_results_in_order() {
        let fixture = Fixture::new(
            MockVcs::new(),
            MockCommandRunner::new().with_output(COVERAGE, coverage_output("80")),
            MockFileSystem::new(),
        );

        let mut seen = Vec::new();
        let outcome = PreCommitGate::new(&fixture.config, &fixture.vcs, &fixture.runner, &fixture.fs)
            .run_with(|r| seen.push(r.name.clone()))
            .unwrap();

        let names: Vec<String> = outcome.results.iter().map(|r| r.name.clone()).collect();
        assert_eq!(seen, names);
        assert!(outcome.format().contains("✅ All checks passed"));
    }

    struct AlwaysFails;

    impl Check for AlwaysFails {
        fn name(&self) -> &str {
            "Advisory"
        }
        fn is_blocking(&self) -> bool {
            false
        }
        fn run(&self, _ctx: &GateContext<'_>) -> Vec<CheckResult> {
            vec![CheckResult::fail(self.name(), "oops")]
        }
    }

    #[test]
    fn test_advisory_check_never_fails() {
        let config = GateConfig::default();
        let classifier = FileClassifier::from_config(&config).unwrap();
        let staged = StagedFileSet::default();
        let runner = MockCommandRunner::new();
        let fs = MockFileSystem::new();
        let ctx = GateContext {
            config: &config,
            staged: &staged,
            classifier: &classifier,
            runner: &runner,
            fs: &fs,
        };
        let results = run_check(&AlwaysFails, &ctx);
        assert_eq!(results[0].status, CheckStatus::Warn);
    }
}
