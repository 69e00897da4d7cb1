//! Test and coverage check.

use tracing::{debug, warn};

use super::{Check, CheckResult, Finding, GateContext};
use crate::config::CoverageConfig;
use crate::quality::coverage::CoverageParser;

/// Runs the test command with coverage and applies the thresholds.
///
/// Produces up to three results:
/// - `Tests` - fails if the command exits non-zero (coverage is then not
///   inspected)
/// - `Coverage` - fails if the truncated aggregate is below `min_overall`,
///   warns if no aggregate could be parsed
/// - `Per-file coverage` - advisory list of files below `min_per_file`
pub struct CoverageGate {
    config: CoverageConfig,
}

impl CoverageGate {
    pub fn new(config: CoverageConfig) -> Self {
        Self { config }
    }
}

impl Check for CoverageGate {
    fn name(&self) -> &str {
        "Coverage"
    }

    fn is_blocking(&self) -> bool {
        true
    }

    fn run(&self, ctx: &GateContext<'_>) -> Vec<CheckResult> {
        let shown = self.config.command.display();
        debug!(command = %shown, "Running tests with coverage");

        let output = match ctx.runner.run(&self.config.command) {
            Ok(output) => output,
            Err(e) => {
                return vec![CheckResult::fail(
                    "Tests",
                    format!("could not run {shown}: {e}"),
                )];
            }
        };

        if !output.success() {
            let code = output
                .exit_code
                .map_or_else(|| "a signal".to_string(), |c| format!("code {c}"));
            return vec![CheckResult::fail(
                "Tests",
                format!("Tests failed ({shown} exited with {code})"),
            )
            .with_output(output.combined())];
        }

        let mut results = vec![CheckResult::pass("Tests", "All tests passed")];

        let parser = match CoverageParser::new(
            &self.config.aggregate_label,
            &self.config.source_prefix,
        ) {
            Ok(parser) => parser,
            Err(e) => {
                warn!(error = %e, "Coverage parser unavailable");
                results.push(CheckResult::warn(
                    self.name(),
                    format!("Could not determine coverage: {e}"),
                ));
                return results;
            }
        };

        let report = parser.parse(&output.combined());
        let min = self.config.min_overall;

        results.push(match (report.overall, report.below_minimum(min)) {
            (Some(pct), Some(true)) => CheckResult::fail(
                self.name(),
                format!("Coverage is {pct}% (minimum {min}%)"),
            ),
            (Some(pct), _) => {
                CheckResult::pass(self.name(), format!("Coverage is {pct}% (minimum {min}%)"))
            }
            (None, _) => {
                warn!("No aggregate coverage line found in test output");
                CheckResult::warn(
                    self.name(),
                    format!(
                        "Could not determine coverage (no '{}' line in test output)",
                        self.config.aggregate_label
                    ),
                )
            }
        });

        let low = report.low_coverage_files(self.config.min_per_file);
        if !low.is_empty() {
            let findings = low
                .iter()
                .map(|(file, pct)| Finding::in_file(*file, format!("{pct}% covered")))
                .collect();
            results.push(
                CheckResult::warn(
                    "Per-file coverage",
                    format!(
                        "{} file(s) below {}% coverage",
                        low.len(),
                        self.config.min_per_file
                    ),
                )
                .with_findings(findings),
            );
        }

        results
    }
}
