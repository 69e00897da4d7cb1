//! Lint check: runs the project's configured lint command.

use tracing::debug;

use super::{Check, CheckResult, GateContext};
use crate::config::CommandSpec;

/// Hard gate around the lint command (default `npm run lint`).
///
/// Lint results are deterministic for a given working tree, so there is no
/// retry.
pub struct LintGate {
    command: CommandSpec,
}

impl LintGate {
    pub fn new(command: CommandSpec) -> Self {
        Self { command }
    }
}

impl Check for LintGate {
    fn name(&self) -> &str {
        "Lint"
    }

    fn is_blocking(&self) -> bool {
        true
    }

    fn run(&self, ctx: &GateContext<'_>) -> Vec<CheckResult> {
        let shown = self.command.display();
        debug!(command = %shown, "Running lint");

        let result = match ctx.runner.run(&self.command) {
            Ok(output) if output.success() => {
                CheckResult::pass(self.name(), format!("{shown} passed"))
            }
            Ok(output) => {
                let code = output
                    .exit_code
                    .map_or_else(|| "a signal".to_string(), |c| format!("code {c}"));
                CheckResult::fail(self.name(), format!("{shown} exited with {code}"))
                    .with_output(output.combined())
            }
            Err(e) => CheckResult::fail(self.name(), format!("could not run {shown}: {e}")),
        };

        vec![result]
    }
}
