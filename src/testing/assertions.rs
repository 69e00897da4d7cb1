//! Custom assertions for domain-specific testing.
//!
//! Provides expressive assertions for check results and gate outcomes.

use crate::quality::{CheckResult, CheckStatus, GateOutcome};

/// Assert that a check result passed.
///
/// # Panics
///
/// Panics with a descriptive message if the check warned or failed.
///
/// # Example
///
/// ```rust,ignore
/// let results = LintGate::new(command).run(&ctx);
/// assert_check_passed(&results[0]);
/// ```
pub fn assert_check_passed(result: &CheckResult) {
    assert_eq!(
        result.status,
        CheckStatus::Pass,
        "Expected '{}' to pass, but got: {}\nFindings: {:?}",
        result.name,
        result.summary(),
        result.findings
    );
}

/// Assert that a check result is an advisory warning.
///
/// # Panics
///
/// Panics if the check passed or failed.
pub fn assert_check_warned(result: &CheckResult) {
    assert_eq!(
        result.status,
        CheckStatus::Warn,
        "Expected '{}' to warn, but got: {}",
        result.name,
        result.summary()
    );
}

/// Assert that a check result failed.
///
/// # Panics
///
/// Panics if the check didn't fail.
pub fn assert_check_failed(result: &CheckResult) {
    assert_eq!(
        result.status,
        CheckStatus::Fail,
        "Expected '{}' to fail, but got: {}",
        result.name,
        result.summary()
    );
}

/// Assert that a result has a finding mentioning `substring`.
///
/// # Panics
///
/// Panics if no finding contains the substring.
pub fn assert_finding_contains(result: &CheckResult, substring: &str) {
    assert!(
        result
            .findings
            .iter()
            .any(|f| f.format().contains(substring)),
        "Expected a finding containing '{}' in '{}', got: {:?}",
        substring,
        result.name,
        result.findings
    );
}

/// Assert that the outcome is blocked by exactly the named checks.
///
/// # Panics
///
/// Panics if the outcome isn't blocked or the failing checks differ.
pub fn assert_blocked_by(outcome: &GateOutcome, names: &[&str]) {
    let failed: Vec<&str> = outcome.failures().iter().map(|r| r.name.as_str()).collect();
    assert!(outcome.blocked, "Expected outcome to be blocked");
    assert_eq!(
        failed, names,
        "Expected commit to be blocked by {:?}, but got {:?}",
        names, failed
    );
}

/// Assert that the outcome allows the commit.
///
/// # Panics
///
/// Panics if any check failed.
pub fn assert_allowed(outcome: &GateOutcome) {
    assert!(
        !outcome.blocked,
        "Expected commit to be allowed, but got:\n{}",
        outcome.format()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::Finding;

    #[test]
    fn test_assert_check_passed_succeeds() {
        assert_check_passed(&CheckResult::pass("Lint", "ok"));
    }

    #[test]
    #[should_panic(expected = "Expected 'Lint' to pass")]
    fn test_assert_check_passed_fails() {
        assert_check_passed(&CheckResult::fail("Lint", "exited with code 1"));
    }

    #[test]
    fn test_assert_check_warned_succeeds() {
        assert_check_warned(&CheckResult::warn("Docs", "reminder"));
    }

    #[test]
    #[should_panic(expected = "to fail")]
    fn test_assert_check_failed_fails() {
        assert_check_failed(&CheckResult::warn("Coverage", "unknown"));
    }

    #[test]
    fn test_assert_finding_contains_succeeds() {
        let result = CheckResult::warn("Debug statements", "found 1")
            .with_findings(vec![Finding::at("src/app.js", 2, "console.log")]);
        assert_finding_contains(&result, "src/app.js:2");
    }

    #[test]
    #[should_panic(expected = "Expected a finding containing")]
    fn test_assert_finding_contains_fails() {
        assert_finding_contains(&CheckResult::pass("Debug statements", "clean"), "src/app.js");
    }
}
