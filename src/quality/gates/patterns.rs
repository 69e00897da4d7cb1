//! Advisory text scans over staged source files.
//!
//! Both scans are line-oriented heuristics, not parsers. The doc-comment
//! scan in particular only looks at the line directly above a function
//! declaration, so it misses multi-line signatures and flags documented
//! functions separated from their doc block by a blank line. The
//! `skip-blank` lookback mode is an opt-in variant that tolerates blank
//! lines.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use super::{Check, CheckResult, Finding, GateContext};
use crate::config::DocLookback;

/// Token that closes a JSDoc block.
const DOC_BLOCK_CLOSER: &str = "*/";

/// Matches `function`, `async function`, `export function`,
/// `export default async function` and friends at the start of a line.
/// Capture 1 is the function name when present.
pub(crate) fn function_decl_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(?:export\s+(?:default\s+)?)?(?:async\s+)?function\b\s*\*?\s*([A-Za-z_$][\w$]*)?",
        )
        .expect("function declaration regex is valid")
    })
}

/// 1-based line numbers containing any of `patterns`, with the first
/// pattern that matched.
pub fn find_forbidden<'p>(content: &str, patterns: &'p [String]) -> Vec<(u32, &'p str)> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            patterns
                .iter()
                .find(|p| line.contains(p.as_str()))
                .map(|p| ((idx + 1) as u32, p.as_str()))
        })
        .collect()
}

/// 1-based line numbers of function declarations without a doc block
/// directly above them.
pub fn undocumented_functions(content: &str, lookback: DocLookback) -> Vec<u32> {
    let lines: Vec<&str> = content.lines().collect();
    let re = function_decl_regex();

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| re.is_match(line))
        .filter(|(idx, _)| !preceded_by_doc_block(&lines, *idx, lookback))
        .map(|(idx, _)| (idx + 1) as u32)
        .collect()
}

fn preceded_by_doc_block(lines: &[&str], idx: usize, lookback: DocLookback) -> bool {
    let mut above = lines[..idx].iter().rev();
    let previous = match lookback {
        DocLookback::Adjacent => above.next(),
        DocLookback::SkipBlank => above.find(|l| !l.trim().is_empty()),
    };
    previous.is_some_and(|l| l.trim_end().ends_with(DOC_BLOCK_CLOSER))
}

// ============================================================================
// Debug Print Scan
// ============================================================================

/// Flags lines in staged source files that contain a forbidden substring
/// (default `console.log`).
pub struct DebugPrintScan {
    patterns: Vec<String>,
}

impl DebugPrintScan {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }
}

impl Check for DebugPrintScan {
    fn name(&self) -> &str {
        "Debug statements"
    }

    fn is_blocking(&self) -> bool {
        false
    }

    fn run(&self, ctx: &GateContext<'_>) -> Vec<CheckResult> {
        let mut findings = Vec::new();

        for path in ctx.staged.source_files(ctx.classifier) {
            let content = match ctx.fs.read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    findings.push(Finding::in_file(path, format!("could not read: {e}")));
                    continue;
                }
            };
            for (line, pattern) in find_forbidden(&content, &self.patterns) {
                findings.push(Finding::at(path, line, pattern));
            }
        }

        debug!(matches = findings.len(), "Debug print scan complete");

        let result = if findings.is_empty() {
            CheckResult::pass(self.name(), "No debug statements found")
        } else {
            CheckResult::warn(
                self.name(),
                format!(
                    "Found {} debug statement(s); consider removing them",
                    findings.len()
                ),
            )
            .with_findings(findings)
        };
        vec![result]
    }
}

// ============================================================================
// Doc Comment Scan
// ============================================================================

/// Flags function declarations in staged, non-test source files that are
/// not immediately preceded by a closed doc block.
pub struct DocCommentScan {
    lookback: DocLookback,
}

impl DocCommentScan {
    pub fn new(lookback: DocLookback) -> Self {
        Self { lookback }
    }
}

impl Check for DocCommentScan {
    fn name(&self) -> &str {
        "Documentation"
    }

    fn is_blocking(&self) -> bool {
        false
    }

    fn run(&self, ctx: &GateContext<'_>) -> Vec<CheckResult> {
        let mut findings = Vec::new();

        let files = ctx
            .staged
            .source_files(ctx.classifier)
            .into_iter()
            .filter(|p| !ctx.classifier.is_test(p));

        for path in files {
            let content = match ctx.fs.read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    findings.push(Finding::in_file(path, format!("could not read: {e}")));
                    continue;
                }
            };
            for line in undocumented_functions(&content, self.lookback) {
                findings.push(Finding::at(path, line, "missing documentation"));
            }
        }

        let result = if findings.is_empty() {
            CheckResult::pass(self.name(), "All function declarations are documented")
        } else {
            CheckResult::warn(
                self.name(),
                format!("{} function(s) may be missing documentation", findings.len()),
            )
            .with_findings(findings)
        };
        vec![result]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateConfig;
    use crate::quality::{CheckStatus, FileClassifier, StagedFileSet};
    use crate::testing::{MockCommandRunner, MockFileSystem};

    fn patterns() -> Vec<String> {
        vec!["console.log".to_string()]
    }

    #[test]
    fn test_find_forbidden_reports_line_numbers() {
        let content = "const a = 1;\nconsole.log(a);\nfoo();\n  console.log('x')\n";
        let patterns = patterns();
        let hits = find_forbidden(content, &patterns);
        assert_eq!(hits, vec![(2, "console.log"), (4, "console.log")]);
    }

    #[test]
    fn test_find_forbidden_is_substring_match() {
        let patterns = patterns();
        let hits = find_forbidden("logger.info(x); // console.log removed", &patterns);
        assert_eq!(hits.len(), 1);
        assert!(find_forbidden("console.error(x)", &patterns).is_empty());
    }

    #[test]
    fn test_documented_function_not_reported() {
        let content = "/**\n * Adds.\n */\nfunction add(a, b) {\n  return a + b;\n}\n";
        assert!(undocumented_functions(content, DocLookback::Adjacent).is_empty());
    }

    #[test]
    fn test_declaration_variants_detected() {
        let content = "\
function a() {}
async function b() {}
export function c() {}
export async function d() {}
export default function () {}
const e = function () {};
";
        assert_eq!(
            undocumented_functions(content, DocLookback::Adjacent),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn test_blank_line_between_doc_and_function_is_flagged() {
        let content = "/** Doc. */\n\nfunction spaced() {}\n";
        assert_eq!(undocumented_functions(content, DocLookback::Adjacent), vec![3]);
    }

    #[test]
    fn test_skip_blank_lookback_tolerates_blank_lines() {
        let content = "/** Doc. */\n\n\nfunction spaced() {}\n";
        assert!(undocumented_functions(content, DocLookback::SkipBlank).is_empty());
    }

    #[test]
    fn test_line_comment_is_not_a_doc_block() {
        let content = "// helper\nfunction helper() {}\n";
        assert_eq!(undocumented_functions(content, DocLookback::Adjacent), vec![2]);
    }

    #[test]
    fn test_doc_closer_with_trailing_whitespace() {
        let content = " */   \nfunction f() {}\n";
        assert!(undocumented_functions(content, DocLookback::Adjacent).is_empty());
    }

    #[test]
    fn test_function_name_capture() {
        let caps = function_decl_regex()
            .captures("export async function fetchUser(id) {")
            .unwrap();
        assert_eq!(caps.get(1).map(|m| m.as_str()), Some("fetchUser"));
        assert!(!function_decl_regex().is_match("const functional = true;"));
    }

    fn scan_ctx_run(check: &dyn Check, staged: Vec<&str>, fs: &MockFileSystem) -> CheckResult {
        let config = GateConfig::default();
        let classifier = FileClassifier::from_config(&config).unwrap();
        let staged = StagedFileSet::new(staged.into_iter().map(String::from).collect());
        let runner = MockCommandRunner::new();
        let ctx = GateContext {
            config: &config,
            staged: &staged,
            classifier: &classifier,
            runner: &runner,
            fs,
        };
        let mut results = check.run(&ctx);
        assert_eq!(results.len(), 1);
        results.remove(0)
    }

    #[test]
    fn test_debug_scan_warns_with_locations() {
        let fs = MockFileSystem::new()
            .with_file("src/app.js", "const x = 1;\nconsole.log(\"x\");\n")
            .with_file("README.md", "console.log in docs is fine\n");
        let result = scan_ctx_run(
            &DebugPrintScan::new(patterns()),
            vec!["src/app.js", "README.md"],
            &fs,
        );
        assert_eq!(result.status, CheckStatus::Warn);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].location(), "src/app.js:2");
    }

    #[test]
    fn test_debug_scan_passes_clean_files() {
        let fs = MockFileSystem::new().with_file("src/app.js", "export default 1;\n");
        let result = scan_ctx_run(&DebugPrintScan::new(patterns()), vec!["src/app.js"], &fs);
        assert_eq!(result.status, CheckStatus::Pass);
    }

    #[test]
    fn test_unreadable_file_is_warning_not_panic() {
        let fs = MockFileSystem::new();
        let result = scan_ctx_run(&DebugPrintScan::new(patterns()), vec!["src/gone.js"], &fs);
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(result.findings[0].message.contains("could not read"));
    }

    #[test]
    fn test_doc_scan_skips_test_files() {
        let fs = MockFileSystem::new()
            .with_file("src/app.test.js", "function helper() {}\n")
            .with_file("src/app.spec.jsx", "function helper() {}\n");
        let result = scan_ctx_run(
            &DocCommentScan::new(DocLookback::Adjacent),
            vec!["src/app.test.js", "src/app.spec.jsx"],
            &fs,
        );
        assert_eq!(result.status, CheckStatus::Pass);
    }

    #[test]
    fn test_doc_scan_reports_missing_docs() {
        let fs = MockFileSystem::new().with_file(
            "src/math.js",
            "/** Adds. */\nexport function add(a, b) {}\n\nexport function sub(a, b) {}\n",
        );
        let result = scan_ctx_run(
            &DocCommentScan::new(DocLookback::Adjacent),
            vec!["src/math.js"],
            &fs,
        );
        assert_eq!(result.status, CheckStatus::Warn);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].format(), "src/math.js:4 missing documentation");
    }
}
