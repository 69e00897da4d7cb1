//! Markdown API reference generation from JSDoc blocks.
//!
//! Only `/** ... */` blocks that sit directly above a function declaration
//! are picked up, the same pairing the doc-comment scan checks for. Tags
//! other than `@param` and `@returns`/`@return` are ignored.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::DocsConfig;
use crate::error::{GateError, Result};
use crate::quality::gates::patterns::function_decl_regex;
use crate::quality::FileClassifier;
use crate::testing::FileSystem;

/// Directories never descended into when discovering sources.
const SKIPPED_DIRS: &[&str] = &["node_modules", "coverage", "dist", "build"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocParam {
    pub name: String,
    pub ty: Option<String>,
    pub description: String,
}

/// One documented function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocEntry {
    pub name: String,
    /// 1-based line of the declaration.
    pub line: u32,
    pub summary: String,
    pub params: Vec<DocParam>,
    pub returns: Option<String>,
}

/// Documented functions of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDocs {
    pub path: String,
    pub entries: Vec<DocEntry>,
}

// ============================================================================
// Extraction
// ============================================================================

/// Extract every doc block directly followed by a function declaration.
pub fn extract_doc_entries(content: &str) -> Vec<DocEntry> {
    let lines: Vec<&str> = content.lines().collect();
    let re = function_decl_regex();
    let mut entries = Vec::new();
    let mut idx = 0;

    while idx < lines.len() {
        if !lines[idx].trim_start().starts_with("/**") {
            idx += 1;
            continue;
        }

        let start = idx;
        while idx < lines.len() && !lines[idx].contains("*/") {
            idx += 1;
        }
        if idx >= lines.len() {
            break;
        }
        let block = &lines[start..=idx];
        idx += 1;

        let Some(decl) = lines.get(idx) else {
            break;
        };
        if let Some(caps) = re.captures(decl) {
            let name = caps
                .get(1)
                .map_or_else(|| "default".to_string(), |m| m.as_str().to_string());
            entries.push(parse_block(block, name, (idx + 1) as u32));
        }
    }

    entries
}

fn parse_block(block: &[&str], name: String, line: u32) -> DocEntry {
    let mut summary = Vec::new();
    let mut params = Vec::new();
    let mut returns = None;
    let mut in_tags = false;

    for raw in block {
        let text = clean_line(raw);
        if let Some(rest) = text.strip_prefix("@param") {
            in_tags = true;
            if let Some(param) = parse_param(rest) {
                params.push(param);
            }
        } else if let Some(rest) = text
            .strip_prefix("@returns")
            .or_else(|| text.strip_prefix("@return"))
        {
            in_tags = true;
            let rest = rest.trim();
            if !rest.is_empty() {
                returns = Some(rest.to_string());
            }
        } else if text.starts_with('@') {
            in_tags = true;
        } else if !in_tags && !text.is_empty() {
            summary.push(text);
        }
    }

    DocEntry {
        name,
        line,
        summary: summary.join(" "),
        params,
        returns,
    }
}

/// Strip the comment markers from one doc block line.
fn clean_line(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("/**") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("*/") {
        text = rest;
    }
    let text = text.trim();
    text.strip_prefix('*').unwrap_or(text).trim()
}

/// `{type} name description` or `name description`.
fn parse_param(rest: &str) -> Option<DocParam> {
    let rest = rest.trim();
    let (ty, rest) = match rest.strip_prefix('{') {
        Some(after) => {
            let (ty, tail) = after.split_once('}')?;
            (Some(ty.trim().to_string()), tail.trim_start())
        }
        None => (None, rest),
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().filter(|n| !n.is_empty())?;
    let description = parts
        .next()
        .unwrap_or("")
        .trim()
        .trim_start_matches("- ")
        .to_string();

    Some(DocParam {
        name: name.to_string(),
        ty,
        description,
    })
}

// ============================================================================
// Rendering
// ============================================================================

/// Render a Markdown reference, one section per file.
pub fn render_markdown(files: &[FileDocs]) -> String {
    let mut out = String::from("# API Reference\n\n");
    out.push_str("Generated by `hookgate docs` from JSDoc comments.\n");

    let documented: Vec<&FileDocs> = files.iter().filter(|f| !f.entries.is_empty()).collect();
    if documented.is_empty() {
        out.push_str("\nNo documented functions found.\n");
        return out;
    }

    for file in documented {
        out.push_str(&format!("\n## `{}`\n", file.path));
        for entry in &file.entries {
            out.push_str(&format!("\n### `{}`\n\n", entry.name));
            if !entry.summary.is_empty() {
                out.push_str(&format!("{}\n\n", entry.summary));
            }
            if !entry.params.is_empty() {
                out.push_str("| Parameter | Type | Description |\n");
                out.push_str("|-----------|------|-------------|\n");
                for param in &entry.params {
                    out.push_str(&format!(
                        "| `{}` | {} | {} |\n",
                        param.name,
                        param.ty.as_deref().map_or_else(String::new, |t| format!("`{t}`")),
                        param.description
                    ));
                }
                out.push('\n');
            }
            if let Some(returns) = &entry.returns {
                out.push_str(&format!("**Returns:** {returns}\n\n"));
            }
            out.push_str(&format!("_Defined at {}:{}_\n", file.path, entry.line));
        }
    }

    out
}

// ============================================================================
// Generator
// ============================================================================

/// Builds the API reference for a project.
pub struct DocGenerator {
    project_dir: PathBuf,
    config: DocsConfig,
}

impl DocGenerator {
    pub fn new(project_dir: PathBuf, config: DocsConfig) -> Self {
        Self {
            project_dir,
            config,
        }
    }

    /// Non-test source files under the configured source directory, as
    /// sorted project-relative paths with `/` separators.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidConfig`] if the source directory doesn't
    /// exist.
    pub fn discover(&self, classifier: &FileClassifier) -> Result<Vec<String>> {
        let root = self.project_dir.join(&self.config.source_dir);
        if !root.is_dir() {
            return Err(GateError::invalid_config(
                "docs.source_dir",
                format!("{} is not a directory", root.display()),
            ));
        }

        let mut files: Vec<String> = WalkDir::new(&root)
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                e.depth() == 0 || !(name.starts_with('.') || SKIPPED_DIRS.contains(&&*name))
            })
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(error = %err, "Skipping unreadable path");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| relative_path(&self.project_dir, e.path()))
            .filter(|p| classifier.is_source(p) && !classifier.is_test(p))
            .collect();

        files.sort();
        debug!(count = files.len(), root = %root.display(), "Discovered sources");
        Ok(files)
    }

    /// Extract doc entries from each file. Unreadable files are skipped.
    pub fn collect(&self, files: &[String], fs: &dyn FileSystem) -> Vec<FileDocs> {
        files
            .iter()
            .filter_map(|path| match fs.read_to_string(path) {
                Ok(content) => Some(FileDocs {
                    path: path.clone(),
                    entries: extract_doc_entries(&content),
                }),
                Err(e) => {
                    warn!(file = %path, error = %e, "Skipping unreadable source");
                    None
                }
            })
            .collect()
    }

    /// Render `docs` and write them to `output` (or the configured output,
    /// relative to the project), creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file can't be written.
    pub fn write(&self, docs: &[FileDocs], output: Option<&Path>) -> Result<PathBuf> {
        let target = self
            .project_dir
            .join(output.unwrap_or(self.config.output.as_path()));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, render_markdown(docs))?;
        debug!(path = %target.display(), "Wrote API reference");
        Ok(target)
    }
}

fn relative_path(base: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateConfig;
    use crate::operations::RealFileSystem;
    use crate::testing::MockFileSystem;
    use tempfile::TempDir;

    const SOURCE: &str = "\
/**
 * Calculate the order total.
 * Includes tax.
 *
 * @param {Array<Item>} items - Line items
 * @param {number} taxRate Tax as a fraction
 * @returns {number} The total
 */
export function orderTotal(items, taxRate) {
  return 0;
}

/** Not attached. */

function loose() {}

/** Default handler. */
export default async function (req, res) {}
";

    #[test]
    fn test_extracts_summary_params_and_returns() {
        let entries = extract_doc_entries(SOURCE);
        assert_eq!(entries.len(), 2);

        let total = &entries[0];
        assert_eq!(total.name, "orderTotal");
        assert_eq!(total.line, 9);
        assert_eq!(total.summary, "Calculate the order total. Includes tax.");
        assert_eq!(
            total.params,
            vec![
                DocParam {
                    name: "items".to_string(),
                    ty: Some("Array<Item>".to_string()),
                    description: "Line items".to_string(),
                },
                DocParam {
                    name: "taxRate".to_string(),
                    ty: Some("number".to_string()),
                    description: "Tax as a fraction".to_string(),
                },
            ]
        );
        assert_eq!(total.returns.as_deref(), Some("{number} The total"));
    }

    #[test]
    fn test_single_line_block_and_anonymous_default() {
        let entries = extract_doc_entries(SOURCE);
        assert_eq!(entries[1].name, "default");
        assert_eq!(entries[1].summary, "Default handler.");
        assert!(entries[1].params.is_empty());
    }

    #[test]
    fn test_unterminated_block_ignored() {
        assert!(extract_doc_entries("/**\n * never closed\nfunction f() {}\n").is_empty());
    }

    #[test]
    fn test_param_without_type() {
        let entries = extract_doc_entries("/**\n * @param id user id\n */\nfunction load(id) {}\n");
        assert_eq!(entries[0].params[0].ty, None);
        assert_eq!(entries[0].params[0].description, "user id");
    }

    #[test]
    fn test_render_markdown() {
        let docs = vec![
            FileDocs {
                path: "src/order.js".to_string(),
                entries: extract_doc_entries(SOURCE),
            },
            FileDocs {
                path: "src/empty.js".to_string(),
                entries: Vec::new(),
            },
        ];
        let md = render_markdown(&docs);
        assert!(md.starts_with("# API Reference"));
        assert!(md.contains("## `src/order.js`"));
        assert!(md.contains("### `orderTotal`"));
        assert!(md.contains("| `items` | `Array<Item>` | Line items |"));
        assert!(md.contains("**Returns:** {number} The total"));
        assert!(!md.contains("src/empty.js"));
    }

    #[test]
    fn test_render_markdown_without_entries() {
        assert!(render_markdown(&[]).contains("No documented functions found."));
    }

    #[test]
    fn test_discover_and_write() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src/routes")).unwrap();
        fs::create_dir_all(root.join("src/node_modules/dep")).unwrap();
        fs::write(root.join("src/order.js"), SOURCE).unwrap();
        fs::write(root.join("src/routes/users.jsx"), "/** Users. */\nfunction users() {}\n")
            .unwrap();
        fs::write(root.join("src/order.test.js"), "/** T. */\nfunction t() {}\n").unwrap();
        fs::write(root.join("src/node_modules/dep/index.js"), "function x() {}\n").unwrap();
        fs::write(root.join("src/styles.css"), "body {}\n").unwrap();

        let config = GateConfig::default();
        let classifier = FileClassifier::from_config(&config).unwrap();
        let generator = DocGenerator::new(root.to_path_buf(), config.docs.clone());

        let files = generator.discover(&classifier).unwrap();
        assert_eq!(files, vec!["src/order.js", "src/routes/users.jsx"]);

        let docs = generator.collect(&files, &RealFileSystem::new(root.to_path_buf()));
        let path = generator.write(&docs, None).unwrap();
        assert_eq!(path, root.join("docs/API.md"));

        let md = fs::read_to_string(path).unwrap();
        assert!(md.contains("### `users`"));
        assert!(md.contains("### `orderTotal`"));
    }

    #[test]
    fn test_discover_missing_source_dir() {
        let temp = TempDir::new().unwrap();
        let config = GateConfig::default();
        let classifier = FileClassifier::from_config(&config).unwrap();
        let err = DocGenerator::new(temp.path().to_path_buf(), config.docs)
            .discover(&classifier)
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_collect_skips_unreadable() {
        let generator = DocGenerator::new(PathBuf::from("."), DocsConfig::default());
        let fs = MockFileSystem::new().with_file("src/a.js", "/** A. */\nfunction a() {}\n");
        let docs = generator.collect(&["src/a.js".to_string(), "src/b.js".to_string()], &fs);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].entries[0].name, "a");
    }
}
