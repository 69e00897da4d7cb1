//! Coverage output parsing.
//!
//! Test runners print coverage as a text table, e.g. istanbul/Jest:
//!
//! ```text
//! ----------------|---------|----------|---------|---------|
//! File            | % Stmts | % Branch | % Funcs | % Lines |
//! ----------------|---------|----------|---------|---------|
//! All files       |   85.71 |       50 |     100 |   85.71 |
//!  src/app.js     |     100 |      100 |     100 |     100 |
//!  src/util.js    |   12.5  |        0 |      50 |   12.5  |
//! ```
//!
//! The parser looks for the aggregate label and takes the first number
//! after it on the same line. Lines whose first token starts with the
//! source prefix contribute a per-file entry, again using the first number.
//! Column layout is otherwise ignored, so plain `All files 85.71` output
//! works too.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Coverage figures recovered from test output.
///
/// All present percentages are within `[0, 100]`. An absent aggregate means
/// "unknown", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub overall: Option<f64>,
    pub per_file: BTreeMap<String, f64>,
}

impl CoverageReport {
    /// Whether the aggregate is below `min_overall`, comparing only the
    /// integer part. `None` when the aggregate is unknown.
    #[must_use]
    pub fn below_minimum(&self, min_overall: u32) -> Option<bool> {
        self.overall.map(|v| v.trunc() < f64::from(min_overall))
    }

    /// Files with some, but less than `min_per_file` percent, coverage.
    #[must_use]
    pub fn low_coverage_files(&self, min_per_file: u32) -> Vec<(&str, f64)> {
        let min = f64::from(min_per_file);
        self.per_file
            .iter()
            .filter(|(_, pct)| **pct > 0.0 && **pct < min)
            .map(|(file, pct)| (file.as_str(), *pct))
            .collect()
    }
}

/// Extracts a [`CoverageReport`] from test runner output.
#[derive(Debug, Clone)]
pub struct CoverageParser {
    aggregate: Regex,
    per_file: Regex,
}

impl CoverageParser {
    /// Parser for a given aggregate label (e.g. `All files`) and source
    /// path prefix (e.g. `src/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the patterns can't be compiled.
    pub fn new(aggregate_label: &str, source_prefix: &str) -> Result<Self> {
        let aggregate = Regex::new(&format!(
            r"(?m)^[\s|]*{}[^\d\n]*?(\d+(?:\.\d+)?)",
            regex::escape(aggregate_label)
        ))
        .context("Failed to compile aggregate coverage regex")?;

        let per_file = Regex::new(&format!(
            r"(?m)^[\s|]*({}[^\s|]*)[ \t|]+[^\d\n]*?(\d+(?:\.\d+)?)",
            regex::escape(source_prefix)
        ))
        .context("Failed to compile per-file coverage regex")?;

        Ok(Self {
            aggregate,
            per_file,
        })
    }

    /// Parse tool output. Malformed or out-of-range values are dropped.
    #[must_use]
    pub fn parse(&self, output: &str) -> CoverageReport {
        let overall = self
            .aggregate
            .captures(output)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_percent(m.as_str()));

        let mut per_file = BTreeMap::new();
        for caps in self.per_file.captures_iter(output) {
            let (Some(file), Some(pct)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            if let Some(pct) = parse_percent(pct.as_str()) {
                per_file.entry(file.as_str().to_string()).or_insert(pct);
            }
        }

        debug!(?overall, files = per_file.len(), "Parsed coverage output");
        CoverageReport { overall, per_file }
    }
}

fn parse_percent(text: &str) -> Option<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|v| (0.0..=100.0).contains(v))
}
