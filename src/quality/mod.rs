//! Commit-quality gate.
//!
//! This module holds everything that decides whether a commit may proceed:
//!
//! - [`files`] - Staged file set and path classification
//! - [`gates`] - Individual checks (lint, patterns, coverage, docs)
//! - [`coverage`] - Parsing coverage tables out of test output
//! - [`enforcer`] - Sequential pre-commit orchestration
//! - [`commit_msg`] - Commit message validation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │    PreCommitGate     │
//! │                      │
//! │  - run_with()        │
//! └──────────┬───────────┘
//!            │  Idle → LintChecked → PatternChecked
//!            │       → CoverageChecked → DocChecked → Done
//!     ┌──────┼──────────┬──────────────┬───────────┐
//!     ▼      ▼          ▼              ▼           ▼
//! ┌──────┐ ┌──────────┐ ┌──────────┐ ┌─────────┐ ┌──────┐
//! │ Lint │ │DebugPrint│ │DocComment│ │Coverage │ │ Docs │
//! │ hard │ │  soft    │ │  soft    │ │  hard   │ │ soft │
//! └──────┘ └──────────┘ └──────────┘ └─────────┘ └──────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use hookgate::quality::PreCommitGate;
//!
//! let gate = PreCommitGate::new(&config, &vcs, &runner, &fs);
//! let outcome = gate.run_with(|result| println!("{}", result.summary()))?;
//! std::process::exit(outcome.exit_code());
//! ```

pub mod commit_msg;
pub mod coverage;
pub mod enforcer;
pub mod files;
pub mod gates;

pub use commit_msg::{
    check_commit_message, read_message_file, suggestion_block, CommitMessageValidator,
    CommitMsgReport, MessageVerdict,
};
pub use coverage::{CoverageParser, CoverageReport};
pub use enforcer::{GateOutcome, GateStage, PreCommitGate};
pub use files::{FileClassifier, StagedFileSet};
pub use gates::{Check, CheckResult, CheckStatus, Finding, GateContext};
