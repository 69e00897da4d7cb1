//! Testing infrastructure for hookgate.
//!
//! This module provides traits, mocks, and assertions for testing the
//! checks and their orchestration without a real repository or Node
//! toolchain.
//!
//! # Architecture
//!
//! The testing infrastructure is organized into:
//! - **Traits**: Abstractions for external dependencies (git index, subprocess, working tree)
//! - **Mocks**: Test doubles that implement the traits with controllable behavior
//! - **Assertions**: Custom assertions for check results and gate outcomes
//!
//! # Example
//!
//! ```rust,ignore
//! use hookgate::testing::{CommandOutput, MockCommandRunner, MockFileSystem, MockVcs};
//!
//! let vcs = MockVcs::new().with_staged_files(["src/app.js"]);
//! let runner = MockCommandRunner::new()
//!     .with_output("npm run lint", CommandOutput::failed(1, "1 error"));
//! let fs = MockFileSystem::new().with_file("src/app.js", "console.log(1);\n");
//! ```

pub mod assertions;
pub mod mocks;
pub mod traits;

// Re-export commonly used types
pub use assertions::*;
pub use mocks::*;
pub use traits::*;
