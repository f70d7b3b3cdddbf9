//! Vendors third-party SAT-solver sources into a host build tree.
//!
//! An import copies upstream files into local directories, applies an
//! ordered table of literal substitutions, then a few line-oriented edits
//! to named files. The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (recipes, substitutions, edits).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (reading upstream, resetting and
//!   writing the vendor tree, recipe files).
//!
//! Orchestration modules ([`plan`], [`import`], [`digest`], [`resolve`])
//! coordinate core logic with I/O to implement CLI commands.

pub mod cli;
pub mod core;
pub mod digest;
pub mod exit_codes;
pub mod import;
pub mod io;
pub mod logging;
pub mod plan;
pub mod resolve;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
