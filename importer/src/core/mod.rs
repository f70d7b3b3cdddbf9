//! Deterministic, pure logic for vendor imports.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! text and recipes and return deterministic outputs suitable for tests.

pub mod builtin;
pub mod edit;
pub mod recipe;
pub mod substitute;
