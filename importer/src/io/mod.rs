//! I/O helpers for import commands.

pub mod config;
pub mod source;
pub mod vendor_tree;
