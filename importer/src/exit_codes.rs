//! Stable exit codes for `vendor-import`.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed (missing upstream, invalid recipe, filesystem error).
pub const FAILED: i32 = 1;
