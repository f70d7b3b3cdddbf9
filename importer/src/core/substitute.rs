//! Ordered literal substitutions applied to whole file contents.

use serde::{Deserialize, Serialize};

/// One literal `from` -> `to` replacement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

impl Substitution {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Apply `table` to `text`, entry after entry.
///
/// Works on raw bytes so sources in any ASCII-compatible encoding pass
/// through unchanged. Each entry sees the output of the previous one.
/// Returns the rewritten text and the total number of replacements made.
pub fn apply_substitutions(text: &[u8], table: &[Substitution]) -> (Vec<u8>, usize) {
    let mut current = text.to_vec();
    let mut count = 0;
    for sub in table {
        if sub.from.is_empty() {
            continue;
        }
        let (replaced, hits) = replace_all(&current, sub.from.as_bytes(), sub.to.as_bytes());
        if hits > 0 {
            count += hits;
            current = replaced;
        }
    }
    (current, count)
}

/// Position of the first `needle` in `haystack` at or after `start`.
pub(crate) fn find_bytes(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    if needle.is_empty() || start > haystack.len() {
        return None;
    }
    haystack[start..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| start + offset)
}

/// Replace non-overlapping occurrences of `from`, scanning left to right.
fn replace_all(text: &[u8], from: &[u8], to: &[u8]) -> (Vec<u8>, usize) {
    let mut out = Vec::with_capacity(text.len());
    let mut hits = 0;
    let mut cursor = 0;
    while let Some(at) = find_bytes(text, from, cursor) {
        out.extend_from_slice(&text[cursor..at]);
        out.extend_from_slice(to);
        cursor = at + from.len();
        hits += 1;
    }
    out.extend_from_slice(&text[cursor..]);
    (out, hits)
}
