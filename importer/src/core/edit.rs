//! Line-oriented structural edits for individual vendored files.
//!
//! Edits match lines by literal prefix (or substring, for `comment_out`).
//! Every line keeps its original terminator; inserted lines always end in
//! `\n`. An edit that matches nothing is an error: a silently skipped edit
//! would leave a tree that looks imported but is not patched.

use std::path::PathBuf;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use super::substitute::find_bytes;

/// Which of the matching lines an insertion is anchored to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Occurrence {
    #[default]
    First,
    Last,
    Every,
}

/// A single structural edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    /// Insert `lines` after the matching line(s) starting with `prefix`.
    InsertAfter {
        prefix: String,
        lines: Vec<String>,
        #[serde(default)]
        occurrence: Occurrence,
    },
    /// Insert `lines` before the matching line(s) starting with `prefix`.
    InsertBefore {
        prefix: String,
        lines: Vec<String>,
        #[serde(default)]
        occurrence: Occurrence,
    },
    /// Move every line starting with `prefix` to just after the first line
    /// starting with `anchor`.
    Hoist { prefix: String, anchor: String },
    /// Prefix every line containing `contains` with `marker`.
    CommentOut {
        contains: String,
        #[serde(default = "default_comment_marker")]
        marker: String,
    },
    /// Append `lines` at the end of the file.
    Append { lines: Vec<String> },
}

fn default_comment_marker() -> String {
    "// ".to_string()
}

/// Edits for one file, relative to the vendor root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilePatch {
    pub file: PathBuf,
    pub edits: Vec<Edit>,
}

impl Edit {
    /// The literal this edit matches on, used for validation and messages.
    pub fn marker(&self) -> Option<&str> {
        match self {
            Edit::InsertAfter { prefix, .. } | Edit::InsertBefore { prefix, .. } => {
                Some(prefix.as_str())
            }
            Edit::Hoist { prefix, .. } => Some(prefix.as_str()),
            Edit::CommentOut { contains, .. } => Some(contains.as_str()),
            Edit::Append { .. } => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(marker) = self.marker()
            && marker.is_empty()
        {
            bail!("edit marker must be non-empty");
        }
        if let Edit::Hoist { anchor, .. } = self
            && anchor.is_empty()
        {
            bail!("hoist.anchor must be non-empty");
        }
        Ok(())
    }
}

/// Apply `edits` to `text` in order.
///
/// Lines are raw bytes split on `\n`; markers are compared byte for byte.
pub fn apply_edits(text: &[u8], edits: &[Edit]) -> Result<Vec<u8>> {
    let mut lines = split_lines(text);
    for edit in edits {
        lines = apply_edit(lines, edit)?;
    }
    Ok(lines.concat())
}

fn apply_edit(mut lines: Vec<Vec<u8>>, edit: &Edit) -> Result<Vec<Vec<u8>>> {
    match edit {
        Edit::InsertAfter {
            prefix,
            lines: block,
            occurrence,
        } => {
            let hits = select(
                matching(&lines, |l| l.starts_with(prefix.as_bytes())),
                *occurrence,
            );
            if hits.is_empty() {
                bail!("no line starting with {:?}", prefix);
            }
            for index in hits.into_iter().rev() {
                terminate(&mut lines[index]);
                lines.splice(index + 1..index + 1, render_block(block));
            }
        }
        Edit::InsertBefore {
            prefix,
            lines: block,
            occurrence,
        } => {
            let hits = select(
                matching(&lines, |l| l.starts_with(prefix.as_bytes())),
                *occurrence,
            );
            if hits.is_empty() {
                bail!("no line starting with {:?}", prefix);
            }
            for index in hits.into_iter().rev() {
                lines.splice(index..index, render_block(block));
            }
        }
        Edit::Hoist { prefix, anchor } => {
            let (mut moved, mut rest): (Vec<Vec<u8>>, Vec<Vec<u8>>) = lines
                .into_iter()
                .partition(|line| line.starts_with(prefix.as_bytes()));
            if moved.is_empty() {
                bail!("no line starting with {:?} to hoist", prefix);
            }
            let Some(index) = rest.iter().position(|l| l.starts_with(anchor.as_bytes())) else {
                bail!("no anchor line starting with {:?}", anchor);
            };
            moved.iter_mut().for_each(terminate);
            terminate(&mut rest[index]);
            rest.splice(index + 1..index + 1, moved);
            lines = rest;
        }
        Edit::CommentOut { contains, marker } => {
            let hits = matching(&lines, |l| find_bytes(l, contains.as_bytes(), 0).is_some());
            if hits.is_empty() {
                bail!("no line containing {:?}", contains);
            }
            for index in hits {
                lines[index].splice(0..0, marker.bytes());
            }
        }
        Edit::Append { lines: block } => {
            if let Some(last) = lines.last_mut() {
                terminate(last);
            }
            lines.extend(render_block(block));
        }
    }
    Ok(lines)
}

/// Split into lines that keep their terminators.
fn split_lines(text: &[u8]) -> Vec<Vec<u8>> {
    text.split_inclusive(|&byte| byte == b'\n')
        .map(<[u8]>::to_vec)
        .collect()
}

fn matching(lines: &[Vec<u8>], pred: impl Fn(&[u8]) -> bool) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| pred(line.as_slice()))
        .map(|(index, _)| index)
        .collect()
}

fn select(hits: Vec<usize>, occurrence: Occurrence) -> Vec<usize> {
    match occurrence {
        Occurrence::First => hits.into_iter().take(1).collect(),
        Occurrence::Last => hits.into_iter().last().into_iter().collect(),
        Occurrence::Every => hits,
    }
}

fn terminate(line: &mut Vec<u8>) {
    if line.last() != Some(&b'\n') {
        line.push(b'\n');
    }
}

fn render_block(block: &[String]) -> Vec<Vec<u8>> {
    block
        .iter()
        .map(|line| {
            let mut rendered = line.as_bytes().to_vec();
            rendered.push(b'\n');
            rendered
        })
        .collect()
}
