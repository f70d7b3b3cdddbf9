//! Import recipe: what to copy from upstream and how to patch it.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use super::edit::FilePatch;
use super::substitute::Substitution;

/// Full description of one vendored library.
///
/// Field order matters for TOML output: plain values first, then arrays of
/// tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    /// Recipe name, also the default vendor directory name.
    pub name: String,
    /// Upstream checkout, relative to the vendor directory unless absolute.
    pub upstream: PathBuf,
    /// Upstream files whose name ends with one of these are not copied.
    #[serde(default)]
    pub exclude_suffixes: Vec<String>,
    /// Files in the vendor root whose name starts with one of these are
    /// removed before copying.
    #[serde(default)]
    pub clean_prefixes: Vec<String>,
    pub copy: Vec<CopyRule>,
    /// Applied in order to every file produced by a rule with `substitute`.
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
    #[serde(default)]
    pub patches: Vec<FilePatch>,
}

/// How upstream files map onto the vendor tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CopyRule {
    /// Every `name.ext` file directly inside `upstream/source` goes to
    /// `target`, which is reset on each run.
    Dir {
        source: PathBuf,
        target: PathBuf,
        #[serde(default = "default_substitute")]
        substitute: bool,
    },
    /// A single file, possibly renamed.
    File {
        source: PathBuf,
        target: PathBuf,
        #[serde(default = "default_substitute")]
        substitute: bool,
    },
}

fn default_substitute() -> bool {
    true
}

impl CopyRule {
    pub fn dir(path: &str) -> Self {
        CopyRule::Dir {
            source: PathBuf::from(path),
            target: PathBuf::from(path),
            substitute: true,
        }
    }

    pub fn file(source: &str, target: &str, substitute: bool) -> Self {
        CopyRule::File {
            source: PathBuf::from(source),
            target: PathBuf::from(target),
            substitute,
        }
    }

    pub fn target(&self) -> &Path {
        match self {
            CopyRule::Dir { target, .. } | CopyRule::File { target, .. } => target,
        }
    }

    pub fn substitute(&self) -> bool {
        match self {
            CopyRule::Dir { substitute, .. } | CopyRule::File { substitute, .. } => *substitute,
        }
    }
}

impl Recipe {
    /// True if `file_name` ends with one of the excluded suffixes.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.exclude_suffixes
            .iter()
            .any(|suffix| file_name.ends_with(suffix.as_str()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("recipe.name must be non-empty");
        }
        if self.upstream.as_os_str().is_empty() {
            bail!("recipe.upstream must be non-empty");
        }
        if self.copy.is_empty() {
            bail!("recipe.copy must be a non-empty array");
        }
        for (index, rule) in self.copy.iter().enumerate() {
            validate_rule(rule).with_context(|| format!("copy[{}] invalid", index))?;
        }
        for suffix in &self.exclude_suffixes {
            if suffix.is_empty() {
                bail!("exclude_suffixes entries must be non-empty");
            }
        }
        for prefix in &self.clean_prefixes {
            if prefix.is_empty() || prefix.contains(['/', '\\']) {
                bail!("clean_prefixes entries must be non-empty file name prefixes");
            }
        }
        for (index, sub) in self.substitutions.iter().enumerate() {
            if sub.from.is_empty() {
                bail!("substitutions[{}].from must be non-empty", index);
            }
        }
        for (index, patch) in self.patches.iter().enumerate() {
            validate_local_path(&patch.file)
                .with_context(|| format!("patches[{}].file invalid", index))?;
            if patch.edits.is_empty() {
                bail!("patches[{}].edits must be a non-empty array", index);
            }
            for (edit_index, edit) in patch.edits.iter().enumerate() {
                edit.validate()
                    .with_context(|| format!("patches[{}].edits[{}] invalid", index, edit_index))?;
            }
        }
        Ok(())
    }
}

fn validate_rule(rule: &CopyRule) -> Result<()> {
    let (CopyRule::Dir { source, target, .. } | CopyRule::File { source, target, .. }) = rule;
    if source.as_os_str().is_empty() {
        bail!("source must be non-empty");
    }
    if source.components().any(|c| c == Component::ParentDir) {
        bail!("source must not contain '..'");
    }
    validate_local_path(target).context("target invalid")
}

/// Vendor-side paths are written to, so they must stay inside the vendor root.
fn validate_local_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        bail!("path must be non-empty");
    }
    if !path
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        bail!(
            "path {} must be relative without '.' or '..' components",
            path.display()
        );
    }
    Ok(())
}
