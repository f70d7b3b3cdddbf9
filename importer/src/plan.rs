//! In-memory import plan: everything an import will write, computed before
//! the vendor tree is touched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::core::edit::apply_edits;
use crate::core::recipe::{CopyRule, Recipe};
use crate::core::substitute::apply_substitutions;
use crate::io::source::{list_dir_files, read_source};

/// Final contents of one vendored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Upstream file this was copied from.
    pub source: PathBuf,
    /// Bytes to write; upstream encoding is preserved.
    pub contents: Vec<u8>,
    /// Substitutions performed on this file.
    pub substitutions: usize,
    pub patched: bool,
}

/// Result of running a recipe in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPlan {
    pub recipe: String,
    /// Vendor directories (relative) that are reset before writing.
    pub reset_dirs: Vec<PathBuf>,
    pub clean_prefixes: Vec<String>,
    /// Files to write, keyed by path relative to the vendor root.
    pub files: BTreeMap<PathBuf, PlannedFile>,
    /// Upstream files skipped by suffix.
    pub excluded: Vec<PathBuf>,
}

impl ImportPlan {
    pub fn substitution_count(&self) -> usize {
        self.files.values().map(|file| file.substitutions).sum()
    }

    pub fn patched_files(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter(|(_, file)| file.patched)
            .map(|(path, _)| path.clone())
            .collect()
    }
}

/// Read upstream sources and apply substitutions and patches in memory.
pub fn build_plan(root: &Path, recipe: &Recipe) -> Result<ImportPlan> {
    recipe
        .validate()
        .with_context(|| format!("validate recipe {}", recipe.name))?;
    let upstream = root.join(&recipe.upstream);
    if !upstream.is_dir() {
        bail!(
            "upstream source {} not found (expected a checkout under the vendor directory)",
            upstream.display()
        );
    }

    let mut plan = ImportPlan {
        recipe: recipe.name.clone(),
        reset_dirs: Vec::new(),
        clean_prefixes: recipe.clean_prefixes.clone(),
        files: BTreeMap::new(),
        excluded: Vec::new(),
    };

    for rule in &recipe.copy {
        match rule {
            CopyRule::Dir { source, target, .. } => {
                plan.reset_dirs.push(target.clone());
                for path in list_dir_files(&upstream.join(source))? {
                    let Some(name) = path.file_name() else {
                        continue;
                    };
                    if recipe.is_excluded(&name.to_string_lossy()) {
                        debug!(path = %path.display(), "excluded by suffix");
                        plan.excluded.push(path);
                        continue;
                    }
                    let relative = target.join(name);
                    add_file(&mut plan, recipe, rule, path, relative)?;
                }
            }
            CopyRule::File { source, target, .. } => {
                let path = upstream.join(source);
                if !path.is_file() {
                    bail!("upstream file {} not found", path.display());
                }
                add_file(&mut plan, recipe, rule, path, target.clone())?;
            }
        }
    }

    for patch in &recipe.patches {
        let Some(file) = plan.files.get_mut(&patch.file) else {
            bail!(
                "patch target {} is not produced by any copy rule",
                patch.file.display()
            );
        };
        file.contents = apply_edits(&file.contents, &patch.edits)
            .with_context(|| format!("patch {}", patch.file.display()))?;
        file.patched = true;
        debug!(file = %patch.file.display(), edits = patch.edits.len(), "patched");
    }

    Ok(plan)
}

fn add_file(
    plan: &mut ImportPlan,
    recipe: &Recipe,
    rule: &CopyRule,
    source: PathBuf,
    relative: PathBuf,
) -> Result<()> {
    if plan.files.contains_key(&relative) {
        bail!(
            "{} is produced by more than one copy rule",
            relative.display()
        );
    }
    let raw = read_source(&source)?;
    let (contents, substitutions) = if rule.substitute() {
        apply_substitutions(&raw, &recipe.substitutions)
    } else {
        (raw, 0)
    };
    debug!(file = %relative.display(), substitutions, "planned");
    plan.files.insert(
        relative,
        PlannedFile {
            source,
            contents,
            substitutions,
            patched: false,
        },
    );
    Ok(())
}
