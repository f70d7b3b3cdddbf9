//! Content digest of a vendored tree, for checking that reruns are
//! byte-identical.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::core::recipe::{CopyRule, Recipe};
use crate::io::source::list_dir_files;

/// Relative paths of every vendored file `recipe` owns under `root`, sorted.
pub fn vendored_files(root: &Path, recipe: &Recipe) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for rule in &recipe.copy {
        match rule {
            CopyRule::Dir { target, .. } => {
                for path in list_dir_files(&root.join(target))? {
                    if let Some(name) = path.file_name() {
                        files.push(target.join(name));
                    }
                }
            }
            CopyRule::File { target, .. } => {
                if !root.join(target).is_file() {
                    bail!("vendored file {} not found", target.display());
                }
                files.push(target.clone());
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// SHA-256 over `(path, length, contents)` of every vendored file, hex encoded.
pub fn tree_digest(root: &Path, recipe: &Recipe) -> Result<String> {
    let mut hasher = Sha256::new();
    for relative in vendored_files(root, recipe)? {
        let path = root.join(&relative);
        let contents = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        debug!(file = %relative.display(), bytes = contents.len(), "hashing");
        hasher.update(relative.to_string_lossy().as_bytes());
        hasher.update([0u8]);
        hasher.update((contents.len() as u64).to_le_bytes());
        hasher.update(&contents);
    }
    Ok(hex::encode(hasher.finalize()))
}
