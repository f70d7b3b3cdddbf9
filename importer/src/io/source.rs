//! Read-only access to the upstream checkout.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// True for `name.ext` style file names (not hidden, contains a dot).
///
/// Only these are copied from upstream and only these are removed when a
/// vendor directory is reset, so local `Makefile`s survive a rerun.
pub fn is_vendored_name(name: &str) -> bool {
    !name.starts_with('.') && name.contains('.')
}

/// List vendored files directly inside `dir`, sorted by name.
pub fn list_dir_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("directory {} not found", dir.display());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        let path = entry.path();
        if !is_vendored_name(&entry.file_name().to_string_lossy()) {
            continue;
        }
        // Follows symlinks: a linked header upstream is copied like any other.
        if fs::metadata(&path)
            .with_context(|| format!("stat {}", path.display()))?
            .is_file()
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read a source file as raw bytes; no encoding is assumed.
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read {}", path.display()))
}
