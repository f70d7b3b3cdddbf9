//! Writes into the local vendor tree.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::source::is_vendored_name;

/// Remove vendored files (and temp files left by [`write_atomic`]) from
/// `dir`, or create it if absent.
///
/// Returns `true` when the directory had to be created. Subdirectories and
/// extension-less files are left alone. Symlinks with a vendored name are
/// removed themselves, never their targets.
pub fn reset_dir(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))?;
        return Ok(true);
    }
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if path.is_dir() || !(is_vendored_name(&name) || is_temp_name(&name)) {
            continue;
        }
        debug!(path = %path.display(), "removing");
        fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
    }
    Ok(false)
}

fn temp_name(name: &str) -> String {
    format!(".{name}.tmp")
}

fn is_temp_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(".tmp")
}

/// Remove files directly inside `dir` whose name starts with `prefix`.
pub fn remove_prefixed(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    if !dir.is_dir() {
        return Ok(removed);
    }
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with(prefix) && path.is_file() {
            debug!(path = %path.display(), "removing");
            fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
            removed.push(path);
        }
    }
    removed.sort();
    Ok(removed)
}

/// Atomically write `contents` to `path` (temp file + rename).
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let name = path
        .file_name()
        .with_context(|| format!("path missing file name {}", path.display()))?;
    let tmp_path = parent.join(temp_name(&name.to_string_lossy()));
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_creates_missing_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("core");
        assert!(reset_dir(&dir).expect("reset"));
        assert!(dir.is_dir());
    }

    #[test]
    fn reset_keeps_makefile_and_subdirs() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("core");
        fs::create_dir_all(dir.join("sub")).expect("mkdir");
        fs::write(dir.join("Solver.cc"), "old").expect("write");
        fs::write(dir.join("Makefile"), "local").expect("write");

        assert!(!reset_dir(&dir).expect("reset"));
        assert!(!dir.join("Solver.cc").exists());
        assert!(dir.join("Makefile").exists());
        assert!(dir.join("sub").is_dir());
    }

    #[test]
    fn remove_prefixed_only_touches_matching_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path();
        fs::write(dir.join("lglib.hh"), "").expect("write");
        fs::write(dir.join("lglib.o"), "").expect("write");
        fs::write(dir.join("lglbnr.c"), "").expect("write");

        let removed = remove_prefixed(dir, "lglib.").expect("remove");
        assert_eq!(removed.len(), 2);
        assert!(dir.join("lglbnr.c").exists());
    }

    #[test]
    fn write_atomic_creates_parents_and_leaves_no_temp() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("mtl").join("Vec.h");
        write_atomic(&path, b"x\n").expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "x\n");
        assert!(!temp.path().join("mtl").join(".Vec.h.tmp").exists());
    }

    #[test]
    fn reset_removes_leftover_temp_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("mtl");
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(dir.join(temp_name("Vec.h")), "partial").expect("write");
        fs::write(dir.join(".gitignore"), "*.o\n").expect("write");

        reset_dir(&dir).expect("reset");
        assert!(!dir.join(".Vec.h.tmp").exists());
        assert!(dir.join(".gitignore").exists());
    }

    #[cfg(unix)]
    #[test]
    fn reset_removes_symlinks_not_targets() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("mtl");
        fs::create_dir_all(dir.join("sub.d")).expect("mkdir");
        let target = temp.path().join("Alg.h");
        fs::write(&target, "real").expect("write");
        std::os::unix::fs::symlink(&target, dir.join("Alg.h")).expect("symlink");
        std::os::unix::fs::symlink(dir.join("sub.d"), dir.join("link.d")).expect("symlink");

        reset_dir(&dir).expect("reset");
        assert!(fs::symlink_metadata(dir.join("Alg.h")).is_err());
        assert!(target.exists());
        assert!(dir.join("link.d").is_dir());
    }
}
