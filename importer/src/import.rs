//! Import orchestration for `vendor-import run`.
//!
//! Builds the full plan first, then resets the vendor directories and
//! writes every planned file. Nothing on disk changes if planning fails.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::core::recipe::Recipe;
use crate::io::vendor_tree::{remove_prefixed, reset_dir, write_atomic};
use crate::plan::{ImportPlan, build_plan};

/// Summary of a completed import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub recipe: String,
    /// Files written, relative to the vendor root, in write order.
    pub written: Vec<PathBuf>,
    pub excluded: usize,
    pub substitutions: usize,
    /// Vendor directories reset (or created) before writing.
    pub reset_dirs: Vec<PathBuf>,
    /// Files that received structural edits (relative paths).
    pub patched: Vec<PathBuf>,
    /// Vendor directories that did not exist before this run.
    pub created_dirs: Vec<PathBuf>,
    /// Files removed by `clean_prefixes`.
    pub cleaned: Vec<PathBuf>,
}

/// Plan and apply `recipe` in the vendor directory `root`.
pub fn run_import(root: &Path, recipe: &Recipe) -> Result<ImportReport> {
    let plan = build_plan(root, recipe).with_context(|| format!("plan import {}", recipe.name))?;
    apply_plan(root, &plan)
}

/// Write a previously built plan into `root`.
pub fn apply_plan(root: &Path, plan: &ImportPlan) -> Result<ImportReport> {
    let mut report = ImportReport {
        recipe: plan.recipe.clone(),
        excluded: plan.excluded.len(),
        substitutions: plan.substitution_count(),
        patched: plan.patched_files(),
        ..ImportReport::default()
    };

    info!(recipe = %plan.recipe, dirs = plan.reset_dirs.len(), "cleaning files");
    for dir in &plan.reset_dirs {
        if reset_dir(&root.join(dir))? {
            warn!(dir = %dir.display(), "created directory; local Makefiles must be recreated");
            report.created_dirs.push(dir.clone());
        }
        report.reset_dirs.push(dir.clone());
    }
    for prefix in &plan.clean_prefixes {
        report.cleaned.extend(remove_prefixed(root, prefix)?);
    }

    info!(recipe = %plan.recipe, files = plan.files.len(), "bringing new files");
    for (relative, file) in &plan.files {
        write_atomic(&root.join(relative), &file.contents)?;
        report.written.push(relative.clone());
    }

    info!(
        recipe = %plan.recipe,
        files = report.written.len(),
        excluded = report.excluded,
        substitutions = report.substitutions,
        patched = report.patched.len(),
        "import complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recipe::CopyRule;
    use crate::core::substitute::Substitution;
    use crate::test_support::VendorDir;

    fn recipe() -> Recipe {
        Recipe {
            name: "demo".to_string(),
            upstream: PathBuf::from("orig-dist"),
            exclude_suffixes: vec![".mk".to_string()],
            clean_prefixes: vec!["demo.".to_string()],
            copy: vec![CopyRule::dir("core"), CopyRule::file("demo.c", "demo.cc", true)],
            substitutions: vec![Substitution::new("old", "new")],
            patches: Vec::new(),
        }
    }

    #[test]
    fn writes_plan_and_reports_counts() {
        let vendor = VendorDir::new().expect("vendor");
        vendor.write("orig-dist/core/a.h", "old old\n").expect("write");
        vendor.write("orig-dist/core/rules.mk", "x\n").expect("write");
        vendor.write("orig-dist/demo.c", "old\n").expect("write");
        vendor.write("demo.o", "stale").expect("write");

        let report = run_import(vendor.path(), &recipe()).expect("import");
        assert_eq!(
            report.written,
            vec![PathBuf::from("core/a.h"), PathBuf::from("demo.cc")]
        );
        assert_eq!(report.reset_dirs, vec![PathBuf::from("core")]);
        assert_eq!(report.excluded, 1);
        assert_eq!(report.substitutions, 3);
        assert_eq!(report.created_dirs, vec![PathBuf::from("core")]);
        assert_eq!(report.cleaned, vec![vendor.path().join("demo.o")]);
        assert_eq!(vendor.read("core/a.h").expect("read"), "new new\n");
        assert_eq!(vendor.read("demo.cc").expect("read"), "new\n");
        assert!(!vendor.path().join("core/rules.mk").exists());
    }

    #[test]
    fn failed_plan_leaves_tree_untouched() {
        let vendor = VendorDir::new().expect("vendor");
        vendor.write("core/a.h", "local\n").expect("write");
        vendor.write("orig-dist/core/a.h", "old\n").expect("write");

        let err = run_import(vendor.path(), &recipe()).expect_err("missing demo.c");
        assert!(format!("{:#}", err).contains("demo.c"));
        assert_eq!(vendor.read("core/a.h").expect("read"), "local\n");
    }

    #[test]
    fn non_utf8_bytes_round_trip() {
        let vendor = VendorDir::new().expect("vendor");
        vendor
            .write("orig-dist/core/a.h", b"// Niklas E\xe9n\nold\n")
            .expect("write");
        vendor.write("orig-dist/demo.c", "old\n").expect("write");

        run_import(vendor.path(), &recipe()).expect("import");
        assert_eq!(
            vendor.read_bytes("core/a.h").expect("read"),
            b"// Niklas E\xe9n\nnew\n"
        );
    }
}
