//! CLI command implementations.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::builtin::BUILTIN_RECIPES;
use crate::digest::tree_digest;
use crate::import::run_import;
use crate::io::config::{render_recipe, write_recipe};
use crate::resolve::{named_builtin, resolve_recipe};

/// Run an import in `root`.
pub fn run(root: &Path, name: Option<&str>, config: Option<&Path>) -> Result<()> {
    let recipe = resolve_recipe(root, name, config)?;
    debug!(recipe = %recipe.name, root = %root.display(), "resolved recipe");
    println!("import: recipe={} root={}", recipe.name, root.display());

    let report = run_import(root, &recipe)?;
    for dir in &report.created_dirs {
        eprintln!(
            "warning: created {}; you will need to create local Makefiles",
            dir.display()
        );
    }
    for dir in &report.reset_dirs {
        println!("clean: {}/", dir.display());
    }
    for path in &report.cleaned {
        println!("clean: {}", path.display());
    }
    for path in &report.written {
        println!("copy: {}", path.display());
    }
    for path in &report.patched {
        println!("patch: {}", path.display());
    }
    println!(
        "import: files={} excluded={} substitutions={} patched={}",
        report.written.len(),
        report.excluded,
        report.substitutions,
        report.patched.len()
    );
    Ok(())
}

/// Print the content digest of the vendored tree.
pub fn digest(root: &Path, name: Option<&str>, config: Option<&Path>) -> Result<()> {
    let recipe = resolve_recipe(root, name, config)?;
    let digest = tree_digest(root, &recipe)
        .with_context(|| format!("digest {} in {}", recipe.name, root.display()))?;
    println!("{}", digest);
    Ok(())
}

/// List built-in recipe names.
pub fn list() -> Result<()> {
    for name in BUILTIN_RECIPES {
        println!("{}", name);
    }
    Ok(())
}

/// Print a built-in recipe as TOML, or write it to `write` so it can be
/// customised as a local recipe file.
pub fn show(name: &str, write: Option<&Path>) -> Result<()> {
    let recipe = named_builtin(name)?;
    match write {
        Some(path) => {
            write_recipe(path, &recipe)?;
            println!("write: {}", path.display());
        }
        None => print!("{}", render_recipe(&recipe)?),
    }
    Ok(())
}
