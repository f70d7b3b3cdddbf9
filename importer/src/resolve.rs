//! Recipe resolution for CLI commands.
//!
//! Precedence: explicit `--config` file, explicit built-in name,
//! `vendor-import.toml` in the vendor directory, then the built-in recipe
//! named after the vendor directory itself.

use std::path::Path;

use anyhow::{Result, anyhow, bail};
use tracing::debug;

use crate::core::builtin::{BUILTIN_RECIPES, builtin_recipe};
use crate::core::recipe::Recipe;
use crate::io::config::{RECIPE_FILE, load_recipe};

pub fn resolve_recipe(root: &Path, name: Option<&str>, config: Option<&Path>) -> Result<Recipe> {
    if let Some(config) = config {
        debug!(path = %config.display(), "recipe from --config");
        return load_recipe(config);
    }
    if let Some(name) = name {
        return named_builtin(name);
    }
    let local = root.join(RECIPE_FILE);
    if local.is_file() {
        debug!(path = %local.display(), "recipe from vendor directory");
        return load_recipe(&local);
    }
    let absolute = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let Some(dir_name) = absolute.file_name().map(|n| n.to_string_lossy().to_string()) else {
        bail!("cannot infer a recipe for {}", root.display());
    };
    match builtin_recipe(&dir_name) {
        Some(recipe) => {
            debug!(recipe = %dir_name, "recipe from directory name");
            Ok(recipe)
        }
        None => bail!(
            "no recipe for directory {}: pass one of [{}] or add {}",
            root.display(),
            BUILTIN_RECIPES.join(", "),
            RECIPE_FILE
        ),
    }
}

/// Look up a built-in recipe by name.
pub fn named_builtin(name: &str) -> Result<Recipe> {
    builtin_recipe(name).ok_or_else(|| {
        anyhow!(
            "unknown recipe {} (available: {})",
            name,
            BUILTIN_RECIPES.join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::write_recipe;
    use std::fs;

    #[test]
    fn infers_builtin_from_directory_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("glucose30");
        fs::create_dir(&root).expect("mkdir");
        let recipe = resolve_recipe(&root, None, None).expect("resolve");
        assert_eq!(recipe.name, "glucose30");
    }

    #[test]
    fn local_recipe_file_wins_over_directory_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("glucose30");
        let mut custom = builtin_recipe("glucose30").expect("builtin");
        custom.name = "glucose30-custom".to_string();
        write_recipe(&root.join(RECIPE_FILE), &custom).expect("write");

        let recipe = resolve_recipe(&root, None, None).expect("resolve");
        assert_eq!(recipe.name, "glucose30-custom");
    }

    #[test]
    fn explicit_name_wins_over_local_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        let mut custom = builtin_recipe("glucose30").expect("builtin");
        custom.name = "custom".to_string();
        write_recipe(&root.join(RECIPE_FILE), &custom).expect("write");

        let recipe = resolve_recipe(root, Some("minisat-gh"), None).expect("resolve");
        assert_eq!(recipe.name, "minisat-gh");
    }

    #[test]
    fn unknown_directory_lists_builtins() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("cadical");
        fs::create_dir(&root).expect("mkdir");
        let err = resolve_recipe(&root, None, None).expect_err("no recipe");
        let msg = err.to_string();
        assert!(msg.contains("minisat-gh"));
        assert!(msg.contains(RECIPE_FILE));
    }

    #[test]
    fn unknown_name_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = resolve_recipe(temp.path(), Some("picosat"), None).expect_err("unknown");
        assert!(err.to_string().contains("unknown recipe picosat"));
    }
}
