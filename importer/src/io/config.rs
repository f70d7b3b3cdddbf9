//! Recipe files stored as `vendor-import.toml` in a vendor directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::vendor_tree::write_atomic;
use crate::core::recipe::Recipe;

/// Recipe file picked up from the vendor directory when no recipe is named.
pub const RECIPE_FILE: &str = "vendor-import.toml";

/// Load and validate a recipe from a TOML file.
pub fn load_recipe(path: &Path) -> Result<Recipe> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_recipe(&contents).with_context(|| format!("load recipe {}", path.display()))
}

/// Parse and validate a recipe from TOML text.
pub fn parse_recipe(contents: &str) -> Result<Recipe> {
    let recipe: Recipe = toml::from_str(contents).context("parse recipe toml")?;
    recipe.validate()?;
    Ok(recipe)
}

/// Render a recipe as TOML with a trailing newline.
pub fn render_recipe(recipe: &Recipe) -> Result<String> {
    recipe.validate()?;
    let mut buf = toml::to_string_pretty(recipe).context("serialize recipe toml")?;
    if !buf.ends_with('\n') {
        buf.push('\n');
    }
    Ok(buf)
}

/// Atomically write a recipe file.
pub fn write_recipe(path: &Path, recipe: &Recipe) -> Result<()> {
    let buf = render_recipe(recipe)?;
    write_atomic(path, buf.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builtin::{BUILTIN_RECIPES, builtin_recipe};
    use crate::core::edit::{Edit, Occurrence};
    use crate::core::recipe::CopyRule;

    #[test]
    fn parses_hand_written_recipe() {
        let input = r##"
name = "cadical-local"
upstream = "orig-dist/cadical"
exclude_suffixes = ["main.cpp"]

[[copy]]
kind = "dir"
source = "src"
target = "src"

[[copy]]
kind = "file"
source = "VERSION"
target = "src/VERSION.txt"
substitute = false

[[substitutions]]
from = "namespace CaDiCaL"
to = "namespace CaDiCaLLocal"

[[patches]]
file = "src/cadical.hpp"

[[patches.edits]]
op = "insert_after"
prefix = "#define _cadical_hpp_INCLUDED"
lines = ["#define CADICAL_LOCAL"]

[[patches.edits]]
op = "comment_out"
contains = "#include <cstdio>"
"##;
        let recipe = parse_recipe(input).expect("recipe parses");
        assert_eq!(recipe.name, "cadical-local");
        assert_eq!(recipe.copy.len(), 2);
        assert!(!recipe.copy[1].substitute());
        assert!(matches!(recipe.copy[0], CopyRule::Dir { substitute: true, .. }));
        let edits = &recipe.patches[0].edits;
        assert!(matches!(
            &edits[0],
            Edit::InsertAfter {
                occurrence: Occurrence::First,
                ..
            }
        ));
        assert!(matches!(&edits[1], Edit::CommentOut { marker, .. } if marker == "// "));
    }

    #[test]
    fn rejects_recipe_without_copy_rules() {
        let input = r##"
name = "empty"
upstream = "orig-dist"
copy = []
"##;
        let err = parse_recipe(input).expect_err("no copy rules");
        assert!(err.to_string().contains("recipe.copy"));
    }

    #[test]
    fn builtins_survive_toml_round_trip() {
        for name in BUILTIN_RECIPES {
            let recipe = builtin_recipe(name).expect("builtin");
            let rendered = render_recipe(&recipe).expect("render");
            let parsed = parse_recipe(&rendered).expect("parse");
            assert_eq!(parsed, recipe);
        }
    }

    #[test]
    fn write_then_load() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(RECIPE_FILE);
        let recipe = builtin_recipe("minisat-gh").expect("builtin");
        write_recipe(&path, &recipe).expect("write");
        assert_eq!(load_recipe(&path).expect("load"), recipe);
    }

    #[test]
    fn load_reports_path_on_parse_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(RECIPE_FILE);
        fs::write(&path, "name = ").expect("write");
        let err = load_recipe(&path).expect_err("bad toml");
        assert!(err.to_string().contains(RECIPE_FILE));
    }
}
