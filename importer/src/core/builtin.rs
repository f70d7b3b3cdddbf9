//! Built-in recipes for the solvers vendored under `extsrc/`.
//!
//! Each recipe expects its upstream checkout under `orig-dist/` inside the
//! vendor directory named after the recipe.

use std::path::PathBuf;

use super::edit::{Edit, FilePatch, Occurrence};
use super::recipe::{CopyRule, Recipe};
use super::substitute::Substitution;

/// Names accepted by [`builtin_recipe`].
pub const BUILTIN_RECIPES: &[&str] = &["glucose30", "lingeling-ala", "minisat-gh"];

const SOLVER_DIRS: [&str; 4] = ["core", "simp", "utils", "mtl"];
const MAP_HASH_PREFIX: &str = "static inline uint32_t hash";
const FORMAT_MACROS: [&str; 2] = ["#define __STDC_FORMAT_MACROS", "#define __STDC_LIMIT_MACROS"];

pub fn builtin_recipe(name: &str) -> Option<Recipe> {
    match name {
        "glucose30" => Some(glucose30()),
        "lingeling-ala" => Some(lingeling_ala()),
        "minisat-gh" => Some(minisat_gh()),
        _ => None,
    }
}

/// minisat from GitHub, renamed into the `MinisatGH` namespace.
pub fn minisat_gh() -> Recipe {
    Recipe {
        name: "minisat-gh".to_string(),
        upstream: PathBuf::from("orig-dist/minisat"),
        exclude_suffixes: strings(&["Main.cc"]),
        clean_prefixes: Vec::new(),
        copy: SOLVER_DIRS.into_iter().map(CopyRule::dir).collect(),
        substitutions: vec![
            Substitution::new("namespace Minisat", "namespace MinisatGH"),
            Substitution::new("Minisat::", "MinisatGH::"),
            Substitution::new("#ifndef Minisat_", "#ifndef MinisatGH_"),
            Substitution::new("#define Minisat_", "#define MinisatGH_"),
            Substitution::new("#include \"minisat/", "#include \"../minisat-gh/"),
            Substitution::new("\"PRI", "\" PRI"),
        ],
        patches: vec![
            FilePatch {
                file: PathBuf::from("mtl/IntTypes.h"),
                edits: vec![insert_after("#define MinisatGH_", &FORMAT_MACROS)],
            },
            map_hash_hoist(),
            FilePatch {
                file: PathBuf::from("core/SolverTypes.h"),
                edits: vec![Edit::InsertBefore {
                    prefix: "#include ".to_string(),
                    lines: strings(&["#define MINISAT_CONSTANTS_AS_MACROS"]),
                    occurrence: Occurrence::First,
                }],
            },
        ],
    }
}

/// glucose 3.0 with includes rewritten relative to the vendor directory.
pub fn glucose30() -> Recipe {
    Recipe {
        name: "glucose30".to_string(),
        upstream: PathBuf::from("orig-dist/glucose-3.0"),
        exclude_suffixes: strings(&["Main.cc", ".mk"]),
        clean_prefixes: Vec::new(),
        copy: SOLVER_DIRS.into_iter().map(CopyRule::dir).collect(),
        substitutions: vec![
            Substitution::new("#include \"", "#include \"../glucose30/"),
            Substitution::new("\"PRI", "\" PRI"),
        ],
        patches: vec![
            FilePatch {
                file: PathBuf::from("mtl/IntTypes.h"),
                edits: vec![insert_after(
                    "#define Glucose_",
                    &[
                        FORMAT_MACROS[0],
                        FORMAT_MACROS[1],
                        "#pragma GCC diagnostic ignored \"-Wparentheses\"",
                    ],
                )],
            },
            map_hash_hoist(),
            FilePatch {
                file: PathBuf::from("core/Solver.cc"),
                edits: vec![
                    Edit::CommentOut {
                        contains: "c last restart ## conflicts".to_string(),
                        marker: "// ".to_string(),
                    },
                    insert_after(
                        "using namespace Glucose",
                        &["#pragma GCC diagnostic ignored \"-Wsign-compare\""],
                    ),
                ],
            },
        ],
    }
}

/// lingeling (ALA variant) compiled as C++ inside `namespace LingelingALA`.
pub fn lingeling_ala() -> Recipe {
    Recipe {
        name: "lingeling-ala".to_string(),
        upstream: PathBuf::from("orig-dist"),
        exclude_suffixes: Vec::new(),
        clean_prefixes: strings(&["lglib."]),
        copy: vec![
            CopyRule::file("lglib.h", "lglib.hh", false),
            CopyRule::file("lglib.c", "lglib.cc", true),
        ],
        substitutions: vec![
            Substitution::new("and", "anD"),
            Substitution::new("xor", "xoR"),
            Substitution::new("new", "neW"),
            Substitution::new("#include \"lglib.h\"", "#include \"lglib.hh\""),
            Substitution::new("extern char ** environ;", "//extern char ** environ;"),
        ],
        patches: vec![
            FilePatch {
                file: PathBuf::from("lglib.hh"),
                edits: vec![
                    insert_after("#define LGL_UNSATISFIABLE", &["", "namespace LingelingALA {"]),
                    Edit::InsertBefore {
                        prefix: "#endif".to_string(),
                        lines: strings(&["}"]),
                        occurrence: Occurrence::Last,
                    },
                ],
            },
            FilePatch {
                file: PathBuf::from("lglib.cc"),
                edits: vec![
                    insert_after(
                        "#endif",
                        &[
                            "",
                            "#if defined(__APPLE__)",
                            "#include <crt_externs.h>",
                            "#define environ (*_NSGetEnviron())",
                            "#else",
                            "extern char ** environ;",
                            "#endif",
                            "",
                            "namespace LingelingALA {",
                            "",
                        ],
                    ),
                    Edit::Append {
                        lines: strings(&["}"]),
                    },
                ],
            },
        ],
    }
}

/// Hash helpers in `mtl/Map.h` must live inside the solver namespace.
fn map_hash_hoist() -> FilePatch {
    FilePatch {
        file: PathBuf::from("mtl/Map.h"),
        edits: vec![Edit::Hoist {
            prefix: MAP_HASH_PREFIX.to_string(),
            anchor: "namespace".to_string(),
        }],
    }
}

fn insert_after(prefix: &str, lines: &[&str]) -> Edit {
    Edit::InsertAfter {
        prefix: prefix.to_string(),
        lines: strings(lines),
        occurrence: Occurrence::First,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
