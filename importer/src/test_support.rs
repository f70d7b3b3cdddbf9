//! Test-only helpers: scratch vendor directories and miniature upstream
//! checkouts shaped like the real solver distributions.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Temporary vendor directory; removed on drop.
pub struct VendorDir {
    _temp: TempDir,
    root: PathBuf,
}

impl VendorDir {
    /// Vendor directory at the temp root.
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        let root = temp.path().to_path_buf();
        Ok(Self { _temp: temp, root })
    }

    /// Vendor directory named `name` (so recipe inference by name works).
    pub fn named(name: &str) -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        let root = temp.path().join(name);
        fs::create_dir(&root).with_context(|| format!("create {}", root.display()))?;
        Ok(Self { _temp: temp, root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: impl AsRef<[u8]>) -> Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))
    }

    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.root.join(relative);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    pub fn read_bytes(&self, relative: &str) -> Result<Vec<u8>> {
        let path = self.root.join(relative);
        fs::read(&path).with_context(|| format!("read {}", path.display()))
    }

    /// Symlink `relative` to `target` (relative to the vendor root).
    #[cfg(unix)]
    pub fn symlink(&self, target: &str, relative: &str) -> Result<()> {
        let link = self.root.join(relative);
        std::os::unix::fs::symlink(self.root.join(target), &link)
            .with_context(|| format!("symlink {}", link.display()))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }
}

/// Populate `orig-dist/minisat` with a minisat-shaped tree.
pub fn minisat_upstream(vendor: &VendorDir) -> Result<()> {
    let base = "orig-dist/minisat";
    vendor.write(
        &format!("{base}/core/SolverTypes.h"),
        "#ifndef Minisat_SolverTypes_h\n#define Minisat_SolverTypes_h\n\n#include <assert.h>\n\n#include \"minisat/mtl/IntTypes.h\"\n\nnamespace Minisat {\nstruct Lit { int x; };\n}\n\n#endif\n",
    )?;
    vendor.write(
        &format!("{base}/core/Solver.cc"),
        "#include \"minisat/core/Solver.h\"\n\nusing namespace Minisat;\n\nvoid Minisat::Solver::stats() { printf(\"%\"PRIu64\"\\n\", conflicts); }\n",
    )?;
    vendor.write(
        &format!("{base}/core/Main.cc"),
        "#include \"minisat/core/Solver.h\"\nint main() { Minisat::Solver s; }\n",
    )?;
    vendor.write(
        &format!("{base}/simp/SimpSolver.cc"),
        "#include \"minisat/simp/SimpSolver.h\"\n\nusing namespace Minisat;\n",
    )?;
    vendor.write(&format!("{base}/simp/Main.cc"), "int main() {}\n")?;
    vendor.write(
        &format!("{base}/utils/Options.h"),
        "#ifndef Minisat_Options_h\n#define Minisat_Options_h\n\nnamespace Minisat {\n}\n\n#endif\n",
    )?;
    vendor.write(
        &format!("{base}/mtl/IntTypes.h"),
        "#ifndef Minisat_IntTypes_h\n#define Minisat_IntTypes_h\n\n#include <stdint.h>\n\n#endif\n",
    )?;
    vendor.write(&format!("{base}/mtl/Map.h"), &map_header("Minisat", "minisat/"))?;
    vendor.write(&format!("{base}/mtl/Makefile"), "all:\n")?;
    Ok(())
}

/// Populate `orig-dist/glucose-3.0` with a glucose-shaped tree.
pub fn glucose_upstream(vendor: &VendorDir) -> Result<()> {
    let base = "orig-dist/glucose-3.0";
    vendor.write(
        &format!("{base}/core/Solver.cc"),
        "#include <math.h>\n\n#include \"mtl/Sort.h\"\n#include \"core/Solver.h\"\n\nusing namespace Glucose;\n\nvoid Solver::stats() {\n    printf(\"c last restart ## conflicts  :  %d %d \\n\", conflicts, lastblockatrestart);\n    printf(\"%\"PRIu64\"\\n\", conflicts);\n}\n",
    )?;
    vendor.write(&format!("{base}/core/Main.cc"), "int main() {}\n")?;
    vendor.write(&format!("{base}/core/depend.mk"), "Solver.o: Solver.cc\n")?;
    vendor.write(
        &format!("{base}/simp/SimpSolver.cc"),
        "#include \"simp/SimpSolver.h\"\n",
    )?;
    vendor.write(&format!("{base}/utils/System.h"), "#include \"mtl/IntTypes.h\"\n")?;
    vendor.write(
        &format!("{base}/mtl/IntTypes.h"),
        "#ifndef Glucose_IntTypes_h\n#define Glucose_IntTypes_h\n\n#include <stdint.h>\n\n#endif\n",
    )?;
    vendor.write(&format!("{base}/mtl/Map.h"), &map_header("Glucose", ""))?;
    vendor.write(&format!("{base}/mtl/template.mk"), "CXX ?= g++\n")?;
    Ok(())
}

/// Populate `orig-dist` with the two lingeling library files.
pub fn lingeling_upstream(vendor: &VendorDir) -> Result<()> {
    vendor.write(
        "orig-dist/lglib.h",
        "#ifndef lglib_h_INCLUDED\n#define lglib_h_INCLUDED\n\n#include <stdio.h>\n\n#define LGL_UNKNOWN 0\n#define LGL_SATISFIABLE 10\n#define LGL_UNSATISFIABLE 20\n\ntypedef struct LGL LGL;\n\nLGL * lglinit (void);\n\n#endif\n",
    )?;
    vendor.write(
        "orig-dist/lglib.c",
        "#include \"lglib.h\"\n\n#ifndef NLGLOG\n#define LOG(...) do { } while (0)\n#endif\n\nextern char ** environ;\n\nint lglxor (int a, int b) { return a && b; }\nstatic void * lglnew (LGL * lgl) { return lgl; }\n",
    )?;
    vendor.write("orig-dist/lglbnr.c", "int main () { return 0; }\n")?;
    Ok(())
}

fn map_header(namespace: &str, include_prefix: &str) -> String {
    format!(
        "#ifndef {namespace}_Map_h\n#define {namespace}_Map_h\n\n#include \"{include_prefix}mtl/IntTypes.h\"\n\nstatic inline uint32_t hash(uint32_t x){{ return x; }}\nstatic inline uint32_t hash(uint64_t x){{ return (uint32_t)x; }}\n\nnamespace {namespace} {{\n\ntemplate<class K> struct Hash {{ uint32_t operator()(const K& k) const {{ return hash(k); }} }};\n\n}}\n#endif\n"
    )
}
