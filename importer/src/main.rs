//! `vendor-import`: refresh a vendored SAT-solver tree from its upstream
//! checkout.
//!
//! Run without arguments from inside the vendor directory (e.g.
//! `extsrc/minisat-gh`); the recipe is taken from `vendor-import.toml` or
//! inferred from the directory name.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use importer::{cli, exit_codes, logging};

#[derive(Parser)]
#[command(
    name = "vendor-import",
    version,
    about = "Copy and patch upstream SAT-solver sources into a vendor directory"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Reset target directories, copy upstream files, substitute and patch.
    Run(RecipeArgs),
    /// Print a SHA-256 digest of the vendored files.
    Digest(RecipeArgs),
    /// List built-in recipes.
    List,
    /// Print a built-in recipe as TOML.
    Show {
        /// Built-in recipe name.
        name: String,
        /// Write the recipe to this file instead of stdout.
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct RecipeArgs {
    /// Built-in recipe name (default: inferred from the vendor directory).
    recipe: Option<String>,
    /// Recipe file to use instead of a built-in.
    #[arg(long, conflicts_with = "recipe")]
    config: Option<PathBuf>,
    /// Vendor directory (default: current directory).
    #[arg(long)]
    root: Option<PathBuf>,
}

impl RecipeArgs {
    fn root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().context("resolve current directory"),
        }
    }
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::FAILED
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let parsed = Cli::parse();
    match parsed
        .command
        .unwrap_or_else(|| Command::Run(RecipeArgs::default()))
    {
        Command::Run(args) => cli::run(
            &args.root()?,
            args.recipe.as_deref(),
            args.config.as_deref(),
        ),
        Command::Digest(args) => cli::digest(
            &args.root()?,
            args.recipe.as_deref(),
            args.config.as_deref(),
        ),
        Command::List => cli::list(),
        Command::Show { name, write } => cli::show(&name, write.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_no_arguments() {
        let cli = Cli::parse_from(["vendor-import"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_run_with_recipe_and_root() {
        let cli = Cli::parse_from(["vendor-import", "run", "glucose30", "--root", "extsrc"]);
        let Some(Command::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.recipe.as_deref(), Some("glucose30"));
        assert_eq!(args.root, Some(PathBuf::from("extsrc")));
    }

    #[test]
    fn recipe_and_config_conflict() {
        let result = Cli::try_parse_from([
            "vendor-import",
            "run",
            "glucose30",
            "--config",
            "vendor-import.toml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_show_with_write() {
        let cli = Cli::parse_from([
            "vendor-import",
            "show",
            "glucose30",
            "--write",
            "vendor-import.toml",
        ]);
        let Some(Command::Show { name, write }) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(name, "glucose30");
        assert_eq!(write, Some(PathBuf::from("vendor-import.toml")));
    }
}
