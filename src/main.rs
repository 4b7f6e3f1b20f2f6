//! Gofish-Rust: check Go game records.
//!
//! ## Usage
//!
//! - `gofish-rust check <FILES>...` - Parse SGF files and report irregular moves
//! - `gofish-rust check --main-line-only <FILES>...` - Ignore variations
//!
//! Logging honours `RUST_LOG`; `--verbose` raises the default level to debug.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use gofish_rust::sgf::load_file;
use gofish_rust::validate::{check_main_line, check_tree};

/// Gofish-Rust: SGF reader and game record checker
#[derive(Parser)]
#[command(name = "gofish-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse SGF files and report moves that break the rules
    Check {
        /// Only check the first line of play in each game
        #[arg(long)]
        main_line_only: bool,

        /// SGF files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Check {
            main_line_only,
            files,
        } => {
            let mut failed = false;
            for path in &files {
                if let Err(e) = check_file(path, main_line_only) {
                    error!("{e:#}");
                    failed = true;
                }
            }
            if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}

fn check_file(path: &Path, main_line_only: bool) -> Result<()> {
    let mut games =
        load_file(path).with_context(|| format!("failed to load {}", path.display()))?;

    for (i, tree) in games.iter_mut().enumerate() {
        let found = if main_line_only {
            check_main_line(tree)
        } else {
            check_tree(tree)
        };
        let root = tree.root();
        info!(
            file = %path.display(),
            game = i + 1,
            nodes = tree.len(),
            width = tree.width(root),
            height = tree.height(root),
            irregular = found.len(),
            "checked game"
        );
        for irregularity in &found {
            warn!(file = %path.display(), game = i + 1, "{irregularity}");
        }
    }
    Ok(())
}
