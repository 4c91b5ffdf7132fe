//! Command-line interface for short modules
//!
//! # Commands
//!
//! - `eval` - Evaluate module files and print the resolved resources
//! - `imports` - Show the import tree (or dependency order) of a module file
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Debug logging
//! - `--quiet` / `-q` - Only log errors
//! - `--config` / `-c` - Use a specific configuration file
//!
//! `RUST_LOG` overrides both logging flags.
//!
//! # Examples
//!
//! ```bash
//! # Evaluate a module with a parameter
//! short eval deployment.short.yaml --param replicas=3
//!
//! # JSON output
//! short eval deployment.short.yaml -o json
//!
//! # Import tree, two levels deep
//! short imports deployment.short.yaml --depth 2
//! ```

mod eval;
mod imports;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::EngineConfig;

/// Main CLI structure for the `short` binary.
#[derive(Parser, Debug)]
#[command(
    name = "short",
    about = "Evaluate parameterized, importable Kubernetes shorthand modules",
    version,
    long_about = "Resolves module files that declare params and imports and use ${...} template holes, printing the fully substituted resources."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate module files and print the resolved resources
    Eval(eval::EvalCommand),

    /// Show the import tree of a module file
    Imports(imports::ImportsCommand),
}

impl Cli {
    /// Log level implied by `--verbose` / `--quiet`, used when `RUST_LOG`
    /// is not set.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    /// Load the configuration and run the selected command.
    pub fn execute(self) -> Result<()> {
        let config = EngineConfig::load(self.config.as_deref())?;
        let output = match &self.command {
            Commands::Eval(cmd) => cmd.render(&config)?,
            Commands::Imports(cmd) => cmd.render(&config)?,
        };
        print!("{output}");
        Ok(())
    }
}
