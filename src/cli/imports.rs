//! `short imports`: show how a module file's imports fit together.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fmt::Write;
use std::path::PathBuf;

use crate::config::EngineConfig;
use crate::module::{EvalContext, ImportGraph};

/// Show the import tree of a module file.
///
/// Only parses; nothing is evaluated, so modules with required parameters
/// can be inspected without supplying them.
#[derive(Args, Debug)]
pub struct ImportsCommand {
    /// Module file to inspect
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Show at most this many levels of imports
    #[arg(short, long)]
    depth: Option<usize>,

    /// Print modules in dependency order (imports first) instead of a tree
    #[arg(long)]
    order: bool,
}

impl ImportsCommand {
    pub fn render(&self, config: &EngineConfig) -> Result<String> {
        let ctx = config.apply(EvalContext::for_files(|_| Ok(())));
        let path = self.file.to_string_lossy();
        let modules =
            ctx.parse(&path).with_context(|| format!("Failed to parse {}", self.file.display()))?;

        let mut output = String::new();
        for (index, module) in modules.iter().enumerate() {
            if modules.len() > 1 {
                writeln!(output, "# section {index} ({})", module.export.tag().unwrap_or("?"))?;
            }

            let graph = ImportGraph::from_module(module);
            if self.order {
                for path in graph.dependency_order()? {
                    writeln!(output, "{path}")?;
                }
            } else {
                output.push_str(&graph.to_tree_string(&module.path, self.depth));
            }

            for diagnostic in module.all_diagnostics() {
                eprintln!("{}: {diagnostic}", "warning".yellow());
            }
        }

        Ok(output)
    }
}
