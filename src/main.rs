//! `short` - evaluate parameterized Kubernetes shorthand modules.
//!
//! This is the binary entry point. It parses arguments, sets up logging and
//! turns failures into user-friendly error messages with a non-zero exit
//! status.

use clap::Parser;
use short_modules::cli;
use short_modules::core::user_friendly_error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = cli::Cli::parse();

    // RUST_LOG wins over --verbose/--quiet
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        // Convert to user-friendly error with context and suggestions
        let error_ctx = user_friendly_error(e);
        error_ctx.display();
        std::process::exit(1);
    }
}
