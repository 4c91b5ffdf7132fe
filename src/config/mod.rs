//! Configuration for the evaluation engine and the `short` CLI.
//!
//! Settings live in an optional TOML file. The first of these that applies
//! is used:
//!
//! 1. the path given with `--config`
//! 2. the path in the `SHORT_CONFIG` environment variable
//! 3. `~/.short/config.toml` (`%LOCALAPPDATA%\short\config.toml` on Windows)
//!
//! A missing file means built-in defaults.
//!
//! ```toml
//! # Cache decoded module files while evaluating
//! cache_documents = true
//!
//! # Maximum import nesting depth
//! max_import_depth = 64
//!
//! # Default output format of `short eval` ("yaml" or "json")
//! output = "yaml"
//! ```

pub mod engine;

pub use engine::{EngineConfig, OutputFormat};
