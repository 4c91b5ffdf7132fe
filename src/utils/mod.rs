//! Utilities shared by the library and the CLI.
//!
//! # Modules
//!
//! - [`fs`] - reading module files and resolving import paths

pub mod fs;

pub use fs::{normalize_path, read_yaml_documents, resolve_relative_path};
