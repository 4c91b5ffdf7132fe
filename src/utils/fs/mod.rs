//! File system helpers behind [`crate::module::EvalContext::for_files`].
//!
//! - [`formats`] - reading multi-document YAML module files
//! - [`paths`] - normalizing paths and resolving relative import paths

pub mod formats;
pub mod paths;

pub use formats::{parse_yaml_documents, read_text_file, read_yaml_documents};
pub use paths::{normalize_path, resolve_relative_path};
