//! Reading module files.
//!
//! Module files are multi-document YAML: sections are separated by `---`
//! and every non-empty section must be a map.
//!
//! # Examples
//!
//! ```rust,no_run
//! use short_modules::utils::fs::read_yaml_documents;
//! use std::path::Path;
//!
//! let sections = read_yaml_documents(Path::new("deployment.short.yaml"))?;
//! println!("{} sections", sections.len());
//! # Ok::<(), short_modules::core::ShortError>(())
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::core::{Result, ShortError};
use crate::value::{Map, Value};

/// Reads a text file, reporting the path on failure.
pub fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| ShortError::ReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Reads every document section of a YAML file.
///
/// Empty sections are skipped. A section that is not a map is an
/// [`ShortError::InvalidDocument`]. Scalar map keys are read as strings;
/// list or map keys are an [`ShortError::InvalidMapKey`].
pub fn read_yaml_documents(path: &Path) -> Result<Vec<Map>> {
    let content = read_text_file(path)?;
    parse_yaml_documents(&content, &path.display().to_string())
}

/// Splits `content` into document sections; `path` is used in errors.
pub fn parse_yaml_documents(content: &str, path: &str) -> Result<Vec<Map>> {
    let mut documents = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let yaml = serde_yaml::Value::deserialize(document).map_err(|e| ShortError::ReadFailed {
            path: path.to_string(),
            reason: format!("invalid YAML in document {index}: {e}"),
        })?;
        let value = Value::from_yaml(yaml).map_err(|e| ShortError::InvalidMapKey {
            path: path.to_string(),
            index,
            found: e.found.to_string(),
        })?;

        match value {
            Value::Null => {}
            Value::Map(map) => documents.push(map),
            other => {
                return Err(ShortError::InvalidDocument {
                    path: path.to_string(),
                    index,
                    found: other.type_name().to_string(),
                });
            }
        }
    }

    Ok(documents)
}
