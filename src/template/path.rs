//! Dotted-path lookups inside template identifiers.
//!
//! `${web.spec.containers.0.image}` names the value `web` and then walks
//! `spec → containers → 0 → image` through it. Map segments are keys, list
//! segments are zero-based integers.

use crate::core::{Result, ShortError};
use crate::value::Value;

/// Split an identifier into its head name and the remaining path segments.
#[must_use]
pub fn split_ident(ident: &str) -> (&str, Vec<&str>) {
    match ident.split_once('.') {
        Some((head, rest)) => (head, rest.split('.').collect()),
        None => (ident, Vec::new()),
    }
}

/// Walk `segments` through `base` and return a copy of the value found.
///
/// `ident` is only used for error messages.
pub fn index_path(base: &Value, ident: &str, segments: &[&str]) -> Result<Value> {
    let mut current = base;

    for segment in segments {
        current = match current {
            Value::Map(map) => map.get(*segment).ok_or_else(|| {
                invalid_index(ident, segment, format!("no key '{segment}' in map"))
            })?,
            Value::List(list) => {
                let index: usize = segment.parse().map_err(|_| {
                    invalid_index(
                        ident,
                        segment,
                        "list indices must be non-negative integers".to_string(),
                    )
                })?;
                list.get(index).ok_or_else(|| {
                    invalid_index(
                        ident,
                        segment,
                        format!("index {index} out of range for list of length {}", list.len()),
                    )
                })?
            }
            scalar => {
                return Err(invalid_index(
                    ident,
                    segment,
                    format!("cannot index into a {}", scalar.type_name()),
                ));
            }
        };
    }

    Ok(current.clone())
}

fn invalid_index(ident: &str, segment: &str, reason: String) -> ShortError {
    ShortError::InvalidPathIndex {
        ident: ident.to_string(),
        segment: segment.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Value {
        serde_yaml::from_str(
            r#"
blah: bleh
doot:
  - what: hello
count: 3
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_split_ident() {
        assert_eq!(split_ident("x"), ("x", vec![]));
        assert_eq!(split_ident("x.doot.0.what"), ("x", vec!["doot", "0", "what"]));
    }

    #[test]
    fn test_index_map_and_list() {
        let value = doc();
        assert_eq!(index_path(&value, "x.blah", &["blah"]).unwrap(), Value::from("bleh"));
        assert_eq!(
            index_path(&value, "x.doot.0.what", &["doot", "0", "what"]).unwrap(),
            Value::from("hello")
        );
        assert_eq!(index_path(&value, "x", &[]).unwrap(), value);
    }

    #[test]
    fn test_missing_key() {
        let err = index_path(&doc(), "x.nope", &["nope"]).unwrap_err();
        match err {
            ShortError::InvalidPathIndex {
                segment,
                ..
            } => assert_eq!(segment, "nope"),
            other => panic!("Expected InvalidPathIndex, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_and_non_integer() {
        let value = doc();
        let err = index_path(&value, "x.doot.5", &["doot", "5"]).unwrap_err();
        assert!(err.to_string().contains("'5'"));

        let err = index_path(&value, "x.doot.first", &["doot", "first"]).unwrap_err();
        assert!(matches!(err, ShortError::InvalidPathIndex { .. }));
    }

    #[test]
    fn test_index_into_scalar() {
        let err = index_path(&doc(), "x.count.value", &["count", "value"]).unwrap_err();
        match err {
            ShortError::InvalidPathIndex {
                reason,
                ..
            } => assert_eq!(reason, "cannot index into a number"),
            other => panic!("Expected InvalidPathIndex, got {other:?}"),
        }
    }
}
