//! Untyped document tree for parsed YAML/JSON modules.
//!
//! Every module body, parameter value and import parameter expression is held
//! as a [`Value`]. The tree mirrors what a YAML or JSON document can express:
//! maps with string keys, lists, strings, numbers, booleans and null.
//!
//! Maps are kept in a [`BTreeMap`] so that rendered output has a stable key
//! order regardless of how the source document was written.
//!
//! # Examples
//!
//! ```rust
//! use short_modules::value::Value;
//!
//! let value: Value = serde_yaml::from_str("replicas: 3\nname: web").unwrap();
//! let map = value.as_map().unwrap();
//! assert_eq!(map["replicas"], Value::from(3));
//! assert_eq!(map["name"].as_str(), Some("web"));
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A map of string keys to values, as found at every level of a module.
pub type Map = BTreeMap<String, Value>;

/// A node of a parsed document.
///
/// Deserialization accepts any YAML document. Scalar map keys are turned
/// into strings (`80: x` has the key `"80"`); list and map keys are
/// rejected with [`NonScalarKey`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// YAML `~`/`null`, JSON `null`
    #[default]
    Null,
    Bool(bool),
    /// Integer or floating point number, preserved as written
    Number(serde_yaml::Number),
    String(String),
    List(Vec<Value>),
    Map(Map),
}

impl Value {
    /// Short lowercase name of the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for null, bool and number nodes, which never contain
    /// template holes.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Value::Null | Value::Bool(_) | Value::Number(_))
    }

    /// Convert into a `serde_json::Value`.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A map key that has no string form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("map keys must be strings, numbers or bools, found a {found} key")]
pub struct NonScalarKey {
    /// Type of the offending key
    pub found: &'static str,
}

impl Value {
    /// Convert a decoded YAML value, stringifying scalar map keys.
    ///
    /// YAML tags are dropped and their inner value kept.
    pub fn from_yaml(yaml: serde_yaml::Value) -> Result<Self, NonScalarKey> {
        Ok(match yaml {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => Value::Number(n),
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(items) => {
                Value::List(items.into_iter().map(Value::from_yaml).collect::<Result<_, _>>()?)
            }
            serde_yaml::Value::Mapping(mapping) => Value::Map(
                mapping
                    .into_iter()
                    .map(|(key, value)| Ok((map_key(key)?, Value::from_yaml(value)?)))
                    .collect::<Result<_, _>>()?,
            ),
            serde_yaml::Value::Tagged(tagged) => Value::from_yaml(tagged.value)?,
        })
    }
}

fn map_key(key: serde_yaml::Value) -> Result<String, NonScalarKey> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(format_number(&n)),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => map_key(tagged.value),
        serde_yaml::Value::Null => Err(NonScalarKey {
            found: "null",
        }),
        serde_yaml::Value::Sequence(_) => Err(NonScalarKey {
            found: "list",
        }),
        serde_yaml::Value::Mapping(_) => Err(NonScalarKey {
            found: "map",
        }),
    }
}

/// Text form of a number for map keys and string fills.
///
/// Floats with an integral value print without a fraction (`1.0` is `1`,
/// `1.5e3` is `1500`); everything else uses the number's own formatting.
#[must_use]
pub fn format_number(n: &serde_yaml::Number) -> String {
    if n.is_f64()
        && let Some(f) = n.as_f64()
        && f.fract() == 0.0
        && f.abs() < 1e15
    {
        return format!("{}", f as i64);
    }
    n.to_string()
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let yaml = serde_yaml::Value::deserialize(deserializer)?;
        Value::from_yaml(yaml).map_err(serde::de::Error::custom)
    }
}

/// Returns the single entry of `map`, or `None` if it has zero or several.
///
/// Module exports are always wrapped in exactly one resource tag, e.g.
/// `deployment: {...}`; this unwraps that tag.
#[must_use]
pub fn only_entry(map: &Map) -> Option<(&String, &Value)> {
    if map.len() == 1 {
        map.iter().next()
    } else {
        None
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            other => match serde_json::to_string(other) {
                Ok(json) => write!(f, "{json}"),
                Err(_) => write!(f, "<{}>", other.type_name()),
            },
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(i64::from(n).into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(list: Vec<Value>) -> Self {
        Value::List(list)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}
