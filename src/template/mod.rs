//! Template hole substitution.
//!
//! Template holes are written `${NAME}` inside string scalars and are filled
//! from a [`Resolver`]. There are three substitution modes:
//!
//! - **Expand**: a string that is exactly one hole, e.g. `replicas: ${count}`,
//!   is replaced by the resolved value itself. Its type is preserved, so
//!   numbers stay numbers and lists or maps are inserted as structure.
//! - **Fill**: holes embedded in a larger string, e.g. `"web-${env}"`, are
//!   resolved one by one and converted to text. Only strings and numbers can
//!   be filled this way.
//! - **Spread**: a list element written `${NAME...}` must resolve to a list,
//!   whose elements are spliced into the surrounding list in place of that
//!   element.
//!
//! Identifiers may carry a dotted path (`${web.ports.0}`), see [`path`].
//!
//! Substitution never mutates its input; it builds a new tree, so the same
//! template can be substituted any number of times.
//!
//! # Examples
//!
//! ```rust
//! use short_modules::template::{ParamsResolver, substitute};
//! use short_modules::value::{Map, Value};
//!
//! let template: Value = serde_yaml::from_str("list: [a, '${xs...}', d]\nname: 'app-${n}'").unwrap();
//! let params: Map = serde_yaml::from_str("xs: [b, c]\nn: 5").unwrap();
//!
//! let result = substitute(&template, &mut ParamsResolver::new(&params)).unwrap();
//! let expected: Value = serde_yaml::from_str("list: [a, b, c, d]\nname: app-5").unwrap();
//! assert_eq!(result, expected);
//! ```

pub mod path;
pub mod suggest;

use regex::Regex;
use std::sync::LazyLock;

use crate::core::{Result, ShortError};
use crate::value::{Map, Value, format_number};

/// A string that is exactly one hole.
static EXPAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\{([^{}]*)\}$").expect("expand pattern is valid"));

/// A list element that is exactly one spread hole.
static SPREAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\{([^{}]*)\.\.\.\}$").expect("spread pattern is valid"));

/// Any hole inside a string.
static FILL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^{}]*)\}").expect("fill pattern is valid"));

/// Supplies the value for a template identifier.
///
/// Resolution takes `&mut self` because module scopes evaluate imports on
/// first use. Any `FnMut(&str) -> Result<Value>` closure is a resolver.
pub trait Resolver {
    /// Resolve `ident` (including any dotted path) to a value.
    fn resolve(&mut self, ident: &str) -> Result<Value>;
}

impl<F> Resolver for F
where
    F: FnMut(&str) -> Result<Value>,
{
    fn resolve(&mut self, ident: &str) -> Result<Value> {
        self(ident)
    }
}

/// Resolver over a plain parameter map.
///
/// Used for parameter-only substitution; module scopes use
/// [`crate::module::ScopeResolver`], which also knows about imports.
pub struct ParamsResolver<'a> {
    params: &'a Map,
    scope: String,
}

impl<'a> ParamsResolver<'a> {
    #[must_use]
    pub fn new(params: &'a Map) -> Self {
        Self {
            params,
            scope: "<params>".to_string(),
        }
    }

    /// Name the scope in error messages (e.g. a file path).
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }
}

/// Build a resolver over a plain parameter map.
#[must_use]
pub fn resolver_for_params(params: &Map) -> ParamsResolver<'_> {
    ParamsResolver::new(params)
}

impl Resolver for ParamsResolver<'_> {
    fn resolve(&mut self, ident: &str) -> Result<Value> {
        let (head, segments) = path::split_ident(ident);
        match self.params.get(head) {
            Some(value) => path::index_path(value, ident, &segments),
            None => Err(ShortError::UnknownIdentifier {
                ident: ident.to_string(),
                module: self.scope.clone(),
                suggestions: suggest::similar_names(head, self.params.keys().map(String::as_str)),
            }),
        }
    }
}

/// Substitute every hole in `template`, returning a new tree.
pub fn substitute<R>(template: &Value, resolver: &mut R) -> Result<Value>
where
    R: Resolver + ?Sized,
{
    match template {
        Value::String(s) => substitute_string(s, resolver),
        Value::List(list) => substitute_list(list, resolver).map(Value::List),
        Value::Map(map) => substitute_map(map, resolver).map(Value::Map),
        // No template holes in other data types.
        scalar => Ok(scalar.clone()),
    }
}

/// Substitute every hole in the values of `template`. Keys are left as-is.
pub fn substitute_map<R>(template: &Map, resolver: &mut R) -> Result<Map>
where
    R: Resolver + ?Sized,
{
    template
        .iter()
        .map(|(key, value)| Ok((key.clone(), substitute(value, resolver)?)))
        .collect()
}

fn substitute_list<R>(template: &[Value], resolver: &mut R) -> Result<Vec<Value>>
where
    R: Resolver + ?Sized,
{
    let mut result = Vec::with_capacity(template.len());

    for element in template {
        // Spread has to be detected before generic substitution, which would
        // treat `${xs...}` as an expand of the identifier `xs...`.
        if let Some(ident) = element.as_str().and_then(spread_ident) {
            tracing::trace!("Spreading ${{{ident}...}}");
            match resolver.resolve(ident)? {
                Value::List(items) => result.extend(items),
                other => {
                    return Err(ShortError::SpreadTypeMismatch {
                        hole: ident.to_string(),
                        found: other.type_name().to_string(),
                    });
                }
            }
        } else {
            result.push(substitute(element, resolver)?);
        }
    }

    Ok(result)
}

fn substitute_string<R>(template: &str, resolver: &mut R) -> Result<Value>
where
    R: Resolver + ?Sized,
{
    if let Some(ident) = expand_ident(template) {
        tracing::trace!("Expanding ${{{ident}}}");
        return resolver.resolve(ident);
    }

    if FILL_RE.is_match(template) {
        return fill_string(template, resolver).map(Value::String);
    }

    Ok(Value::String(template.to_string()))
}

/// Resolve every hole of a partially templated string and join the text.
///
/// The first failing hole aborts the fill.
fn fill_string<R>(template: &str, resolver: &mut R) -> Result<String>
where
    R: Resolver + ?Sized,
{
    let mut result = String::with_capacity(template.len());
    let mut last = 0;

    for caps in FILL_RE.captures_iter(template) {
        let (Some(hole), Some(ident)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        result.push_str(&template[last..hole.start()]);
        tracing::trace!("Filling ${{{}}}", ident.as_str());

        match resolver.resolve(ident.as_str())? {
            Value::String(s) => result.push_str(&s),
            Value::Number(n) => result.push_str(&format_number(&n)),
            other => {
                return Err(ShortError::FillTypeMismatch {
                    hole: ident.as_str().to_string(),
                    template: template.to_string(),
                    found: other.type_name().to_string(),
                });
            }
        }
        last = hole.end();
    }

    result.push_str(&template[last..]);
    Ok(result)
}

/// The identifier of a whole-value hole, if `s` is one.
#[must_use]
pub fn expand_ident(s: &str) -> Option<&str> {
    EXPAND_RE.captures(s).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// The identifier of a spread hole, if `s` is one.
#[must_use]
pub fn spread_ident(s: &str) -> Option<&str> {
    SPREAD_RE.captures(s).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}
