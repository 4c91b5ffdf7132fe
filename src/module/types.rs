//! Parsed module tree.
//!
//! A [`Module`] owns its imports, and every [`Import`] owns the private,
//! separately parsed [`Module`] it points at. Two import sites naming the
//! same file therefore never share evaluation state.

use std::collections::BTreeMap;

use crate::core::{Result, ShortError};
use crate::value::{Map, Value, only_entry};

/// A declared module parameter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamDef {
    /// Human-readable description, if one was given
    pub description: Option<String>,
    /// Value used when the caller does not supply the parameter
    pub default: Option<Value>,
}

/// Outcome of converting an evaluated export with the context's
/// raw-to-typed collaborator.
#[derive(Debug, Clone)]
pub enum TypedResult<T> {
    Typed(T),
    /// The conversion failed; holds a [`ShortError::ConversionFailed`].
    ConversionFailed(ShortError),
}

impl<T> TypedResult<T> {
    #[must_use]
    pub const fn is_typed(&self) -> bool {
        matches!(self, Self::Typed(_))
    }

    /// The typed value, if the conversion succeeded.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Typed(value) => Some(value),
            Self::ConversionFailed(_) => None,
        }
    }

    /// The conversion error, if the conversion failed.
    #[must_use]
    pub const fn error(&self) -> Option<&ShortError> {
        match self {
            Self::Typed(_) => None,
            Self::ConversionFailed(error) => Some(error),
        }
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Typed(value) => Ok(value),
            Self::ConversionFailed(error) => Err(error),
        }
    }
}

/// The exported resource of a module.
///
/// `raw` holds exactly one entry: the resource tag and its body. Before
/// evaluation the body still contains template holes; afterwards it is the
/// substituted tree.
#[derive(Debug, Clone)]
pub struct Export<T> {
    pub raw: Map,
    /// Set once, at the end of evaluation
    pub typed: Option<TypedResult<T>>,
}

/// Alias used where an export is talked about as a resource.
pub type Resource<T> = Export<T>;

impl<T> Export<T> {
    #[must_use]
    pub const fn new(raw: Map) -> Self {
        Self {
            raw,
            typed: None,
        }
    }

    /// The resource tag, e.g. `deployment`.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        only_entry(&self.raw).map(|(tag, _)| tag.as_str())
    }

    /// The body under the resource tag.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        only_entry(&self.raw).map(|(_, body)| body)
    }

    #[must_use]
    pub const fn typed(&self) -> Option<&TypedResult<T>> {
        self.typed.as_ref()
    }
}

/// Evaluation progress of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportState {
    #[default]
    Unevaluated,
    /// Its parameters are being resolved; reaching it again is a cycle
    Evaluating,
    Evaluated,
}

/// One entry of a module's `imports` list.
#[derive(Debug, Clone)]
pub struct Import<T> {
    /// Name under which the import is visible to template holes
    pub name: String,
    /// Resolved path of the imported document
    pub path: String,
    /// Parameter templates, resolved in the importer's scope
    pub params: Map,
    pub state: ImportState,
    pub module: Module<T>,
}

impl<T> Import<T> {
    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.state == ImportState::Evaluated
    }
}

/// A parsed (and possibly evaluated) module.
#[derive(Debug, Clone)]
pub struct Module<T> {
    pub path: String,
    pub imports: Vec<Import<T>>,
    pub params: BTreeMap<String, ParamDef>,
    pub evaluated: bool,
    pub export: Export<T>,
    /// Non-fatal problems found while parsing this module's imports
    pub diagnostics: Vec<String>,
}

impl<T> Module<T> {
    #[must_use]
    pub const fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    /// Find an import by name.
    #[must_use]
    pub fn import(&self, name: &str) -> Option<&Import<T>> {
        self.imports.iter().find(|import| import.name == name)
    }

    #[must_use]
    pub const fn typed_result(&self) -> Option<&TypedResult<T>> {
        self.export.typed()
    }

    /// Consume an evaluated module and return its typed value.
    ///
    /// Unlike evaluation, this treats a failed conversion as an error.
    pub fn into_typed(self) -> Result<T> {
        match self.export.typed {
            Some(typed) => typed.into_result(),
            None => Err(ShortError::Other {
                message: format!("Module {} has not been evaluated", self.path),
            }),
        }
    }

    /// Default values of all parameters that declare one.
    #[must_use]
    pub fn defaults(&self) -> Map {
        self.params
            .iter()
            .filter_map(|(name, def)| def.default.clone().map(|value| (name.clone(), value)))
            .collect()
    }

    /// This module's diagnostics followed by those of every import subtree.
    #[must_use]
    pub fn all_diagnostics(&self) -> Vec<String> {
        let mut all = self.diagnostics.clone();
        for import in &self.imports {
            all.extend(import.module.all_diagnostics());
        }
        all
    }
}
