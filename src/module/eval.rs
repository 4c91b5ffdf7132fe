//! Lazy module evaluation.
//!
//! Evaluating a module substitutes the template holes of its export. Each
//! hole that names an import evaluates that import on first reference, so
//! imports are evaluated in demand order and at most once, and imports that
//! are never referenced are never evaluated. Callers do not need to compute
//! an import order up front.

use super::context::EvalContext;
use super::resolver::ScopeResolver;
use super::types::Module;
use crate::core::{Result, ShortError};
use crate::template::substitute_map;
use crate::template::suggest::similar_names;
use crate::value::Map;

impl<T> EvalContext<T> {
    /// Evaluate `module` with the given parameter values.
    ///
    /// Declared defaults are merged under `params` into a new map; `params`
    /// itself is never modified. A module that is already evaluated is left
    /// untouched.
    ///
    /// A failing raw-to-typed conversion does not fail evaluation: it is
    /// recorded as [`super::TypedResult::ConversionFailed`]. Use
    /// [`Module::into_typed`] to treat it as an error.
    pub fn evaluate_module(&self, module: &mut Module<T>, params: &Map) -> Result<()> {
        if module.evaluated {
            return Ok(());
        }
        tracing::debug!("Evaluating module {}", module.path);

        let effective = effective_params(module, params);
        let raw = {
            let mut resolver =
                ScopeResolver::new(self, &module.path, &effective, &mut module.imports);
            substitute_map(&module.export.raw, &mut resolver)?
        };

        module.export.raw = raw;
        module.export.typed = Some(self.convert(&module.path, &module.export.raw));
        module.evaluated = true;
        Ok(())
    }

    /// Evaluate the import `name` of `importer`.
    ///
    /// `params` are the importer's parameter values; the import's own
    /// parameter templates are resolved against the importer's scope built
    /// from them.
    pub fn evaluate_import(&self, importer: &mut Module<T>, params: &Map, name: &str) -> Result<()> {
        let Some(index) = importer.imports.iter().position(|import| import.name == name) else {
            return Err(ShortError::UnknownIdentifier {
                ident: name.to_string(),
                module: importer.path.clone(),
                suggestions: similar_names(
                    name,
                    importer.imports.iter().map(|import| import.name.as_str()),
                ),
            });
        };

        let effective = effective_params(importer, params);
        let mut resolver =
            ScopeResolver::new(self, &importer.path, &effective, &mut importer.imports);
        resolver.evaluate_import(index)
    }

    /// Parse `path` and evaluate every section with `params`.
    pub fn evaluate(&self, path: &str, params: &Map) -> Result<Vec<Module<T>>> {
        let mut modules = self.parse(path)?;
        for module in &mut modules {
            self.evaluate_module(module, params)?;
        }
        Ok(modules)
    }
}

/// Declared defaults overridden by the supplied values.
fn effective_params<T>(module: &Module<T>, params: &Map) -> Map {
    let mut effective = module.defaults();
    effective.extend(params.iter().map(|(key, value)| (key.clone(), value.clone())));
    effective
}
