//! Identifier resolution within a module scope.
//!
//! A module scope sees two kinds of names: its effective parameters and its
//! imports. Parameters are looked up first, so a parameter shadows an import
//! of the same name. Looking up an import evaluates it on first use.

use super::context::EvalContext;
use super::types::{Import, ImportState};
use crate::core::{Result, ShortError};
use crate::template::path::{index_path, split_ident};
use crate::template::suggest::similar_names;
use crate::template::{Resolver, substitute_map};
use crate::value::{Map, Value, only_entry};

/// Resolver for the template holes of one module.
///
/// Borrows the module's import list mutably so that imports can be
/// evaluated (and memoized) while the module's export is being substituted.
pub struct ScopeResolver<'a, T> {
    ctx: &'a EvalContext<T>,
    module_path: &'a str,
    params: &'a Map,
    imports: &'a mut [Import<T>],
    /// Indices of the imports being evaluated, outermost first
    evaluating: Vec<usize>,
}

impl<'a, T> ScopeResolver<'a, T> {
    pub fn new(
        ctx: &'a EvalContext<T>,
        module_path: &'a str,
        params: &'a Map,
        imports: &'a mut [Import<T>],
    ) -> Self {
        Self {
            ctx,
            module_path,
            params,
            imports,
            evaluating: Vec::new(),
        }
    }

    /// Evaluate the import at `index` unless that already happened.
    ///
    /// The import's parameter templates are resolved against this scope,
    /// then its module is evaluated with the result. On failure the import
    /// goes back to [`ImportState::Unevaluated`].
    pub fn evaluate_import(&mut self, index: usize) -> Result<()> {
        match self.imports[index].state {
            ImportState::Evaluated => return Ok(()),
            ImportState::Evaluating => return Err(self.evaluation_cycle(index)),
            ImportState::Unevaluated => {}
        }

        tracing::debug!(
            "Evaluating import '{}' of {} ({})",
            self.imports[index].name,
            self.module_path,
            self.imports[index].path
        );

        self.imports[index].state = ImportState::Evaluating;
        self.evaluating.push(index);
        let result = self.evaluate_import_module(index);
        self.evaluating.pop();
        self.imports[index].state = if result.is_ok() {
            ImportState::Evaluated
        } else {
            ImportState::Unevaluated
        };
        result
    }

    fn evaluate_import_module(&mut self, index: usize) -> Result<()> {
        let templates = self.imports[index].params.clone();
        let params = substitute_map(&templates, self)?;
        let ctx = self.ctx;
        ctx.evaluate_module(&mut self.imports[index].module, &params)
    }

    fn evaluation_cycle(&self, index: usize) -> ShortError {
        let start = self.evaluating.iter().position(|&i| i == index).unwrap_or(0);
        let mut chain: Vec<&str> = self.evaluating[start..]
            .iter()
            .map(|&i| self.imports[i].name.as_str())
            .collect();
        chain.push(&self.imports[index].name);
        ShortError::CyclicImport {
            chain: format!("{}: {}", self.module_path, chain.join(" → ")),
        }
    }

    fn unknown_identifier(&self, ident: &str, head: &str) -> ShortError {
        let names = self
            .params
            .keys()
            .map(String::as_str)
            .chain(self.imports.iter().map(|import| import.name.as_str()));
        ShortError::UnknownIdentifier {
            ident: ident.to_string(),
            module: self.module_path.to_string(),
            suggestions: similar_names(head, names),
        }
    }
}

impl<T> Resolver for ScopeResolver<'_, T> {
    fn resolve(&mut self, ident: &str) -> Result<Value> {
        let (head, segments) = split_ident(ident);

        if let Some(value) = self.params.get(head) {
            return index_path(value, ident, &segments);
        }

        let Some(index) = self.imports.iter().position(|import| import.name == head) else {
            return Err(self.unknown_identifier(ident, head));
        };

        self.evaluate_import(index)?;

        let import = &self.imports[index];
        let (_, body) = only_entry(&import.module.export.raw).ok_or_else(|| {
            ShortError::InvalidImportExport {
                name: import.name.clone(),
                module: self.module_path.to_string(),
            }
        })?;
        index_path(body, ident, &segments)
    }
}
