//! Module document parsing.
//!
//! A module document has up to three parts:
//!
//! ```yaml
//! imports:
//! - db: ./postgres.short.yaml
//!   params:
//!     version: ${pg_version}
//! params:
//! - name
//! - pg_version: Postgres image tag
//!   default: "16"
//! deployment:
//!   name: ${name}
//!   containers:
//!   - ${db.containers...}
//! ```
//!
//! Imports are parsed eagerly: every import target is read and parsed into
//! its own subtree as soon as it is declared. Only evaluation is deferred.

use std::collections::BTreeMap;
use std::path::Path;

use super::context::EvalContext;
use super::types::{Export, Import, ImportState, Module, ParamDef};
use crate::core::{Result, ShortError};
use crate::utils::fs::normalize_path;
use crate::value::{Map, Value};

const IMPORTS_KEY: &str = "imports";
const PARAMS_KEY: &str = "params";
const DEFAULT_KEY: &str = "default";

/// An import declaration before its target is parsed.
struct ImportDecl {
    name: String,
    path: String,
    params: Map,
}

impl<T> EvalContext<T> {
    /// Parse a root document into one module per document section.
    ///
    /// `path` is normalized lexically first, so `./a.yaml` and `a.yaml` name
    /// the same module as far as caching and cycle detection are concerned.
    pub fn parse(&self, path: &str) -> Result<Vec<Module<T>>> {
        let path = root_path(path);
        let path = path.as_str();
        tracing::debug!("Parsing module {path}");
        let documents = self.read_documents(path)?;
        if documents.is_empty() {
            return Err(ShortError::EmptyDocument {
                path: path.to_string(),
            });
        }

        let mut stack = vec![path.to_string()];
        documents.into_iter().map(|document| self.parse_document(path, document, &mut stack)).collect()
    }

    /// Parse the importable (first) section of a document.
    ///
    /// Extra sections are recorded as a diagnostic on the returned module.
    pub fn parse_import(&self, path: &str) -> Result<Module<T>> {
        let mut stack = Vec::new();
        let (mut module, diagnostic) = self.parse_import_target(&root_path(path), &mut stack)?;
        module.diagnostics.extend(diagnostic);
        Ok(module)
    }

    /// Parse an import target while `stack` holds the chain of importers.
    fn parse_import_target(
        &self,
        path: &str,
        stack: &mut Vec<String>,
    ) -> Result<(Module<T>, Option<String>)> {
        if let Some(start) = stack.iter().position(|p| p == path) {
            let mut chain = stack[start..].to_vec();
            chain.push(path.to_string());
            return Err(ShortError::CyclicImport {
                chain: chain.join(" → "),
            });
        }
        if stack.len() > self.max_import_depth() {
            return Err(ShortError::ImportDepthExceeded {
                path: path.to_string(),
                limit: self.max_import_depth(),
            });
        }

        let mut documents = self.read_documents(path)?.into_iter();
        let Some(first) = documents.next() else {
            return Err(ShortError::EmptyDocument {
                path: path.to_string(),
            });
        };

        let extra = documents.len();
        let diagnostic = (extra > 0).then(|| {
            let message = format!(
                "{path} has {} document sections; only the first is imported",
                extra + 1
            );
            tracing::warn!("{message}");
            message
        });

        stack.push(path.to_string());
        let module = self.parse_document(path, first, stack);
        stack.pop();

        Ok((module?, diagnostic))
    }

    fn parse_document(&self, path: &str, mut document: Map, stack: &mut Vec<String>) -> Result<Module<T>> {
        let decls = parse_imports(path, document.remove(IMPORTS_KEY))?;
        let params = parse_params(path, document.remove(PARAMS_KEY))?;

        if document.len() != 1 {
            return Err(ShortError::InvalidExport {
                path: path.to_string(),
                found: describe_keys(&document),
            });
        }

        let mut imports = Vec::with_capacity(decls.len());
        let mut diagnostics = Vec::new();
        for decl in decls {
            let target = self.resolve_import_path(path, &decl.path)?;
            tracing::debug!("Module {path} imports '{}' from {target}", decl.name);
            let (module, diagnostic) = self.parse_import_target(&target, stack)?;
            diagnostics.extend(diagnostic);
            imports.push(Import {
                name: decl.name,
                path: target,
                params: decl.params,
                state: ImportState::Unevaluated,
                module,
            });
        }

        Ok(Module {
            path: path.to_string(),
            imports,
            params,
            evaluated: false,
            export: Export::new(document),
            diagnostics,
        })
    }
}

fn root_path(path: &str) -> String {
    normalize_path(Path::new(path)).to_string_lossy().into_owned()
}

fn parse_imports(path: &str, value: Option<Value>) -> Result<Vec<ImportDecl>> {
    let entries = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::List(entries)) => entries,
        Some(other) => {
            return Err(invalid_imports(
                path,
                format!("'imports' must be a list, found {}", other.type_name()),
            ));
        }
    };

    let mut decls: Vec<ImportDecl> = Vec::with_capacity(entries.len());
    for entry in entries {
        let decl = parse_import_decl(path, entry)?;
        if decls.iter().any(|d| d.name == decl.name) {
            return Err(invalid_imports(path, format!("duplicate import name '{}'", decl.name)));
        }
        decls.push(decl);
    }
    Ok(decls)
}

fn parse_import_decl(path: &str, entry: Value) -> Result<ImportDecl> {
    let Value::Map(entry) = entry else {
        return Err(invalid_imports(
            path,
            format!("import declaration must be a map, found {}", entry.type_name()),
        ));
    };
    if entry.is_empty() {
        return Err(invalid_imports(path, "empty import declaration".to_string()));
    }
    if entry.len() > 2 {
        return Err(invalid_imports(
            path,
            "import declaration should have only a name: path pair and optional params".to_string(),
        ));
    }

    let mut name_and_path: Option<(String, String)> = None;
    let mut params = Map::new();

    for (key, value) in entry {
        if key == PARAMS_KEY {
            match value {
                Value::Map(map) => params = map,
                Value::Null => {}
                other => {
                    return Err(invalid_imports(
                        path,
                        format!("params of an import must be a map, found {}", other.type_name()),
                    ));
                }
            }
            continue;
        }

        if let Some((existing, _)) = &name_and_path {
            return Err(invalid_imports(
                path,
                format!("import declaration has two names ('{existing}' and '{key}')"),
            ));
        }
        match value {
            Value::String(import_path) => name_and_path = Some((key, import_path)),
            other => {
                return Err(invalid_imports(
                    path,
                    format!("import path for '{key}' must be a string, found {}", other.type_name()),
                ));
            }
        }
    }

    let Some((name, import_path)) = name_and_path else {
        return Err(invalid_imports(path, "expected an import name and path".to_string()));
    };

    Ok(ImportDecl {
        name,
        path: import_path,
        params,
    })
}

fn parse_params(path: &str, value: Option<Value>) -> Result<BTreeMap<String, ParamDef>> {
    let entries = match value {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::List(entries)) => entries,
        Some(other) => {
            return Err(invalid_params(
                path,
                format!("'params' must be a list, found {}", other.type_name()),
            ));
        }
    };

    let mut params = BTreeMap::new();
    for entry in entries {
        let (name, def) = parse_param(path, entry)?;
        if params.contains_key(&name) {
            return Err(invalid_params(path, format!("duplicate parameter '{name}'")));
        }
        params.insert(name, def);
    }
    Ok(params)
}

fn parse_param(path: &str, entry: Value) -> Result<(String, ParamDef)> {
    let mut entry = match entry {
        Value::String(name) => return Ok((name, ParamDef::default())),
        Value::Map(map) => map,
        other => {
            return Err(invalid_params(
                path,
                format!(
                    "parameter declaration must be a name or a map, found {}",
                    other.type_name()
                ),
            ));
        }
    };

    let default = entry.remove(DEFAULT_KEY);
    let mut rest = entry.into_iter();
    let (Some((name, description)), None) = (rest.next(), rest.next()) else {
        return Err(invalid_params(
            path,
            "parameter declaration must have exactly one name: description entry besides 'default'"
                .to_string(),
        ));
    };

    let description = match description {
        Value::String(description) => Some(description),
        Value::Null => None,
        other => {
            return Err(invalid_params(
                path,
                format!(
                    "description of parameter '{name}' must be a string, found {}",
                    other.type_name()
                ),
            ));
        }
    };

    Ok((
        name,
        ParamDef {
            description,
            default,
        },
    ))
}

fn describe_keys(document: &Map) -> String {
    if document.is_empty() {
        "no resources".to_string()
    } else {
        let keys: Vec<_> = document.keys().map(|k| format!("'{k}'")).collect();
        format!("{} resources ({})", keys.len(), keys.join(", "))
    }
}

fn invalid_imports(path: &str, reason: String) -> ShortError {
    ShortError::InvalidImports {
        path: path.to_string(),
        reason,
    }
}

fn invalid_params(path: &str, reason: String) -> ShortError {
    ShortError::InvalidParams {
        path: path.to_string(),
        reason,
    }
}
