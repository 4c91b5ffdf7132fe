//! Parameterized, importable modules.
//!
//! A module is one YAML document section declaring optional `imports` and
//! `params` next to a single exported resource. [`EvalContext::parse`] reads
//! a module and every module it imports into a [`Module`] tree;
//! [`EvalContext::evaluate_module`] then fills the template holes of the
//! root export, evaluating imports lazily as holes reference them.
//!
//! # Module Layout
//!
//! - [`types`] - `Module`, `Import`, `Export`, `ParamDef`, `TypedResult`
//! - [`context`] - `EvalContext` and its injected collaborators
//! - [`parser`] - document → module tree
//! - [`resolver`] - identifier lookup in a module scope
//! - [`eval`] - module and import evaluation
//! - [`cache`] - read-through cache of raw documents
//! - [`graph`] - import graph, dependency order and tree rendering
//!
//! # Examples
//!
//! ```rust
//! use short_modules::module::EvalContext;
//! use short_modules::value::Map;
//!
//! let ctx = EvalContext::new(
//!     |raw: &Map| Ok(raw.clone()),
//!     |_root, import| Ok(import.to_string()),
//!     |path| match path {
//!         "app.yaml" => Ok(vec![serde_yaml::from_str(
//!             "imports: [{web: web.yaml, params: {port: 8080}}]\nservice: ${web}",
//!         )?]),
//!         "web.yaml" => Ok(vec![serde_yaml::from_str("params: [port]\nservice: {port: '${port}'}")?]),
//!         _ => anyhow::bail!("no module {path}"),
//!     },
//! );
//!
//! let modules = ctx.evaluate("app.yaml", &Map::new())?;
//! let expected: Map = serde_yaml::from_str("service: {port: 8080}").unwrap();
//! assert_eq!(modules[0].export.raw, expected);
//! # Ok::<(), short_modules::core::ShortError>(())
//! ```

pub mod cache;
pub mod context;
pub mod eval;
pub mod graph;
pub mod parser;
pub mod resolver;
pub mod types;

pub use cache::{CacheStats, DocumentCache};
pub use context::{EvalContext, RawToTyped, ReadFromPath, ResolveImportPath};
pub use graph::ImportGraph;
pub use resolver::ScopeResolver;
pub use types::{Export, Import, ImportState, Module, ParamDef, Resource, TypedResult};
