//! Short modules - lazy evaluation of parameterized, importable YAML modules
//!
//! A module is a YAML document describing one Kubernetes resource in a
//! shorthand format. Modules can declare parameters, import other modules
//! while passing them parameters, and use `${...}` template holes anywhere
//! in their body:
//!
//! ```yaml
//! imports:
//! - sidecar: ./envoy.short.yaml
//!   params:
//!     port: ${port}
//! params:
//! - name: Name of the deployment
//! - port: Port to expose
//!   default: 8080
//! deployment:
//!   name: ${name}
//!   containers:
//!   - name: app
//!     ports:
//!     - containerPort: ${port}
//!   - ${sidecar}
//! ```
//!
//! Evaluating a module fills every hole from its parameters and imports.
//! Imports are evaluated lazily, the first time a hole refers to them, so no
//! import ordering has to be computed up front.
//!
//! # Architecture Overview
//!
//! - [`value`] - the untyped document tree
//! - [`template`] - `${...}` substitution (expand, fill and spread)
//! - [`module`] - parsing, scope resolution and lazy evaluation
//! - [`core`] - error types and user-friendly error reporting
//! - [`config`] - engine configuration file
//! - [`utils`] - reading module files and resolving import paths
//! - [`cli`] - the `short` command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use short_modules::module::EvalContext;
//! use short_modules::value::{Map, Value};
//!
//! let ctx = EvalContext::for_files(|raw| Ok(serde_json::to_value(raw)?));
//!
//! let mut params = Map::new();
//! params.insert("name".to_string(), Value::from("web"));
//!
//! for module in ctx.evaluate("deployment.short.yaml", &params)? {
//!     println!("{}", serde_json::to_string_pretty(&module.into_typed()?)?);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod module;
pub mod template;
pub mod utils;
pub mod value;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
