//! Test utilities for short modules
//!
//! Helpers for writing tests against the parser and evaluator without
//! touching the filesystem:
//!
//! - [`init_test_logging`] - one-time tracing setup for tests
//! - [`MemoryDocuments`] - an in-memory set of module files
//! - [`memory_context`] - an [`EvalContext`] reading from [`MemoryDocuments`]
//!
//! # Example
//!
//! ```rust,no_run
//! use short_modules::test_utils::{MemoryDocuments, memory_context};
//! use short_modules::value::Map;
//!
//! let docs = MemoryDocuments::new()
//!     .with("main.yaml", "imports: [{db: db.yaml}]\npod: ${db}")
//!     .with("db.yaml", "svc: {port: 5432}");
//! let ctx = memory_context(docs);
//! let modules = ctx.evaluate("main.yaml", &Map::new()).unwrap();
//! ```

use std::collections::HashMap;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::module::EvalContext;
use crate::utils::fs::{parse_yaml_documents, resolve_relative_path};
use crate::value::Map;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set, that level is used;
/// otherwise `RUST_LOG` is honored, and without it logging stays off.
///
/// ```bash
/// RUST_LOG=short_modules=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer() // Important: uses test-compatible writer
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Module files kept in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocuments {
    files: HashMap<String, String>,
}

impl MemoryDocuments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with YAML `content` (may hold several `---` sections).
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// A `ReadFromPath` collaborator over these files.
    pub fn reader(&self) -> impl Fn(&str) -> anyhow::Result<Vec<Map>> + 'static {
        let files = self.files.clone();
        move |path: &str| {
            let content =
                files.get(path).ok_or_else(|| anyhow::anyhow!("no module at {path}"))?;
            Ok(parse_yaml_documents(content, path)?)
        }
    }
}

/// An evaluation context over in-memory files.
///
/// The typed result is a copy of the evaluated raw map. Import paths are
/// resolved relative to the importing file, as on disk.
#[must_use]
pub fn memory_context(documents: MemoryDocuments) -> EvalContext<Map> {
    EvalContext::new(
        |raw: &Map| Ok(raw.clone()),
        |root, import| Ok(resolve_relative_path(root, import)),
        documents.reader(),
    )
}
