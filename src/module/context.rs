//! Evaluation context: injected collaborators and engine options.

use std::cell::RefCell;
use std::fmt;
use std::path::Path;

use super::cache::{CacheStats, DocumentCache};
use super::types::TypedResult;
use crate::constants::DEFAULT_MAX_IMPORT_DEPTH;
use crate::core::{Result, ShortError};
use crate::utils::fs::{read_yaml_documents, resolve_relative_path};
use crate::value::Map;

/// Converts an evaluated export into the caller's typed representation.
pub type RawToTyped<T> = Box<dyn Fn(&Map) -> anyhow::Result<T>>;

/// Maps `(importer path, import path as written)` to the path to read.
pub type ResolveImportPath = Box<dyn Fn(&str, &str) -> anyhow::Result<String>>;

/// Reads every document section stored at a path.
pub type ReadFromPath = Box<dyn Fn(&str) -> anyhow::Result<Vec<Map>>>;

/// Everything the parser and evaluator need from the outside world.
///
/// A context is meant for one thread; the document cache uses interior
/// mutability and is not `Sync`.
///
/// # Examples
///
/// ```rust,no_run
/// use short_modules::module::EvalContext;
/// use short_modules::value::Map;
///
/// let ctx = EvalContext::for_files(|raw| Ok(serde_json::to_value(raw)?));
/// let mut modules = ctx.parse("deployment.short.yaml")?;
/// for module in &mut modules {
///     ctx.evaluate_module(module, &Map::new())?;
/// }
/// # Ok::<(), short_modules::core::ShortError>(())
/// ```
pub struct EvalContext<T> {
    raw_to_typed: RawToTyped<T>,
    resolve_import_path: ResolveImportPath,
    read_from_path: ReadFromPath,
    cache: Option<RefCell<DocumentCache>>,
    max_import_depth: usize,
}

impl<T> EvalContext<T> {
    /// Create a context from the three collaborators.
    ///
    /// The document cache starts disabled; see [`Self::with_document_cache`].
    pub fn new(
        raw_to_typed: impl Fn(&Map) -> anyhow::Result<T> + 'static,
        resolve_import_path: impl Fn(&str, &str) -> anyhow::Result<String> + 'static,
        read_from_path: impl Fn(&str) -> anyhow::Result<Vec<Map>> + 'static,
    ) -> Self {
        Self {
            raw_to_typed: Box::new(raw_to_typed),
            resolve_import_path: Box::new(resolve_import_path),
            read_from_path: Box::new(read_from_path),
            cache: None,
            max_import_depth: DEFAULT_MAX_IMPORT_DEPTH,
        }
    }

    /// Create a context that reads modules from the local filesystem.
    ///
    /// Import paths are resolved relative to the importing file and the
    /// document cache is enabled.
    pub fn for_files(raw_to_typed: impl Fn(&Map) -> anyhow::Result<T> + 'static) -> Self {
        Self::new(
            raw_to_typed,
            |root, import| Ok(resolve_relative_path(root, import)),
            |path| Ok(read_yaml_documents(Path::new(path))?),
        )
        .with_document_cache(true)
    }

    #[must_use]
    pub fn with_document_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(|| RefCell::new(DocumentCache::new()));
        self
    }

    #[must_use]
    pub const fn with_max_import_depth(mut self, depth: usize) -> Self {
        self.max_import_depth = depth;
        self
    }

    #[must_use]
    pub const fn max_import_depth(&self) -> usize {
        self.max_import_depth
    }

    /// Document cache counters, if the cache is enabled.
    #[must_use]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.borrow().stats())
    }

    /// Read all document sections at `path`, going through the cache.
    pub(crate) fn read_documents(&self, path: &str) -> Result<Vec<Map>> {
        if let Some(cache) = &self.cache
            && let Some(documents) = cache.borrow_mut().get(path)
        {
            tracing::trace!("Document cache hit for {path}");
            return Ok(documents);
        }

        tracing::debug!("Reading module {path}");
        let documents = (self.read_from_path)(path).map_err(|e| {
            ShortError::from_collaborator(e, |reason| ShortError::ReadFailed {
                path: path.to_string(),
                reason,
            })
        })?;

        if let Some(cache) = &self.cache {
            cache.borrow_mut().insert(path, documents.clone());
        }
        Ok(documents)
    }

    pub(crate) fn resolve_import_path(&self, root_path: &str, import_path: &str) -> Result<String> {
        (self.resolve_import_path)(root_path, import_path).map_err(|e| {
            ShortError::from_collaborator(e, |reason| ShortError::ImportPathFailed {
                root_path: root_path.to_string(),
                import_path: import_path.to_string(),
                reason,
            })
        })
    }

    /// Run the raw-to-typed collaborator. Failures are captured, not returned.
    pub(crate) fn convert(&self, module_path: &str, raw: &Map) -> TypedResult<T> {
        match (self.raw_to_typed)(raw) {
            Ok(typed) => TypedResult::Typed(typed),
            Err(e) => {
                tracing::warn!("Failed to convert resource in {module_path}: {e:#}");
                TypedResult::ConversionFailed(ShortError::ConversionFailed {
                    path: module_path.to_string(),
                    reason: format!("{e:#}"),
                })
            }
        }
    }
}

impl<T> fmt::Debug for EvalContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalContext")
            .field("cache", &self.cache_stats())
            .field("max_import_depth", &self.max_import_depth)
            .finish_non_exhaustive()
    }
}
