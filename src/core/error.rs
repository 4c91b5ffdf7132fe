//! Error handling for short modules
//!
//! This module provides the error type shared by the parser, the template
//! engine and the evaluator, plus user-friendly error reporting for the CLI.
//! The error system follows two principles:
//! 1. **Strongly-typed errors** so callers can match on the failure mode
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`ShortError`] - Enumerated error types for every failure case
//! - [`ErrorCategory`] - Coarse classification (parse, resolution, type, ...)
//! - [`ErrorContext`] - Wrapper that adds suggestions and details for display
//!
//! # Error Categories
//!
//! - **Parse**: malformed `imports`, `params` or export shape
//! - **Resolution**: unknown identifiers, bad path indexes, bad import exports
//! - **Type**: non-scalar used in a partial fill, non-list used in a spread
//! - **Cycle**: circular imports and runaway import nesting
//! - **Io**: reading documents and resolving import paths
//! - **Downstream**: the injected raw-to-typed conversion failed
//!
//! # Examples
//!
//! ```rust,no_run
//! use short_modules::core::{ShortError, ErrorCategory, user_friendly_error};
//!
//! let error = ShortError::UnknownIdentifier {
//!     ident: "replicas".to_string(),
//!     module: "web.yaml".to_string(),
//!     suggestions: vec!["replica".to_string()],
//! };
//! assert_eq!(error.category(), ErrorCategory::Resolution);
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for module parsing and evaluation
///
/// Each variant names one failure mode and carries the module path (or the
/// template text) where it happened, so that messages point the user at the
/// document to fix.
///
/// Evaluation stops at the first error: there is no aggregation and no
/// partially substituted document is ever returned as a success.
#[derive(Error, Debug)]
pub enum ShortError {
    /// The `imports` section of a module is malformed
    ///
    /// Raised for a non-list `imports` value, an entry that is not a map, an
    /// empty entry, an entry with more than two keys, a missing or duplicated
    /// name, a non-string path or non-map `params`.
    #[error("Invalid imports in module {path}: {reason}")]
    InvalidImports {
        /// Path of the module declaring the import
        path: String,
        /// What is wrong with the declaration
        reason: String,
    },

    /// The `params` section of a module is malformed
    #[error("Invalid params in module {path}: {reason}")]
    InvalidParams {
        /// Path of the module declaring the parameters
        path: String,
        /// What is wrong with the declaration
        reason: String,
    },

    /// A module body does not consist of exactly one resource
    ///
    /// After removing `imports` and `params`, exactly one key must remain:
    /// the exported resource tag (e.g. `deployment`).
    #[error("Module {path} must contain exactly one resource, found {found}")]
    InvalidExport {
        /// Path of the offending module
        path: String,
        /// Description of the keys that were found
        found: String,
    },

    /// A document source produced no sections at all
    #[error("Module {path} contains no documents")]
    EmptyDocument {
        /// Path of the empty source
        path: String,
    },

    /// A document section is not a map
    #[error("Document {index} in {path} is not a map (found {found})")]
    InvalidDocument {
        /// Path of the source file
        path: String,
        /// Zero-based index of the section within the file
        index: usize,
        /// Type that was found instead
        found: String,
    },

    /// A map in a document section has a list or map as a key
    #[error("Document {index} in {path} has a {found} map key; only string, number and bool keys are supported")]
    InvalidMapKey {
        /// Path of the source file
        path: String,
        /// Zero-based index of the section within the file
        index: usize,
        /// Type of the offending key
        found: String,
    },

    /// A template hole names neither a parameter nor an import
    #[error("Invalid template identifier '{ident}' for module {module}")]
    UnknownIdentifier {
        /// The identifier as written inside `${...}`
        ident: String,
        /// Module (or scope) in which it was resolved
        module: String,
        /// Closest names available in the scope
        suggestions: Vec<String>,
    },

    /// A dotted path segment cannot be applied to the value it indexes
    #[error("Cannot index '{segment}' in template identifier '{ident}': {reason}")]
    InvalidPathIndex {
        /// The full identifier
        ident: String,
        /// The segment that failed
        segment: String,
        /// Why it failed (missing key, out of range, scalar, ...)
        reason: String,
    },

    /// An imported module's export cannot be unwrapped
    #[error("Import '{name}' of module {module} must export exactly one resource")]
    InvalidImportExport {
        /// Import name
        name: String,
        /// Importing module
        module: String,
    },

    /// A hole inside a larger string resolved to a non-scalar
    #[error(
        "Template hole '${{{hole}}}' in \"{template}\" resolved to a {found}; only strings and numbers can be interpolated"
    )]
    FillTypeMismatch {
        /// Identifier inside the hole
        hole: String,
        /// The full string being filled
        template: String,
        /// Type name of the resolved value
        found: String,
    },

    /// A `${name...}` list element resolved to something other than a list
    #[error("Spread '${{{hole}...}}' resolved to a {found}; only lists can be spread")]
    SpreadTypeMismatch {
        /// Identifier inside the spread
        hole: String,
        /// Type name of the resolved value
        found: String,
    },

    /// Circular import detected
    ///
    /// Either a module (transitively) imports one of its ancestors, or the
    /// parameter expressions of an import refer back to that same import.
    ///
    /// # Fields
    /// - `chain`: The import chain showing the circular reference
    #[error("Circular import detected: {chain}")]
    CyclicImport {
        /// String representation of the circular chain
        chain: String,
    },

    /// Imports are nested deeper than the configured limit
    #[error("Import depth limit of {limit} exceeded at {path}")]
    ImportDepthExceeded {
        /// Path at which the limit was hit
        path: String,
        /// The configured limit
        limit: usize,
    },

    /// The document source could not be read
    #[error("Failed to read module {path}: {reason}")]
    ReadFailed {
        /// Path that was being read
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// An import reference could not be mapped to a path
    #[error("Cannot resolve import path '{import_path}' from {root_path}: {reason}")]
    ImportPathFailed {
        /// Path of the importing module
        root_path: String,
        /// Path as written in the import declaration
        import_path: String,
        /// Underlying failure
        reason: String,
    },

    /// The raw-to-typed conversion of an evaluated export failed
    ///
    /// Evaluation itself does not return this error; it records the failure
    /// in the module's typed result. It is produced when a caller asks for
    /// the typed value with [`crate::module::Module::into_typed`].
    #[error("Failed to convert resource in module {path}: {reason}")]
    ConversionFailed {
        /// Module whose export failed to convert
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Coarse classification of [`ShortError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed module document
    Parse,
    /// Identifier or path could not be resolved
    Resolution,
    /// Resolved value has the wrong type for its substitution mode
    Type,
    /// Circular or runaway imports
    Cycle,
    /// Reading documents or resolving paths
    Io,
    /// Failure of the injected raw-to-typed conversion
    Downstream,
    /// Anything else
    Other,
}

impl ShortError {
    /// Classify this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidImports {
                ..
            }
            | Self::InvalidParams {
                ..
            }
            | Self::InvalidExport {
                ..
            }
            | Self::EmptyDocument {
                ..
            }
            | Self::InvalidDocument {
                ..
            }
            | Self::InvalidMapKey {
                ..
            }
            | Self::YamlError(_) => ErrorCategory::Parse,
            Self::UnknownIdentifier {
                ..
            }
            | Self::InvalidPathIndex {
                ..
            }
            | Self::InvalidImportExport {
                ..
            } => ErrorCategory::Resolution,
            Self::FillTypeMismatch {
                ..
            }
            | Self::SpreadTypeMismatch {
                ..
            } => ErrorCategory::Type,
            Self::CyclicImport {
                ..
            }
            | Self::ImportDepthExceeded {
                ..
            } => ErrorCategory::Cycle,
            Self::ReadFailed {
                ..
            }
            | Self::ImportPathFailed {
                ..
            }
            | Self::IoError(_) => ErrorCategory::Io,
            Self::ConversionFailed {
                ..
            } => ErrorCategory::Downstream,
            Self::JsonError(_)
            | Self::TomlError(_)
            | Self::Other {
                ..
            } => ErrorCategory::Other,
        }
    }

    /// Unwrap an error returned by an injected collaborator.
    ///
    /// Collaborators return `anyhow::Error`. When that error already is a
    /// [`ShortError`] (for instance from [`crate::utils::fs::read_yaml_documents`])
    /// it is passed through unchanged; anything else is wrapped by `wrap`,
    /// which receives the full error chain as a string.
    pub fn from_collaborator(
        error: anyhow::Error,
        wrap: impl FnOnce(String) -> ShortError,
    ) -> ShortError {
        match error.downcast::<ShortError>() {
            Ok(short) => short,
            Err(other) => wrap(format!("{other:#}")),
        }
    }
}

impl Clone for ShortError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidImports {
                path,
                reason,
            } => Self::InvalidImports {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::InvalidParams {
                path,
                reason,
            } => Self::InvalidParams {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::InvalidExport {
                path,
                found,
            } => Self::InvalidExport {
                path: path.clone(),
                found: found.clone(),
            },
            Self::EmptyDocument {
                path,
            } => Self::EmptyDocument {
                path: path.clone(),
            },
            Self::InvalidDocument {
                path,
                index,
                found,
            } => Self::InvalidDocument {
                path: path.clone(),
                index: *index,
                found: found.clone(),
            },
            Self::InvalidMapKey {
                path,
                index,
                found,
            } => Self::InvalidMapKey {
                path: path.clone(),
                index: *index,
                found: found.clone(),
            },
            Self::UnknownIdentifier {
                ident,
                module,
                suggestions,
            } => Self::UnknownIdentifier {
                ident: ident.clone(),
                module: module.clone(),
                suggestions: suggestions.clone(),
            },
            Self::InvalidPathIndex {
                ident,
                segment,
                reason,
            } => Self::InvalidPathIndex {
                ident: ident.clone(),
                segment: segment.clone(),
                reason: reason.clone(),
            },
            Self::InvalidImportExport {
                name,
                module,
            } => Self::InvalidImportExport {
                name: name.clone(),
                module: module.clone(),
            },
            Self::FillTypeMismatch {
                hole,
                template,
                found,
            } => Self::FillTypeMismatch {
                hole: hole.clone(),
                template: template.clone(),
                found: found.clone(),
            },
            Self::SpreadTypeMismatch {
                hole,
                found,
            } => Self::SpreadTypeMismatch {
                hole: hole.clone(),
                found: found.clone(),
            },
            Self::CyclicImport {
                chain,
            } => Self::CyclicImport {
                chain: chain.clone(),
            },
            Self::ImportDepthExceeded {
                path,
                limit,
            } => Self::ImportDepthExceeded {
                path: path.clone(),
                limit: *limit,
            },
            Self::ReadFailed {
                path,
                reason,
            } => Self::ReadFailed {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::ImportPathFailed {
                root_path,
                import_path,
                reason,
            } => Self::ImportPathFailed {
                root_path: root_path.clone(),
                import_path: import_path.clone(),
                reason: reason.clone(),
            },
            Self::ConversionFailed {
                path,
                reason,
            } => Self::ConversionFailed {
                path: path.clone(),
                reason: reason.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::YamlError(e) => Self::Other {
                message: format!("YAML error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps a [`ShortError`] and adds an optional suggestion for
/// resolving it and optional details explaining it. This is how the `short`
/// binary presents errors.
///
/// # Display Format
///
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context in yellow (optional)
/// 3. **Suggestion**: Actionable steps in green (optional)
///
/// # Examples
///
/// ```rust,no_run
/// use short_modules::core::{ShortError, ErrorContext};
///
/// let context = ErrorContext::new(ShortError::EmptyDocument { path: "a.yaml".into() })
///     .with_suggestion("Add a resource to a.yaml")
///     .with_details("Every module needs exactly one exported resource");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ShortError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: ShortError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with suggestions
///
/// Recognizes [`ShortError`] anywhere in the `anyhow` chain (the CLI wraps
/// library errors with `.with_context(...)`), then [`std::io::Error`], and
/// falls back to the full error chain for anything else.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(short_error) = error.chain().find_map(|e| e.downcast_ref::<ShortError>()) {
        let mut ctx = create_error_context(short_error.clone());
        // Keep the CLI's outer context (e.g. which file was being evaluated)
        let outer = error.to_string();
        if outer != short_error.to_string() {
            ctx.details = Some(match ctx.details.take() {
                Some(details) => format!("{outer}. {details}"),
                None => outer,
            });
        }
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(ShortError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check file ownership and permissions of the module files");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(ShortError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the file exists and the path is correct");
            }
            _ => {}
        }
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(ShortError::Other {
        message,
    })
}

/// Map each [`ShortError`] variant to a context with a tailored suggestion.
fn create_error_context(error: ShortError) -> ErrorContext {
    match &error {
        ShortError::InvalidImports { .. } => ErrorContext::new(error)
            .with_suggestion("Write each import as '- <name>: <path>' with an optional 'params:' map on the same entry")
            .with_details("'imports' must be a list; every entry has exactly one name/path pair and at most one 'params' map"),

        ShortError::InvalidParams { .. } => ErrorContext::new(error)
            .with_suggestion("Write each parameter as '- <name>' or '- <name>: <description>' with an optional 'default:' on the same entry")
            .with_details("'params' must be a list of parameter declarations"),

        ShortError::InvalidExport { path, .. } => {
            let details = format!(
                "Apart from 'imports' and 'params', {path} must have a single top-level key naming the resource (e.g. 'deployment')"
            );
            ErrorContext::new(error)
                .with_suggestion("Split additional resources into separate documents or modules")
                .with_details(details)
        }

        ShortError::InvalidMapKey { .. } => ErrorContext::new(error)
            .with_suggestion("Use a string, number or bool as the map key"),

        ShortError::UnknownIdentifier { suggestions, .. } => {
            let suggestion = if suggestions.is_empty() {
                "Declare the name under 'params' or 'imports' of the module".to_string()
            } else {
                format!("Did you mean {}?", suggestions.iter().map(|s| format!("'{s}'")).collect::<Vec<_>>().join(", "))
            };
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Template holes resolve against the module's own parameters first, then its imports")
        }

        ShortError::InvalidPathIndex { .. } => ErrorContext::new(error)
            .with_suggestion("Check the dotted path: use keys for maps and zero-based integers for lists")
            .with_details("Paths like ${name.containers.0.image} index into the value of 'name'"),

        ShortError::FillTypeMismatch { .. } => ErrorContext::new(error)
            .with_suggestion("Use the hole as the whole value (e.g. 'key: ${name}') to insert lists or maps")
            .with_details("Holes embedded in a larger string are converted to text, which only works for strings and numbers"),

        ShortError::SpreadTypeMismatch { .. } => ErrorContext::new(error)
            .with_suggestion("Only spread parameters or imports whose value is a list"),

        ShortError::CyclicImport { chain } => {
            let details = format!(
                "Circular import chain detected: {chain}. Modules cannot import themselves directly or indirectly"
            );
            ErrorContext::new(error)
                .with_suggestion("Review the import graph ('short imports <file>') and remove the circular reference")
                .with_details(details)
        }

        ShortError::ImportDepthExceeded { .. } => ErrorContext::new(error)
            .with_suggestion("Raise 'max_import_depth' in the configuration file if the nesting is intended"),

        ShortError::ReadFailed { .. } | ShortError::ImportPathFailed { .. } => ErrorContext::new(error)
            .with_suggestion("Check that the module file exists; relative import paths are resolved against the importing file's directory"),

        ShortError::ConversionFailed { .. } => ErrorContext::new(error)
            .with_details("The module evaluated successfully but its resource could not be converted to the target format"),

        _ => ErrorContext::new(error),
    }
}
