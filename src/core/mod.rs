//! Core types shared across the crate.
//!
//! Currently this is the error system: [`ShortError`] for typed failures,
//! [`ErrorContext`] and [`user_friendly_error`] for CLI presentation.

pub mod error;

pub use error::{ErrorCategory, ErrorContext, ShortError, user_friendly_error};

/// Result type used by the parser, template engine and evaluator.
pub type Result<T, E = ShortError> = std::result::Result<T, E>;
