//! Error types for schema loading and argument resolution.
//!
//! Provides a unified error type covering all failure modes: unknown types,
//! missing required arguments, arity mismatches, scalar conversion failures,
//! and document loading.

use thiserror::Error;

/// Errors that can occur while loading a schema or resolving arguments.
#[derive(Debug, Error)]
pub enum ArgsError {
    /// Schema references a type name that is not in the registry.
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// A required argument had no value in any source.
    #[error("missing required argument '{0}'")]
    MissingRequired(String),

    /// A tuple record produced the wrong number of fields.
    ///
    /// Raised for default, environment, and user-document sources. Arity of
    /// direct CLI input is enforced by the CLI layer as a usage failure
    /// instead.
    #[error("wrong number of values for '{name}': expected {expected}, got {actual}")]
    Arity {
        /// Argument the record belongs to.
        name: String,
        /// Declared tuple arity.
        expected: usize,
        /// Number of fields actually produced.
        actual: usize,
    },

    /// A scalar converter rejected a token.
    #[error("cannot convert value for '{name}': {reason}")]
    Conversion {
        /// Argument the token belongs to.
        name: String,
        /// Converter-supplied reason.
        reason: String,
    },

    /// Named access to an argument that was never declared.
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),

    /// A `parent_path` entry names itself or a nonexistent argument.
    #[error("invalid parent reference for '{name}': {reason}")]
    InvalidParent {
        /// Argument carrying the reference.
        name: String,
        /// What is wrong with the reference.
        reason: String,
    },

    /// A loaded document has the wrong overall shape (e.g., not a mapping).
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema document parsing failure.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// User-values document parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`ArgsError`].
pub type Result<T> = std::result::Result<T, ArgsError>;
