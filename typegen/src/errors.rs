//! Error types for the type generator.

use thiserror::Error;

use crate::format::FormatError;

/// Errors that can occur while generating the types package.
///
/// Every variant is fatal: the generator never retries and never leaves a
/// partially written package behind.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The schema document is structurally invalid.
    #[error("Invalid schema at '{path}': {message}")]
    Validation {
        /// Location of the offending value, e.g. `types.Message.fields[3].required`.
        path: String,
        /// What was wrong with it.
        message: String,
    },

    /// A field references a type that the schema does not declare.
    #[error("Type '{type_name}' field '{field}' references undeclared type '{reference}'")]
    UnresolvedReference {
        /// The type that owns the field.
        type_name: String,
        /// The field whose type token is dangling.
        field: String,
        /// The undeclared type name.
        reference: String,
    },

    /// The external formatter rejected generated source.
    #[error("Failed to format generated file '{file}': {source}")]
    Format {
        file: String,
        #[source]
        source: FormatError,
    },

    /// Failed to read an input file
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The schema file is not valid JSON.
    #[error("Failed to parse schema '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A template is malformed or was rendered without one of its slots.
    #[error("Template '{name}': {reason}")]
    Template { name: String, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl GeneratorError {
    pub(crate) fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            path: path.into(),
            message: message.into(),
        }
    }
}
