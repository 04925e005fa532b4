//! Error types for schema declaration and DDL generation.

use thiserror::Error;

/// The main error type for schema operations.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A column was declared with an inconsistent or out-of-range parameter
    /// (bad integer size, non-positive precision, fractional-second digits
    /// outside 0..=6, enum with no members). Detected at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Members of a constraint group disagree on an attribute they must
    /// share (referenced table, delete/update action, partition method).
    /// Detected while compiling the table statement.
    #[error("all values for {attribute} must be same")]
    Consistency { attribute: &'static str },

    /// A column has no SQL type token to compose from (e.g. building an
    /// array over a foreign key, whose type lives on the referenced column).
    #[error("Unresolved type: {0}")]
    UnresolvedType(String),

    /// The driver failed to connect to the database.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The database rejected an emitted statement.
    #[error("Execution error: {0}")]
    Execution(String),
}

impl SchemaError {
    /// Create a configuration error with the given message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a consistency error for the given grouped attribute.
    pub fn consistency(attribute: &'static str) -> Self {
        Self::Consistency { attribute }
    }

    /// Create an unresolved-type error with the given message.
    pub fn unresolved(message: impl Into<String>) -> Self {
        Self::UnresolvedType(message.into())
    }
}

/// Result type alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
