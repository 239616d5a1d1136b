use thiserror::Error;

use crate::schema::DataType;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("type mismatch for column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: String,
    },

    #[error("cannot convert '{value}' to {target}")]
    TypeConversion { value: String, target: DataType },

    #[error("malformed type annotation '{0}'")]
    TypeAnnotation(String),

    #[error("row count mismatch: {0}")]
    RowCountMismatch(String),

    #[error("tuple has {found} values but schema has {expected} columns")]
    RowLength { expected: usize, found: usize },

    // Raised by tuple sources that read from outside the process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("relation is single-pass and cannot be restarted")]
    NotRestartable,

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("invalid predicate: {0}")]
    Predicate(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    // Caller-supplied predicates and functions report their own failures here.
    #[error("function error: {0}")]
    Function(String),
}

impl Error {
    pub fn type_mismatch(column: &str, expected: DataType, found: impl Into<String>) -> Self {
        Error::TypeMismatch {
            column: column.to_string(),
            expected,
            found: found.into(),
        }
    }
}
