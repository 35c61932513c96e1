use crate::query_builder::QueryBuilderError;
use crate::runner::RunnerError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EagerLoadError {
    #[error("Name '{name}' is reserved ({reason})")]
    ReservedName { name: String, reason: &'static str },

    #[error("Relationship alias '{0}' is used more than once at the same level")]
    DuplicateAlias(String),

    #[error("Invalid eager-load configuration: {0}")]
    InvalidConfig(String),

    #[error("Result row has no '{0}' column")]
    MissingColumn(String),

    #[error("Unexpected {found} value in '{column}' (expected {expected})")]
    UnexpectedValue {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    QueryBuilder(#[from] QueryBuilderError),

    #[error(transparent)]
    Runner(#[from] RunnerError),
}

impl EagerLoadError {
    pub fn reserved(name: impl Into<String>, reason: &'static str) -> Self {
        EagerLoadError::ReservedName {
            name: name.into(),
            reason,
        }
    }

    pub fn unexpected(column: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        EagerLoadError::UnexpectedValue {
            column: column.into(),
            expected,
            found,
        }
    }
}
