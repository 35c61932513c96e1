use super::Operator;
use crate::parameters::ParameterError;
use crate::utils::InvalidIdentifierError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PredicateError {
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifierError),

    #[error("Operator '{0}' is not supported in bracket (object) mode, only 'eq' is")]
    UnsupportedMode(Operator),

    #[error("Cannot bind a {value_type} value for {identifier}.{property} (expected a scalar, temporal, spatial value or a list of those)")]
    UnsupportedValue {
        identifier: String,
        property: String,
        value_type: &'static str,
    },

    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("Expected an object of properties for '{0}'")]
    MalformedFilters(String),

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}
