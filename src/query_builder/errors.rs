use crate::parameters::ParameterError;
use crate::pattern::PatternError;
use crate::predicate::PredicateError;
use crate::utils::InvalidIdentifierError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryBuilderError {
    #[error("Invalid {clause} clause: {reason}")]
    InvalidClause { clause: &'static str, reason: String },

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Predicate(#[from] PredicateError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifierError),
}

impl QueryBuilderError {
    pub fn invalid_clause(clause: &'static str, reason: impl Into<String>) -> Self {
        QueryBuilderError::InvalidClause {
            clause,
            reason: reason.into(),
        }
    }
}
