//! Crate-level error aggregating every component's failure kinds

use crate::eager_load::EagerLoadError;
use crate::parameters::ParameterError;
use crate::pattern::PatternError;
use crate::predicate::PredicateError;
use crate::query_builder::QueryBuilderError;
use crate::runner::RunnerError;
use crate::utils::InvalidIdentifierError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CypherWeaveError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifierError),

    #[error(transparent)]
    Predicate(#[from] PredicateError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    QueryBuilder(#[from] QueryBuilderError),

    #[error(transparent)]
    EagerLoad(#[from] EagerLoadError),

    #[error(transparent)]
    Runner(#[from] RunnerError),
}
