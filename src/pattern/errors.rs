use crate::parameters::ParameterError;
use crate::predicate::PredicateError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PatternError {
    #[error("Related pattern element {position} must be a {expected} (patterns alternate node, relationship, node, ...)")]
    MalformedChain {
        position: usize,
        expected: &'static str,
    },

    #[error("Related pattern has no elements")]
    EmptyChain,

    #[error("Multiple-node pattern has no nodes")]
    EmptyPattern,

    #[error("Minimum hops {min} exceeds maximum hops {max}")]
    InvalidHopRange { min: u32, max: u32 },

    #[error("Invalid hop bound '{0}' (expected a non-negative integer or \"*\")")]
    InvalidHopBound(String),

    #[error("A pattern element cannot carry both inline filters and inline properties")]
    ConflictingInline,

    #[error(transparent)]
    Predicate(#[from] PredicateError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}
