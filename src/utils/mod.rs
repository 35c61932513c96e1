//! Shared helpers for statement generation

pub mod escape;
pub mod reserved;

pub use escape::{
    escape_identifier, escape_label, is_safe_identifier, parameter_suffix, validate_identifier,
    InvalidIdentifierError,
};
pub use reserved::{is_prototype_key, is_reserved_alias, NODE_KEY, RELATIONSHIP_KEY};
