//! Identifier and label escaping for generated Cypher
//!
//! The escaping rule must be bit-exact across implementations:
//! - an identifier is emitted bare iff it matches `^[A-Za-z_][A-Za-z0-9_]*$`,
//!   otherwise it is wrapped in backticks with every internal backtick doubled
//! - a label (or relationship type) is *always* backtick-wrapped, even when it
//!   would already be a safe bare identifier
//!
//! # Examples
//! ```
//! use cypherweave::utils::{escape_identifier, escape_label};
//! assert_eq!(escape_identifier("user_id"), "user_id");
//! assert_eq!(escape_identifier("first name"), "`first name`");
//! assert_eq!(escape_label("User"), "`User`");
//! assert_eq!(escape_label("We`ird"), "`We``ird`");
//! ```

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Safe bare identifier: letter or underscore, then letters, digits, underscores
static SAFE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// An identifier that would break out of the generated statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid identifier '{0}' (must match ^[A-Za-z_][A-Za-z0-9_]*$)")]
pub struct InvalidIdentifierError(pub String);

pub fn is_safe_identifier(name: &str) -> bool {
    SAFE_IDENTIFIER.is_match(name)
}

/// Emit `name` bare when safe, backtick-quoted otherwise.
pub fn escape_identifier(name: &str) -> String {
    if is_safe_identifier(name) {
        name.to_string()
    } else {
        backtick(name)
    }
}

/// Labels and relationship types are always quoted.
pub fn escape_label(label: &str) -> String {
    backtick(label)
}

fn backtick(raw: &str) -> String {
    format!("`{}`", raw.replace('`', "``"))
}

/// Reject identifiers that are not safe bare identifiers.
///
/// Used where an identifier is interpolated without quoting (predicate
/// targets, eager-load aliases).
pub fn validate_identifier(name: &str) -> Result<(), InvalidIdentifierError> {
    if is_safe_identifier(name) {
        Ok(())
    } else {
        Err(InvalidIdentifierError(name.to_string()))
    }
}

/// Map a property name onto a safe parameter-name suffix.
///
/// ```
/// use cypherweave::utils::parameter_suffix;
/// assert_eq!(parameter_suffix("age"), "age");
/// assert_eq!(parameter_suffix("first name"), "first_name");
/// assert_eq!(parameter_suffix("1st"), "_1st");
/// assert_eq!(parameter_suffix(""), "param");
/// ```
pub fn parameter_suffix(property: &str) -> String {
    if is_safe_identifier(property) {
        return property.to_string();
    }
    if property.is_empty() {
        return "param".to_string();
    }

    let mut suffix: String = property
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if suffix.starts_with(|c: char| c.is_ascii_digit()) {
        suffix.insert(0, '_');
    }
    suffix
}
