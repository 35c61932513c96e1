//! Partition filters into bracket-safe equality and boolean predicates
//!
//! Bracket syntax (`(n:Label { a: $a })`) can only express equality. Callers
//! that want to push as much filtering as possible into a pattern split their
//! filters first and render the remainder as a `WHERE` predicate.

use super::{PropertyFilters, WhereValue};

/// Result of [`split_by_operator`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitFilters {
    /// Renderable in object (bracket) mode
    pub equality: PropertyFilters,
    /// Needs text (predicate) mode
    pub predicate: PropertyFilters,
}

/// Split `filters` by whether each property is pure equality.
///
/// A property lands in `predicate` if it is `NULL`, or if any of its operators
/// is something other than `eq` against a non-null operand (so `eq` + `ne` on one
/// property goes to `predicate` as a whole).
pub fn split_by_operator(filters: &PropertyFilters) -> SplitFilters {
    let mut split = SplitFilters::default();
    for (property, value) in filters.iter() {
        if is_equality_only(value) {
            split.equality.insert(property, value.clone());
        } else {
            split.predicate.insert(property, value.clone());
        }
    }
    split
}

fn is_equality_only(value: &WhereValue) -> bool {
    match value {
        WhereValue::Value(v) => !v.is_null(),
        WhereValue::Literal(_) => true,
        WhereValue::Conditions(conditions) => {
            !conditions.is_empty() && conditions.iter().all(|c| c.is_equality())
        }
    }
}
