//! Names with internal meaning in eager-load output
//!
//! Collected relationship entries are maps keyed by `node`, `relationship` and
//! one key per child alias, so an alias may not shadow either of the fixed
//! keys. Prototype-pollution keys (`__proto__`, `constructor`, `prototype`)
//! are refused as aliases and as filter property names.

use lazy_static::lazy_static;
use std::collections::HashSet;

/// Key holding the target node in a collected relationship entry
pub const NODE_KEY: &str = "node";
/// Key holding the relationship in a collected relationship entry
pub const RELATIONSHIP_KEY: &str = "relationship";

lazy_static! {
    static ref PROTOTYPE_KEYS: HashSet<&'static str> =
        HashSet::from(["__proto__", "constructor", "prototype"]);
    static ref RESERVED_ALIASES: HashSet<&'static str> = {
        let mut names: HashSet<&'static str> = PROTOTYPE_KEYS.iter().copied().collect();
        names.insert(NODE_KEY);
        names.insert(RELATIONSHIP_KEY);
        names
    };
}

pub fn is_prototype_key(name: &str) -> bool {
    PROTOTYPE_KEYS.contains(name)
}

pub fn is_reserved_alias(name: &str) -> bool {
    RESERVED_ALIASES.contains(name)
}
