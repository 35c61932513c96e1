//! Bind-parameter namespace for a single statement
//!
//! Every value that reaches the generated Cypher goes through a
//! [`ParameterTable`] and is referenced as `$name`; nothing is interpolated.
//! A table is created per top-level statement (optionally seeded from a caller
//! table) and discarded once the statement is handed to the runner.
//!
//! Name generation and insertion are two steps on `&mut self`, so a table can
//! only be extended by one builder at a time.

mod errors;
pub mod naming;

pub use errors::ParameterError;
pub use naming::{AlphabeticSequence, NamingConfig, NAME_SEPARATOR};

use crate::value::Value;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Ordered map of parameter name to value with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterTable {
    entries: Vec<(String, Value)>,
    naming: NamingConfig,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table with custom unique-name bounds
    pub fn with_naming(naming: NamingConfig) -> Self {
        ParameterTable {
            entries: Vec::new(),
            naming,
        }
    }

    /// Table pre-populated with `entries`; fails on duplicate names.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, ParameterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut table = Self::new();
        table.add(entries)?;
        Ok(table)
    }

    pub fn naming(&self) -> NamingConfig {
        self.naming
    }

    /// Insert every entry, or none of them.
    ///
    /// # Errors
    /// `Duplicate` if a name is already bound, or appears twice in `entries`.
    pub fn add<I, K, V>(&mut self, entries: I) -> Result<(), ParameterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let incoming: Vec<(String, Value)> = entries
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();

        for (index, (name, _)) in incoming.iter().enumerate() {
            let repeated = incoming[..index].iter().any(|(earlier, _)| earlier == name);
            if repeated || self.contains(name) {
                return Err(ParameterError::Duplicate(name.clone()));
            }
        }

        self.entries.extend(incoming);
        Ok(())
    }

    /// Remove the named entries; names that are not bound are ignored.
    pub fn remove<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            self.entries.retain(|(existing, _)| existing != name);
        }
    }

    /// A name derived from `suffix` that is not bound in this table.
    ///
    /// Returns `suffix` when free, otherwise `suffix__aaaa`, `suffix__aaab`, ...
    /// Uniqueness holds only against the current contents.
    pub fn unique_name(&self, suffix: &str) -> Result<String, ParameterError> {
        if !self.contains(suffix) {
            return Ok(suffix.to_string());
        }

        let candidates = AlphabeticSequence::new(usize::from(self.naming.suffix_width))
            .take(self.naming.max_attempts as usize);
        let mut attempts = 0;
        for candidate in candidates {
            attempts += 1;
            let name = format!("{}{}{}", suffix, NAME_SEPARATOR, candidate);
            if !self.contains(&name) {
                return Ok(name);
            }
            log::trace!("Parameter name '{}' taken, trying next candidate", name);
        }

        // The sequence may run out before `max_attempts`
        Err(ParameterError::GenerationExhausted {
            suffix: suffix.to_string(),
            attempts,
        })
    }

    /// Generate a unique name for `suffix`, bind `value` to it and return it.
    pub fn unique_name_and_add(
        &mut self,
        suffix: &str,
        value: impl Into<Value>,
    ) -> Result<String, ParameterError> {
        let name = self.unique_name(suffix)?;
        self.entries.push((name.clone(), value.into()));
        Ok(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for ParameterTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rejects_duplicate() {
        let mut table = ParameterTable::new();
        table.add([("a", 1)]).unwrap();
        assert_eq!(
            table.add([("a", 2)]),
            Err(ParameterError::Duplicate("a".to_string()))
        );
        assert_eq!(table.get("a"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_add_after_remove() {
        let mut table = ParameterTable::new();
        table.add([("a", 1)]).unwrap();
        table.remove(["a"]);
        table.add([("a", 2)]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("a"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_add_is_all_or_nothing() {
        let mut table = ParameterTable::new();
        table.add([("b", 1)]).unwrap();
        assert!(table.add([("a", 1), ("b", 2)]).is_err());
        assert!(!table.contains("a"));

        assert_eq!(
            table.add([("c", 1), ("c", 2)]),
            Err(ParameterError::Duplicate("c".to_string()))
        );
        assert!(!table.contains("c"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut table = ParameterTable::from_entries([("a", 1), ("b", 2)]).unwrap();
        table.remove(["a", "missing"]);
        table.remove(["a"]);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_unique_name_sequence() {
        let mut table = ParameterTable::new();
        assert_eq!(table.unique_name("x").unwrap(), "x");

        table.add([("x", 1)]).unwrap();
        assert_eq!(table.unique_name("x").unwrap(), "x__aaaa");

        table.add([("x__aaaa", 2)]).unwrap();
        assert_eq!(table.unique_name("x").unwrap(), "x__aaab");
    }

    #[test]
    fn test_unique_name_restarts_each_call() {
        let mut table = ParameterTable::from_entries([("x", 1), ("x__aaaa", 2)]).unwrap();
        table.remove(["x__aaaa"]);
        assert_eq!(table.unique_name("x").unwrap(), "x__aaaa");
    }

    #[test]
    fn test_unique_name_and_add_keeps_names_unique() {
        let mut table = ParameterTable::new();
        let names: Vec<String> = (0..50)
            .map(|i| table.unique_name_and_add("limit", i).unwrap())
            .collect();

        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 50);
        assert_eq!(table.len(), 50);
        assert_eq!(names[0], "limit");
        assert_eq!(names[1], "limit__aaaa");
    }

    #[test]
    fn test_generation_exhausted() {
        let naming = NamingConfig {
            max_attempts: 3,
            suffix_width: 4,
        };
        let mut table = ParameterTable::with_naming(naming);
        for _ in 0..4 {
            table.unique_name_and_add("p", 0).unwrap();
        }
        assert_eq!(
            table.unique_name("p"),
            Err(ParameterError::GenerationExhausted {
                suffix: "p".to_string(),
                attempts: 3
            })
        );
    }

    #[test]
    fn test_generation_exhausted_reports_candidates_tried() {
        let mut table = ParameterTable::with_naming(NamingConfig {
            max_attempts: 100,
            suffix_width: 1,
        });
        for _ in 0..27 {
            table.unique_name_and_add("p", 0).unwrap();
        }
        assert_eq!(
            table.unique_name("p"),
            Err(ParameterError::GenerationExhausted {
                suffix: "p".to_string(),
                attempts: 26
            })
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let original = ParameterTable::from_entries([("list", vec![1, 2])]).unwrap();
        let mut copy = original.clone();
        copy.remove(["list"]);
        copy.add([("list", vec![3])]).unwrap();

        assert_eq!(original.get("list"), Some(&Value::from(vec![1, 2])));
        assert_eq!(copy.get("list"), Some(&Value::from(vec![3])));
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let table = ParameterTable::from_entries([("z", 1), ("a", 2)]).unwrap();
        assert_eq!(serde_json::to_string(&table).unwrap(), r#"{"z":1,"a":2}"#);
    }
}
