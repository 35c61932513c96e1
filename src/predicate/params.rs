//! Insertion-ordered filter maps: `identifier -> property -> WhereValue`

use super::{PredicateError, WhereValue};
use serde::Deserialize;

/// Filters on the properties of one identifier.
///
/// Re-inserting a property replaces its value in place (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Map<String, serde_json::Value>")]
pub struct PropertyFilters {
    entries: Vec<(String, WhereValue)>,
}

impl PropertyFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<WhereValue>) -> Self {
        self.insert(property, value);
        self
    }

    pub fn insert(&mut self, property: impl Into<String>, value: impl Into<WhereValue>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == property) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((property, value)),
        }
    }

    /// Overlay `other` on top of these filters.
    pub fn merge(&mut self, other: PropertyFilters) {
        for (property, value) in other.entries {
            self.insert(property, value);
        }
    }

    pub fn get(&self, property: &str) -> Option<&WhereValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == property)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WhereValue)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v))
    }

    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<WhereValue>> FromIterator<(K, V)> for PropertyFilters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = PropertyFilters::new();
        for (property, value) in iter {
            filters.insert(property, value);
        }
        filters
    }
}

impl IntoIterator for PropertyFilters {
    type Item = (String, WhereValue);
    type IntoIter = std::vec::IntoIter<(String, WhereValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for PropertyFilters {
    type Error = PredicateError;

    fn try_from(map: serde_json::Map<String, serde_json::Value>) -> Result<Self, Self::Error> {
        let mut filters = PropertyFilters::new();
        for (property, json) in map {
            filters.insert(property, WhereValue::try_from(json)?);
        }
        Ok(filters)
    }
}

/// Filters keyed by identifier, e.g. `{ n: { age: { gte: 18 } } }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Map<String, serde_json::Value>")]
pub struct WhereParams {
    identifiers: Vec<(String, PropertyFilters)>,
}

impl WhereParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Params filtering a single identifier
    pub fn for_identifier(identifier: impl Into<String>, filters: PropertyFilters) -> Self {
        let mut params = Self::new();
        params.insert_filters(identifier, filters);
        params
    }

    pub fn with(
        mut self,
        identifier: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<WhereValue>,
    ) -> Self {
        self.insert(identifier, property, value);
        self
    }

    pub fn insert(
        &mut self,
        identifier: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<WhereValue>,
    ) {
        self.filters_mut(identifier.into()).insert(property, value);
    }

    /// Merge `filters` into those already held for `identifier`.
    pub fn insert_filters(&mut self, identifier: impl Into<String>, filters: PropertyFilters) {
        self.filters_mut(identifier.into()).merge(filters);
    }

    /// Overlay `other`; later values win per `identifier.property`.
    pub fn merge(&mut self, other: WhereParams) {
        for (identifier, filters) in other.identifiers {
            self.insert_filters(identifier, filters);
        }
    }

    fn filters_mut(&mut self, identifier: String) -> &mut PropertyFilters {
        let index = match self.identifiers.iter().position(|(i, _)| *i == identifier) {
            Some(index) => index,
            None => {
                self.identifiers.push((identifier, PropertyFilters::new()));
                self.identifiers.len() - 1
            }
        };
        &mut self.identifiers[index].1
    }

    pub fn get(&self, identifier: &str) -> Option<&PropertyFilters> {
        self.identifiers
            .iter()
            .find(|(i, _)| i == identifier)
            .map(|(_, filters)| filters)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyFilters)> {
        self.identifiers.iter().map(|(i, f)| (i.as_str(), f))
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.identifiers.iter().map(|(i, _)| i.as_str())
    }

    /// True when no identifier carries any property filter
    pub fn is_empty(&self) -> bool {
        self.identifiers.iter().all(|(_, filters)| filters.is_empty())
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for WhereParams {
    type Error = PredicateError;

    fn try_from(map: serde_json::Map<String, serde_json::Value>) -> Result<Self, Self::Error> {
        let mut params = WhereParams::new();
        for (identifier, json) in map {
            let serde_json::Value::Object(properties) = json else {
                return Err(PredicateError::MalformedFilters(identifier));
            };
            params.insert_filters(identifier, PropertyFilters::try_from(properties)?);
        }
        Ok(params)
    }
}
