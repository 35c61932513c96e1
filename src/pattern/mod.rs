//! Node and relationship patterns
//!
//! Patterns are plain data; [`render`] turns them into Cypher text:
//! - `(n:`User` { id: $id })`
//! - `-[r:`FOLLOWS`*1..3]->`
//! - `(a)-[:`KNOWS`]-(b)` for related chains
//!
//! Inline filters and inline properties are mutually exclusive per element,
//! which [`Inline`] enforces by construction.

mod errors;
pub mod render;

pub use errors::PatternError;
pub use render::{render_node, render_pattern, render_relationship};

use crate::predicate::PropertyFilters;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Which end of a relationship carries the arrowhead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `<-[]-`
    In,
    /// `-[]->`
    #[default]
    Out,
    /// `-[]-`
    None,
}

/// Upper bound of a variable-length relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum HopBound {
    Finite(u32),
    Unbounded,
}

impl TryFrom<serde_json::Value> for HopBound {
    type Error = PatternError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        match &json {
            serde_json::Value::Number(n) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(HopBound::Finite)
                .ok_or_else(|| PatternError::InvalidHopBound(json.to_string())),
            serde_json::Value::String(s) if matches!(s.as_str(), "*" | "inf" | "infinity") => {
                Ok(HopBound::Unbounded)
            }
            _ => Err(PatternError::InvalidHopBound(json.to_string())),
        }
    }
}

/// Bracket content attached to a node or relationship
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Inline {
    #[default]
    None,
    /// Equality filters rendered in object mode
    Where(PropertyFilters),
    /// Properties to create or merge, each bound as a parameter
    Properties(Vec<(String, Value)>),
}

impl Inline {
    fn from_parts(
        filters: Option<PropertyFilters>,
        properties: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<Self, PatternError> {
        match (filters, properties) {
            (Some(_), Some(_)) => Err(PatternError::ConflictingInline),
            (Some(filters), None) => Ok(Inline::Where(filters)),
            (None, Some(properties)) => Ok(Inline::Properties(
                properties
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            )),
            (None, None) => Ok(Inline::None),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "NodePatternDef")]
pub struct NodePattern {
    pub identifier: Option<String>,
    pub labels: Vec<String>,
    pub inline: Inline,
}

impl NodePattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(identifier: impl Into<String>) -> Self {
        NodePattern {
            identifier: Some(identifier.into()),
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn filter(mut self, filters: PropertyFilters) -> Self {
        self.inline = Inline::Where(filters);
        self
    }

    pub fn properties<K, V>(mut self, properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.inline = Inline::Properties(
            properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RelationshipPatternDef")]
pub struct RelationshipPattern {
    pub identifier: Option<String>,
    /// Relationship type
    pub name: Option<String>,
    pub direction: Direction,
    pub min_hops: Option<u32>,
    pub max_hops: Option<HopBound>,
    pub inline: Inline,
}

impl RelationshipPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(identifier: impl Into<String>) -> Self {
        RelationshipPattern {
            identifier: Some(identifier.into()),
            ..Self::default()
        }
    }

    pub fn rel_type(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn min_hops(mut self, min: u32) -> Self {
        self.min_hops = Some(min);
        self
    }

    pub fn max_hops(mut self, max: HopBound) -> Self {
        self.max_hops = Some(max);
        self
    }

    pub fn filter(mut self, filters: PropertyFilters) -> Self {
        self.inline = Inline::Where(filters);
        self
    }

    pub fn properties<K, V>(mut self, properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.inline = Inline::Properties(
            properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }
}

/// One link of a related chain
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternElement {
    Node(NodePattern),
    Relationship(RelationshipPattern),
}

impl From<NodePattern> for PatternElement {
    fn from(node: NodePattern) -> Self {
        PatternElement::Node(node)
    }
}

impl From<RelationshipPattern> for PatternElement {
    fn from(rel: RelationshipPattern) -> Self {
        PatternElement::Relationship(rel)
    }
}

/// Payload of `MATCH`, `CREATE` and `MERGE`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Pattern {
    Node(NodePattern),
    /// Alternating node, relationship, node, ...
    Related(Vec<PatternElement>),
    /// Comma-separated nodes
    Multiple(Vec<NodePattern>),
}

impl Pattern {
    pub fn related<I, E>(elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<PatternElement>,
    {
        Pattern::Related(elements.into_iter().map(Into::into).collect())
    }
}

impl From<NodePattern> for Pattern {
    fn from(node: NodePattern) -> Self {
        Pattern::Node(node)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Labels {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct NodePatternDef {
    identifier: Option<String>,
    label: Option<Labels>,
    #[serde(rename = "where")]
    filters: Option<PropertyFilters>,
    properties: Option<serde_json::Map<String, serde_json::Value>>,
}

impl TryFrom<NodePatternDef> for NodePattern {
    type Error = PatternError;

    fn try_from(def: NodePatternDef) -> Result<Self, Self::Error> {
        let labels = match def.label {
            None => Vec::new(),
            Some(Labels::One(label)) => vec![label],
            Some(Labels::Many(labels)) => labels,
        };
        Ok(NodePattern {
            identifier: def.identifier,
            labels,
            inline: Inline::from_parts(def.filters, def.properties)?,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RelationshipPatternDef {
    identifier: Option<String>,
    name: Option<String>,
    #[serde(default)]
    direction: Direction,
    min_hops: Option<HopBound>,
    max_hops: Option<HopBound>,
    #[serde(rename = "where")]
    filters: Option<PropertyFilters>,
    properties: Option<serde_json::Map<String, serde_json::Value>>,
}

impl TryFrom<RelationshipPatternDef> for RelationshipPattern {
    type Error = PatternError;

    fn try_from(def: RelationshipPatternDef) -> Result<Self, Self::Error> {
        // An unbounded minimum only makes sense as "any length", rendered `*`
        let (min_hops, max_hops) = match (def.min_hops, def.max_hops) {
            (Some(HopBound::Unbounded), None | Some(HopBound::Unbounded)) => {
                (None, Some(HopBound::Unbounded))
            }
            (Some(HopBound::Unbounded), Some(HopBound::Finite(max))) => {
                return Err(PatternError::InvalidHopBound(format!(
                    "unbounded minimum with maximum {}",
                    max
                )))
            }
            (Some(HopBound::Finite(min)), max) => (Some(min), max),
            (None, max) => (None, max),
        };
        Ok(RelationshipPattern {
            identifier: def.identifier,
            name: def.name,
            direction: def.direction,
            min_hops,
            max_hops,
            inline: Inline::from_parts(def.filters, def.properties)?,
        })
    }
}
