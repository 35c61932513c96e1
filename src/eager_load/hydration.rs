//! Rows back into nested entities
//!
//! Walks the same [`RelationshipTree`] synthesis used: the root comes from the
//! root column, each top-level alias from its own column, and nested aliases
//! from keys of the collected entry maps. A missing or `NULL` alias column is
//! an empty list, never an absent relationship.

use super::load_tree::{RelationshipLoadNode, RelationshipTree};
use super::EagerLoadError;
use crate::runner::Row;
use crate::utils::{NODE_KEY, RELATIONSHIP_KEY};
use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydratedEntity {
    pub labels: Vec<String>,
    pub properties: BTreeMap<String, Value>,
    /// One list per loaded alias, possibly empty
    pub relationships: BTreeMap<String, Vec<RelatedEntity>>,
}

impl HydratedEntity {
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Entries loaded under `alias`; empty when the alias was not loaded.
    pub fn related(&self, alias: &str) -> &[RelatedEntity] {
        self.relationships
            .get(alias)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedEntity {
    pub node: HydratedEntity,
    pub relationship_properties: BTreeMap<String, Value>,
}

pub fn hydrate_rows(
    rows: &[Row],
    root_identifier: &str,
    tree: &RelationshipTree,
) -> Result<Vec<HydratedEntity>, EagerLoadError> {
    rows.iter()
        .map(|row| hydrate_row(row, root_identifier, tree))
        .collect()
}

pub fn hydrate_row(
    row: &Row,
    root_identifier: &str,
    tree: &RelationshipTree,
) -> Result<HydratedEntity, EagerLoadError> {
    let root = row
        .get(root_identifier)
        .ok_or_else(|| EagerLoadError::MissingColumn(root_identifier.to_string()))?;
    let mut entity = entity_from_value(root, root_identifier)?;
    for node in tree.nodes() {
        let related = hydrate_related(row.get(node.alias()), node, node.alias())?;
        entity.relationships.insert(node.alias().to_string(), related);
    }
    Ok(entity)
}

fn hydrate_related(
    value: Option<&Value>,
    node: &RelationshipLoadNode,
    column: &str,
) -> Result<Vec<RelatedEntity>, EagerLoadError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::List(items)) => items,
        Some(other) => return Err(EagerLoadError::unexpected(column, "list", other.type_name())),
    };

    let mut related = Vec::with_capacity(items.len());
    for item in items {
        let entry = match item {
            Value::Map(entry) => entry,
            Value::Null => {
                log::debug!("Dropping null entry in '{}'", column);
                continue;
            }
            other => return Err(EagerLoadError::unexpected(column, "map", other.type_name())),
        };

        let (Some(target), Some(relationship)) = (
            entry.get(NODE_KEY).filter(|v| !v.is_null()),
            entry.get(RELATIONSHIP_KEY).filter(|v| !v.is_null()),
        ) else {
            log::debug!("Dropping entry in '{}' without node or relationship", column);
            continue;
        };

        let mut entity = entity_from_value(target, column)?;
        for child in node.children() {
            let child_column = format!("{}.{}", column, child.alias());
            let nested = hydrate_related(entry.get(child.alias()), child, &child_column)?;
            entity.relationships.insert(child.alias().to_string(), nested);
        }
        related.push(RelatedEntity {
            node: entity,
            relationship_properties: relationship_properties(relationship, column)?,
        });
    }
    Ok(related)
}

fn entity_from_value(value: &Value, column: &str) -> Result<HydratedEntity, EagerLoadError> {
    match value {
        Value::Node(node) => Ok(HydratedEntity {
            labels: node.labels.clone(),
            properties: node.properties.clone(),
            relationships: BTreeMap::new(),
        }),
        Value::Map(properties) => Ok(HydratedEntity {
            properties: properties.clone(),
            ..HydratedEntity::default()
        }),
        other => Err(EagerLoadError::unexpected(column, "node", other.type_name())),
    }
}

fn relationship_properties(
    value: &Value,
    column: &str,
) -> Result<BTreeMap<String, Value>, EagerLoadError> {
    match value {
        Value::Relationship(rel) => Ok(rel.properties.clone()),
        Value::Map(properties) => Ok(properties.clone()),
        other => Err(EagerLoadError::unexpected(
            column,
            "relationship",
            other.type_name(),
        )),
    }
}
