//! Relationship load trees
//!
//! [`RelationshipLoadConfig`] is the caller-facing description of what to load;
//! [`RelationshipTree::build`] validates it once into an immutable tree that
//! both synthesis and hydration walk.

use super::EagerLoadError;
use crate::pattern::Direction;
use crate::predicate::PropertyFilters;
use crate::query_builder::SortDirection;
use crate::utils::{is_prototype_key, is_reserved_alias, is_safe_identifier};
use crate::parameters::NAME_SEPARATOR;
use serde::{Deserialize, Serialize};

/// What an ordering property belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadTarget {
    #[default]
    Node,
    Relationship,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoadOrder {
    pub property: String,
    #[serde(default)]
    pub direction: Option<SortDirection>,
    #[serde(default)]
    pub on: LoadTarget,
}

impl LoadOrder {
    pub fn asc(property: impl Into<String>) -> Self {
        LoadOrder {
            property: property.into(),
            direction: Some(SortDirection::Ascending),
            on: LoadTarget::Node,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        LoadOrder {
            property: property.into(),
            direction: Some(SortDirection::Descending),
            on: LoadTarget::Node,
        }
    }

    pub fn on_relationship(mut self) -> Self {
        self.on = LoadTarget::Relationship;
        self
    }
}

/// Filters applied inside one load block
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadWhere {
    #[serde(default)]
    pub target: PropertyFilters,
    #[serde(default)]
    pub relationship: PropertyFilters,
}

/// Caller-facing load description, e.g.
/// `{"alias": "Orders", "relationshipName": "PLACED", "targetLabel": "Order"}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RelationshipLoadConfig {
    pub alias: String,
    pub relationship_name: String,
    #[serde(default)]
    pub direction: Direction,
    pub target_label: Option<String>,
    #[serde(default, rename = "where")]
    pub filters: LoadWhere,
    #[serde(default)]
    pub order: Vec<LoadOrder>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    #[serde(default)]
    pub children: Vec<RelationshipLoadConfig>,
}

impl RelationshipLoadConfig {
    pub fn new(alias: impl Into<String>, relationship_name: impl Into<String>) -> Self {
        RelationshipLoadConfig {
            alias: alias.into(),
            relationship_name: relationship_name.into(),
            ..Self::default()
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn target_label(mut self, label: impl Into<String>) -> Self {
        self.target_label = Some(label.into());
        self
    }

    pub fn where_target(mut self, filters: PropertyFilters) -> Self {
        self.filters.target = filters;
        self
    }

    pub fn where_relationship(mut self, filters: PropertyFilters) -> Self {
        self.filters.relationship = filters;
        self
    }

    pub fn order(mut self, order: LoadOrder) -> Self {
        self.order.push(order);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: i64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn child(mut self, child: RelationshipLoadConfig) -> Self {
        self.children.push(child);
        self
    }
}

/// Validated, read-only load node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipLoadNode {
    alias: String,
    relationship_name: String,
    direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_label: Option<String>,
    #[serde(skip)]
    filters: LoadWhere,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    order: Vec<LoadOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip: Option<i64>,
    children: Vec<RelationshipLoadNode>,
    #[serde(skip)]
    depth: usize,
}

impl RelationshipLoadNode {
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn relationship_name(&self) -> &str {
        &self.relationship_name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn target_label(&self) -> Option<&str> {
        self.target_label.as_deref()
    }

    pub fn target_filters(&self) -> &PropertyFilters {
        &self.filters.target
    }

    pub fn relationship_filters(&self) -> &PropertyFilters {
        &self.filters.relationship
    }

    pub fn order(&self) -> &[LoadOrder] {
        &self.order
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn skip(&self) -> Option<i64> {
        self.skip
    }

    pub fn children(&self) -> &[RelationshipLoadNode] {
        &self.children
    }

    /// 1 for nodes directly under the root
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Identifier of the target node inside this block, e.g. `Orders__n1`
    pub fn node_identifier(&self) -> String {
        format!("{}{}n{}", self.alias, NAME_SEPARATOR, self.depth)
    }

    /// Identifier of the relationship inside this block, e.g. `Orders__r1`
    pub fn relationship_identifier(&self) -> String {
        format!("{}{}r{}", self.alias, NAME_SEPARATOR, self.depth)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RelationshipTree {
    nodes: Vec<RelationshipLoadNode>,
}

impl RelationshipTree {
    /// Validate `configs` for a root bound to `root_identifier`.
    ///
    /// # Errors
    /// - `ReservedName` for aliases that collide with hydrated entry keys,
    ///   prototype keys, the `__` separator or the root identifier, and for
    ///   prototype keys used as filter or order properties
    /// - `DuplicateAlias` for repeated sibling aliases
    /// - `InvalidConfig` for unsafe aliases, empty relationship names and
    ///   negative skip/limit
    pub fn build(
        configs: &[RelationshipLoadConfig],
        root_identifier: &str,
    ) -> Result<Self, EagerLoadError> {
        Ok(RelationshipTree {
            nodes: build_level(configs, root_identifier, 1)?,
        })
    }

    pub fn nodes(&self) -> &[RelationshipLoadNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level aliases in configuration order
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.alias.as_str())
    }
}

fn build_level(
    configs: &[RelationshipLoadConfig],
    root_identifier: &str,
    depth: usize,
) -> Result<Vec<RelationshipLoadNode>, EagerLoadError> {
    let mut nodes: Vec<RelationshipLoadNode> = Vec::with_capacity(configs.len());
    for config in configs {
        validate_alias(&config.alias, root_identifier)?;
        if nodes.iter().any(|n| n.alias == config.alias) {
            return Err(EagerLoadError::DuplicateAlias(config.alias.clone()));
        }
        if config.relationship_name.trim().is_empty() {
            return Err(EagerLoadError::InvalidConfig(format!(
                "'{}' has an empty relationship name",
                config.alias
            )));
        }
        validate_properties(&config.filters.target)?;
        validate_properties(&config.filters.relationship)?;
        for order in &config.order {
            validate_order(order)?;
        }
        validate_paging(&config.alias, config.skip, config.limit)?;

        nodes.push(RelationshipLoadNode {
            alias: config.alias.clone(),
            relationship_name: config.relationship_name.clone(),
            direction: config.direction,
            target_label: config.target_label.clone(),
            filters: config.filters.clone(),
            order: config.order.clone(),
            limit: config.limit,
            skip: config.skip,
            children: build_level(&config.children, root_identifier, depth + 1)?,
            depth,
        });
    }
    Ok(nodes)
}

fn validate_alias(alias: &str, root_identifier: &str) -> Result<(), EagerLoadError> {
    if is_reserved_alias(alias) {
        let reason = if is_prototype_key(alias) {
            "prototype key"
        } else {
            "collides with a hydrated entry key"
        };
        return Err(EagerLoadError::reserved(alias, reason));
    }
    if alias.contains(NAME_SEPARATOR) {
        return Err(EagerLoadError::reserved(
            alias,
            "contains the internal '__' separator",
        ));
    }
    if alias == root_identifier {
        return Err(EagerLoadError::reserved(alias, "shadows the root identifier"));
    }
    if !is_safe_identifier(alias) {
        return Err(EagerLoadError::InvalidConfig(format!(
            "alias '{}' is not a valid identifier",
            alias
        )));
    }
    Ok(())
}

pub(crate) fn validate_properties(filters: &PropertyFilters) -> Result<(), EagerLoadError> {
    match filters.properties().find(|p| is_prototype_key(p)) {
        Some(property) => Err(EagerLoadError::reserved(property, "prototype key")),
        None => Ok(()),
    }
}

pub(crate) fn validate_order(order: &LoadOrder) -> Result<(), EagerLoadError> {
    if order.property.is_empty() {
        return Err(EagerLoadError::InvalidConfig(
            "order property must not be empty".to_string(),
        ));
    }
    if is_prototype_key(&order.property) {
        return Err(EagerLoadError::reserved(&order.property, "prototype key"));
    }
    Ok(())
}

pub(crate) fn validate_paging(
    owner: &str,
    skip: Option<i64>,
    limit: Option<i64>,
) -> Result<(), EagerLoadError> {
    for (name, value) in [("skip", skip), ("limit", limit)] {
        if let Some(v) = value.filter(|v| *v < 0) {
            return Err(EagerLoadError::InvalidConfig(format!(
                "{} for '{}' must be non-negative, got {}",
                name, owner, v
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("node" ; "node key")]
    #[test_case("relationship" ; "relationship key")]
    #[test_case("__proto__" ; "proto")]
    #[test_case("constructor" ; "constructor")]
    #[test_case("prototype" ; "prototype")]
    #[test_case("Orders__x" ; "separator")]
    #[test_case("n" ; "root identifier")]
    fn test_reserved_aliases(alias: &str) {
        let result = RelationshipTree::build(&[RelationshipLoadConfig::new(alias, "R")], "n");
        assert!(
            matches!(result, Err(EagerLoadError::ReservedName { .. })),
            "{result:?}"
        );
    }

    #[test]
    fn test_unsafe_alias_is_invalid() {
        let result = RelationshipTree::build(&[RelationshipLoadConfig::new("my orders", "R")], "n");
        assert!(matches!(result, Err(EagerLoadError::InvalidConfig(_))));
    }

    #[test]
    fn test_duplicate_siblings_rejected_but_cousins_allowed() {
        let dup = [
            RelationshipLoadConfig::new("Orders", "PLACED"),
            RelationshipLoadConfig::new("Orders", "PLACED"),
        ];
        assert_eq!(
            RelationshipTree::build(&dup, "n"),
            Err(EagerLoadError::DuplicateAlias("Orders".to_string()))
        );

        let nested = [RelationshipLoadConfig::new("Items", "HAS")
            .child(RelationshipLoadConfig::new("Items", "HAS"))];
        let tree = RelationshipTree::build(&nested, "n").unwrap();
        let child = &tree.nodes()[0].children()[0];
        assert_eq!(child.depth(), 2);
        assert_eq!(child.node_identifier(), "Items__n2");
        assert_eq!(tree.nodes()[0].node_identifier(), "Items__n1");
    }

    #[test]
    fn test_prototype_filter_property_rejected() {
        let config = RelationshipLoadConfig::new("Orders", "PLACED")
            .where_target(PropertyFilters::new().with("constructor", 1));
        assert_eq!(
            RelationshipTree::build(&[config], "n"),
            Err(EagerLoadError::reserved("constructor", "prototype key"))
        );

        let config = RelationshipLoadConfig::new("Orders", "PLACED").order(LoadOrder::asc("__proto__"));
        assert!(matches!(
            RelationshipTree::build(&[config], "n"),
            Err(EagerLoadError::ReservedName { .. })
        ));
    }

    #[test]
    fn test_negative_paging_rejected() {
        let config = RelationshipLoadConfig::new("Orders", "PLACED").limit(-1);
        assert!(matches!(
            RelationshipTree::build(&[config], "n"),
            Err(EagerLoadError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_deserialize_config() {
        let config: RelationshipLoadConfig = serde_json::from_value(json!({
            "alias": "Orders",
            "relationshipName": "PLACED",
            "targetLabel": "Order",
            "where": {"target": {"total": {"gt": 10}}},
            "order": [{"property": "createdAt", "direction": "desc"}],
            "limit": 5,
            "children": [{"alias": "Products", "relationshipName": "CONTAINS", "direction": "out"}]
        }))
        .unwrap();
        assert_eq!(config.target_label.as_deref(), Some("Order"));
        assert_eq!(config.order, vec![LoadOrder::desc("createdAt")]);
        assert_eq!(config.children[0].alias, "Products");
        assert_eq!(config.filters.target.len(), 1);
    }

    #[test]
    fn test_tree_serializes_shape() {
        let tree = RelationshipTree::build(
            &[RelationshipLoadConfig::new("Orders", "PLACED")
                .target_label("Order")
                .child(RelationshipLoadConfig::new("Products", "CONTAINS").direction(Direction::In))],
            "n",
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!([{
                "alias": "Orders",
                "relationshipName": "PLACED",
                "direction": "out",
                "targetLabel": "Order",
                "children": [{
                    "alias": "Products",
                    "relationshipName": "CONTAINS",
                    "direction": "in",
                    "children": []
                }]
            }])
        );
    }
}
