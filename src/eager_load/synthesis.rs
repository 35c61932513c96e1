//! Eager-load statement synthesis
//!
//! The root is matched once; each relationship-load node becomes a `CALL { }`
//! block that imports its parent, optionally matches the relationship, filters
//! out the null row `OPTIONAL MATCH` yields on no match, recurses into its
//! children and collects `{ node, relationship, <child aliases> }` maps into
//! one column named after the alias. All blocks bind into one table.

use super::hydration::{hydrate_rows, HydratedEntity};
use super::load_tree::{
    validate_order, validate_paging, validate_properties, LoadOrder, LoadTarget,
    RelationshipLoadConfig, RelationshipLoadNode, RelationshipTree,
};
use super::EagerLoadError;
use crate::parameters::ParameterTable;
use crate::pattern::{NodePattern, Pattern, PatternElement, RelationshipPattern};
use crate::predicate::{split_by_operator, PropertyFilters, WhereParams};
use crate::query_builder::{
    Clause, MatchSpec, OrderBySpec, OrderItem, Payload, ProjectionItem, ProjectionSpec,
    QueryBuilder, Statement,
};
use crate::runner::{QueryRunner, RunOptions, Row};
use crate::utils::{escape_identifier, validate_identifier, NODE_KEY, RELATIONSHIP_KEY};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROOT_IDENTIFIER: &str = "n";

/// Root entity plus the relationships to load with it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EagerLoadRequest {
    pub label: String,
    /// Defaults to [`DEFAULT_ROOT_IDENTIFIER`]
    pub identifier: Option<String>,
    #[serde(default, rename = "where")]
    pub filters: PropertyFilters,
    #[serde(default)]
    pub order: Vec<LoadOrder>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub relationships: Vec<RelationshipLoadConfig>,
}

impl EagerLoadRequest {
    pub fn new(label: impl Into<String>) -> Self {
        EagerLoadRequest {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn filter(mut self, filters: PropertyFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn order(mut self, order: LoadOrder) -> Self {
        self.order.push(order);
        self
    }

    pub fn skip(mut self, skip: i64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn relationship(mut self, config: RelationshipLoadConfig) -> Self {
        self.relationships.push(config);
        self
    }

    pub fn root_identifier(&self) -> &str {
        self.identifier.as_deref().unwrap_or(DEFAULT_ROOT_IDENTIFIER)
    }
}

/// Statement ready to run plus what hydration needs to invert its rows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EagerLoadResult {
    pub statement: String,
    pub parameters: ParameterTable,
    pub root_identifier: String,
    #[serde(rename = "relationships")]
    pub tree: RelationshipTree,
}

impl EagerLoadResult {
    pub fn to_statement(&self) -> Statement {
        Statement {
            text: self.statement.clone(),
            parameters: self.parameters.clone(),
        }
    }

    pub fn hydrate(&self, rows: &[Row]) -> Result<Vec<HydratedEntity>, EagerLoadError> {
        hydrate_rows(rows, &self.root_identifier, &self.tree)
    }

    /// Run the statement through `runner` and hydrate the returned rows.
    pub async fn execute<R>(
        &self,
        runner: &R,
        options: &RunOptions,
    ) -> Result<Vec<HydratedEntity>, EagerLoadError>
    where
        R: QueryRunner + ?Sized,
    {
        let rows = runner.run(&self.to_statement(), options).await?;
        log::debug!("Eager load returned {} rows", rows.len());
        self.hydrate(&rows)
    }
}

/// Build the eager-load statement for `request`, binding into `parameters`.
pub fn synthesize(
    request: &EagerLoadRequest,
    parameters: ParameterTable,
) -> Result<EagerLoadResult, EagerLoadError> {
    let root = request.root_identifier();
    validate_identifier(root)
        .map_err(|e| EagerLoadError::InvalidConfig(format!("root identifier: {}", e)))?;
    if request.label.trim().is_empty() {
        return Err(EagerLoadError::InvalidConfig(
            "root label must not be empty".to_string(),
        ));
    }
    validate_properties(&request.filters)?;
    for order in &request.order {
        validate_order(order)?;
        if order.on == LoadTarget::Relationship {
            return Err(EagerLoadError::InvalidConfig(format!(
                "root order on '{}' cannot target a relationship",
                order.property
            )));
        }
    }
    validate_paging(root, request.skip, request.limit)?;
    let tree = RelationshipTree::build(&request.relationships, root)?;

    let mut builder = QueryBuilder::with_parameters(parameters);

    let split = split_by_operator(&request.filters);
    let mut root_node = NodePattern::named(root).label(request.label.as_str());
    if !split.equality.is_empty() {
        root_node = root_node.filter(split.equality);
    }
    builder.match_(root_node)?;
    if !split.predicate.is_empty() {
        builder.where_(WhereParams::for_identifier(root, split.predicate))?;
    }

    if !request.order.is_empty() || request.skip.is_some() || request.limit.is_some() {
        builder.with(ProjectionSpec::new([root]))?;
        for clause in paging_clauses(&request.order, request.skip, request.limit, root, root) {
            builder.add(clause)?;
        }
    }

    for node in tree.nodes() {
        builder.call(block_clauses(node, root))?;
    }

    let mut returned = vec![root.to_string()];
    returned.extend(tree.aliases().map(str::to_string));
    builder.return_(ProjectionSpec::new(returned))?;

    let statement = builder.build();
    log::debug!("Synthesized eager load: {}", statement.text);

    Ok(EagerLoadResult {
        statement: statement.text,
        parameters: statement.parameters,
        root_identifier: root.to_string(),
        tree,
    })
}

/// Clauses of the `CALL { }` block loading `node` for `parent`.
fn block_clauses(node: &RelationshipLoadNode, parent: &str) -> Vec<Clause> {
    let target = node.node_identifier();
    let rel = node.relationship_identifier();

    let mut target_pattern = NodePattern::named(target.as_str());
    if let Some(label) = node.target_label() {
        target_pattern = target_pattern.label(label);
    }
    let pattern = Pattern::related([
        PatternElement::from(NodePattern::named(parent)),
        RelationshipPattern::named(rel.as_str())
            .rel_type(node.relationship_name())
            .direction(node.direction())
            .into(),
        target_pattern.into(),
    ]);

    let mut clauses = vec![
        Clause::With(ProjectionSpec::new([parent]).into()),
        Clause::Match(MatchSpec::optional(pattern).into()),
    ];

    let mut filters = WhereParams::new();
    if !node.target_filters().is_empty() {
        filters.insert_filters(target.as_str(), node.target_filters().clone());
    }
    if !node.relationship_filters().is_empty() {
        filters.insert_filters(rel.as_str(), node.relationship_filters().clone());
    }
    if !filters.is_empty() {
        clauses.push(Clause::Where(filters.into()));
    }

    let in_scope = [target.as_str(), rel.as_str()];
    clauses.push(Clause::With(ProjectionSpec::new(in_scope).into()));
    clauses.push(Clause::Where(Payload::raw(format!(
        "{} IS NOT NULL AND {} IS NOT NULL",
        target, rel
    ))));

    if !node.order().is_empty() || node.skip().is_some() || node.limit().is_some() {
        clauses.push(Clause::With(ProjectionSpec::new(in_scope).into()));
        clauses.extend(paging_clauses(
            node.order(),
            node.skip(),
            node.limit(),
            &target,
            &rel,
        ));
    }

    for child in node.children() {
        clauses.push(Clause::Call(block_clauses(child, &target).into()));
    }

    let mut entry = vec![
        format!("{}: {}", NODE_KEY, target),
        format!("{}: {}", RELATIONSHIP_KEY, rel),
    ];
    entry.extend(
        node.children()
            .iter()
            .map(|child| format!("{}: {}", child.alias(), child.alias())),
    );
    clauses.push(Clause::Return(
        ProjectionSpec::new([ProjectionItem::aliased(
            format!("collect({{ {} }})", entry.join(", ")),
            node.alias(),
        )])
        .into(),
    ));
    clauses
}

/// `ORDER BY`, `SKIP` and `LIMIT` for one scope.
fn paging_clauses(
    order: &[LoadOrder],
    skip: Option<i64>,
    limit: Option<i64>,
    node_identifier: &str,
    relationship_identifier: &str,
) -> Vec<Clause> {
    let mut clauses = Vec::new();
    if !order.is_empty() {
        let items = order.iter().map(|o| {
            let owner = match o.on {
                LoadTarget::Node => node_identifier,
                LoadTarget::Relationship => relationship_identifier,
            };
            OrderItem::new(
                format!("{}.{}", owner, escape_identifier(&o.property)),
                o.direction,
            )
        });
        clauses.push(Clause::OrderBy(OrderBySpec::new(items).into()));
    }
    if let Some(skip) = skip {
        clauses.push(Clause::Skip(skip.into()));
    }
    if let Some(limit) = limit {
        clauses.push(Clause::Limit(limit.into()));
    }
    clauses
}
