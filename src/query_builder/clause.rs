//! Clause descriptors
//!
//! Every clause payload is either raw Cypher (emitted as is, unvalidated) or a
//! structured value that is escaped and bound on lowering. In JSON the clause
//! kind is the single key of an object: `{"match": {...}}`, `{"skip": 10}`,
//! `{"where": "n.age > 18"}`.

use super::QueryBuilderError;
use crate::pattern::{NodePattern, Pattern};
use crate::predicate::{Operand, WhereParams};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Raw text or a structured payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Payload<T> {
    Raw(String),
    Structured(T),
}

impl<T> Payload<T> {
    pub fn raw(text: impl Into<String>) -> Self {
        Payload::Raw(text.into())
    }
}

impl<T> From<T> for Payload<T> {
    fn from(structured: T) -> Self {
        Payload::Structured(structured)
    }
}

impl From<NodePattern> for Payload<Pattern> {
    fn from(node: NodePattern) -> Self {
        Payload::Structured(Pattern::Node(node))
    }
}

impl From<NodePattern> for Payload<MatchSpec> {
    fn from(node: NodePattern) -> Self {
        Payload::Structured(MatchSpec::new(node))
    }
}

impl From<Pattern> for Payload<MatchSpec> {
    fn from(pattern: Pattern) -> Self {
        Payload::Structured(MatchSpec::new(pattern))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Clause {
    Match(Payload<MatchSpec>),
    Create(Payload<Pattern>),
    Merge(Payload<Pattern>),
    Set(Payload<SetSpec>),
    OnCreateSet(Payload<SetSpec>),
    OnMatchSet(Payload<SetSpec>),
    Delete(Payload<DeleteSpec>),
    Remove(Payload<RemoveSpec>),
    Return(Payload<ProjectionSpec>),
    With(Payload<ProjectionSpec>),
    OrderBy(Payload<OrderBySpec>),
    Unwind(Payload<UnwindSpec>),
    /// Always raw: `FOREACH (x IN list | ...)` bodies are free-form
    ForEach(String),
    Where(Payload<WhereParams>),
    Skip(Payload<i64>),
    Limit(Payload<i64>),
    /// `CALL { ... }` whose clauses share the enclosing parameter table
    Call(Payload<Vec<Clause>>),
    Raw(String),
}

impl Clause {
    /// Parse a JSON descriptor; shape errors surface as `InvalidClause`.
    pub fn from_json(json: serde_json::Value) -> Result<Clause, QueryBuilderError> {
        serde_json::from_value(json)
            .map_err(|e| QueryBuilderError::invalid_clause("descriptor", e.to_string()))
    }

    /// Cypher keyword, used in error messages
    pub fn keyword(&self) -> &'static str {
        match self {
            Clause::Match(Payload::Structured(spec)) if spec.optional => "OPTIONAL MATCH",
            Clause::Match(_) => "MATCH",
            Clause::Create(_) => "CREATE",
            Clause::Merge(_) => "MERGE",
            Clause::Set(_) => "SET",
            Clause::OnCreateSet(_) => "ON CREATE SET",
            Clause::OnMatchSet(_) => "ON MATCH SET",
            Clause::Delete(Payload::Structured(spec)) if spec.detach => "DETACH DELETE",
            Clause::Delete(_) => "DELETE",
            Clause::Remove(_) => "REMOVE",
            Clause::Return(_) => "RETURN",
            Clause::With(_) => "WITH",
            Clause::OrderBy(_) => "ORDER BY",
            Clause::Unwind(_) => "UNWIND",
            Clause::ForEach(_) => "FOREACH",
            Clause::Where(_) => "WHERE",
            Clause::Skip(_) => "SKIP",
            Clause::Limit(_) => "LIMIT",
            Clause::Call(_) => "CALL",
            Clause::Raw(_) => "raw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatchSpec {
    pub pattern: Pattern,
    #[serde(default)]
    pub optional: bool,
}

impl MatchSpec {
    pub fn new(pattern: impl Into<Pattern>) -> Self {
        MatchSpec {
            pattern: pattern.into(),
            optional: false,
        }
    }

    pub fn optional(pattern: impl Into<Pattern>) -> Self {
        MatchSpec {
            pattern: pattern.into(),
            optional: true,
        }
    }
}

/// `SET identifier.property = value, ...`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "SetSpecDef")]
pub struct SetSpec {
    pub identifier: String,
    pub properties: Vec<(String, Operand)>,
}

impl SetSpec {
    pub fn new(identifier: impl Into<String>) -> Self {
        SetSpec {
            identifier: identifier.into(),
            properties: Vec::new(),
        }
    }

    /// Bound as a fresh parameter
    pub fn property(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .push((property.into(), Operand::Value(value.into())));
        self
    }

    /// Emitted verbatim
    pub fn literal(mut self, property: impl Into<String>, expression: impl Into<String>) -> Self {
        self.properties
            .push((property.into(), Operand::literal(expression)));
        self
    }
}

#[derive(Deserialize)]
struct SetSpecDef {
    identifier: String,
    properties: serde_json::Map<String, serde_json::Value>,
}

impl From<SetSpecDef> for SetSpec {
    fn from(def: SetSpecDef) -> Self {
        SetSpec {
            identifier: def.identifier,
            properties: def
                .properties
                .into_iter()
                .map(|(property, json)| (property, Operand::from(json)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeleteSpec {
    pub identifiers: Vec<String>,
    #[serde(default)]
    pub detach: bool,
}

impl DeleteSpec {
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DeleteSpec {
            identifiers: identifiers.into_iter().map(Into::into).collect(),
            detach: false,
        }
    }

    pub fn detach(mut self) -> Self {
        self.detach = true;
        self
    }
}

/// `REMOVE n.prop, n:`Label``
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoveSpec {
    pub identifier: String,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl RemoveSpec {
    pub fn new(identifier: impl Into<String>) -> Self {
        RemoveSpec {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.properties.push(property.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }
}

/// One `RETURN`/`WITH` item; the expression is Cypher text, the alias is escaped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ProjectionItemDef")]
pub struct ProjectionItem {
    pub expression: String,
    pub alias: Option<String>,
}

impl ProjectionItem {
    pub fn new(expression: impl Into<String>) -> Self {
        ProjectionItem {
            expression: expression.into(),
            alias: None,
        }
    }

    pub fn aliased(expression: impl Into<String>, alias: impl Into<String>) -> Self {
        ProjectionItem {
            expression: expression.into(),
            alias: Some(alias.into()),
        }
    }
}

impl From<&str> for ProjectionItem {
    fn from(expression: &str) -> Self {
        ProjectionItem::new(expression)
    }
}

impl From<String> for ProjectionItem {
    fn from(expression: String) -> Self {
        ProjectionItem::new(expression)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectionItemDef {
    Expression(String),
    Aliased {
        expression: String,
        alias: Option<String>,
    },
}

impl From<ProjectionItemDef> for ProjectionItem {
    fn from(def: ProjectionItemDef) -> Self {
        match def {
            ProjectionItemDef::Expression(expression) => ProjectionItem::new(expression),
            ProjectionItemDef::Aliased { expression, alias } => ProjectionItem { expression, alias },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "ProjectionSpecDef")]
pub struct ProjectionSpec {
    pub items: Vec<ProjectionItem>,
    pub distinct: bool,
}

impl ProjectionSpec {
    pub fn new<I, P>(items: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ProjectionItem>,
    {
        ProjectionSpec {
            items: items.into_iter().map(Into::into).collect(),
            distinct: false,
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectionSpecDef {
    Items(Vec<ProjectionItem>),
    Full {
        items: Vec<ProjectionItem>,
        #[serde(default)]
        distinct: bool,
    },
}

impl From<ProjectionSpecDef> for ProjectionSpec {
    fn from(def: ProjectionSpecDef) -> Self {
        match def {
            ProjectionSpecDef::Items(items) => ProjectionSpec {
                items,
                distinct: false,
            },
            ProjectionSpecDef::Full { items, distinct } => ProjectionSpec { items, distinct },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc", alias = "ASC")]
    Ascending,
    #[serde(rename = "desc", alias = "DESC")]
    Descending,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "OrderItemDef")]
pub struct OrderItem {
    pub expression: String,
    pub direction: Option<SortDirection>,
}

impl OrderItem {
    pub fn new(expression: impl Into<String>, direction: Option<SortDirection>) -> Self {
        OrderItem {
            expression: expression.into(),
            direction,
        }
    }

    pub fn asc(expression: impl Into<String>) -> Self {
        OrderItem::new(expression, Some(SortDirection::Ascending))
    }

    pub fn desc(expression: impl Into<String>) -> Self {
        OrderItem::new(expression, Some(SortDirection::Descending))
    }
}

impl From<&str> for OrderItem {
    fn from(expression: &str) -> Self {
        OrderItem::new(expression, None)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OrderItemDef {
    Expression(String),
    Directed {
        expression: String,
        direction: Option<SortDirection>,
    },
}

impl From<OrderItemDef> for OrderItem {
    fn from(def: OrderItemDef) -> Self {
        match def {
            OrderItemDef::Expression(expression) => OrderItem::new(expression, None),
            OrderItemDef::Directed {
                expression,
                direction,
            } => OrderItem::new(expression, direction),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct OrderBySpec {
    pub items: Vec<OrderItem>,
}

impl OrderBySpec {
    pub fn new<I, O>(items: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<OrderItem>,
    {
        OrderBySpec {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// `UNWIND $list AS alias`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "UnwindSpecDef")]
pub struct UnwindSpec {
    pub value: Operand,
    pub alias: String,
}

impl UnwindSpec {
    pub fn new(value: impl Into<Operand>, alias: impl Into<String>) -> Self {
        UnwindSpec {
            value: value.into(),
            alias: alias.into(),
        }
    }
}

#[derive(Deserialize)]
struct UnwindSpecDef {
    value: serde_json::Value,
    #[serde(rename = "as")]
    alias: String,
}

impl From<UnwindSpecDef> for UnwindSpec {
    fn from(def: UnwindSpecDef) -> Self {
        UnwindSpec {
            value: Operand::from(def.value),
            alias: def.alias,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_raw_and_structured() {
        assert_eq!(
            Clause::from_json(json!({"match": "(n:User)"})).unwrap(),
            Clause::Match(Payload::raw("(n:User)"))
        );
        assert_eq!(
            Clause::from_json(json!({"limit": 5})).unwrap(),
            Clause::Limit(Payload::Structured(5))
        );

        let clause = Clause::from_json(json!({
            "match": {"pattern": {"node": {"identifier": "n", "label": "User"}}, "optional": true}
        }))
        .unwrap();
        assert_eq!(clause.keyword(), "OPTIONAL MATCH");
    }

    #[test]
    fn test_parse_projection_shapes() {
        let clause = Clause::from_json(json!({
            "return": ["n", {"expression": "count(m)", "alias": "total"}]
        }))
        .unwrap();
        assert_eq!(
            clause,
            Clause::Return(Payload::Structured(ProjectionSpec::new([
                ProjectionItem::new("n"),
                ProjectionItem::aliased("count(m)", "total"),
            ])))
        );

        let clause = Clause::from_json(json!({"with": {"items": ["n"], "distinct": true}})).unwrap();
        assert_eq!(
            clause,
            Clause::With(Payload::Structured(ProjectionSpec::new(["n"]).distinct()))
        );
    }

    #[test]
    fn test_parse_set_with_literal() {
        let clause = Clause::from_json(json!({
            "set": {"identifier": "n", "properties": {"age": 30, "name": {"literal": "m.name"}}}
        }))
        .unwrap();
        assert_eq!(
            clause,
            Clause::Set(Payload::Structured(
                SetSpec::new("n").property("age", 30).literal("name", "m.name")
            ))
        );
    }

    #[test]
    fn test_parse_order_and_unwind() {
        let clause = Clause::from_json(json!({
            "orderBy": ["n.name", {"expression": "n.age", "direction": "desc"}]
        }))
        .unwrap();
        assert_eq!(
            clause,
            Clause::OrderBy(Payload::Structured(OrderBySpec::new([
                OrderItem::from("n.name"),
                OrderItem::desc("n.age"),
            ])))
        );

        let clause = Clause::from_json(json!({"unwind": {"value": [1, 2], "as": "x"}})).unwrap();
        assert_eq!(
            clause,
            Clause::Unwind(Payload::Structured(UnwindSpec::new(vec![1, 2], "x")))
        );
    }

    #[test]
    fn test_parse_nested_call() {
        let clause = Clause::from_json(json!({
            "call": [{"with": ["n"]}, {"return": ["n.id"]}]
        }))
        .unwrap();
        let Clause::Call(Payload::Structured(inner)) = clause else {
            panic!("expected structured call");
        };
        assert_eq!(inner.len(), 2);
    }

    #[test]
    fn test_unknown_clause_is_invalid() {
        let err = Clause::from_json(json!({"select": "*"})).unwrap_err();
        assert!(matches!(
            err,
            QueryBuilderError::InvalidClause { clause: "descriptor", .. }
        ));
    }
}
