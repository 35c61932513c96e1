//! Lowering of clause descriptors to Cypher fragments

use super::clause::{
    Clause, DeleteSpec, MatchSpec, OrderBySpec, Payload, ProjectionSpec, RemoveSpec, SetSpec,
    UnwindSpec,
};
use super::QueryBuilderError;
use crate::parameters::ParameterTable;
use crate::pattern::{render_pattern, Pattern};
use crate::predicate::{bind, Operand, Where, WhereParams};
use crate::utils::{escape_identifier, escape_label, parameter_suffix};
use crate::value::Value;

/// Lower a descriptor to Cypher text, binding its values into `table`.
///
/// Implementations may leave partial bindings in `table` on error; callers that
/// need atomicity snapshot the table first (see `QueryBuilder::add`).
pub trait ToCypher {
    fn to_cypher(&self, table: &mut ParameterTable) -> Result<String, QueryBuilderError>;
}

impl ToCypher for Clause {
    fn to_cypher(&self, table: &mut ParameterTable) -> Result<String, QueryBuilderError> {
        let keyword = self.keyword();
        match self {
            Clause::Match(payload) => prefixed(keyword, payload, table),
            Clause::Create(payload) | Clause::Merge(payload) => prefixed(keyword, payload, table),
            Clause::Set(payload) | Clause::OnCreateSet(payload) | Clause::OnMatchSet(payload) => {
                prefixed(keyword, payload, table)
            }
            Clause::Delete(payload) => prefixed(keyword, payload, table),
            Clause::Remove(payload) => prefixed(keyword, payload, table),
            Clause::Return(payload) | Clause::With(payload) => prefixed(keyword, payload, table),
            Clause::OrderBy(payload) => prefixed(keyword, payload, table),
            Clause::Unwind(payload) => prefixed(keyword, payload, table),
            Clause::ForEach(body) => Ok(format!("FOREACH {}", body.trim())),
            Clause::Where(payload) => prefixed(keyword, payload, table),
            Clause::Skip(payload) | Clause::Limit(payload) => {
                prefixed(keyword, &Paging { payload, keyword }, table)
            }
            Clause::Call(Payload::Raw(body)) => Ok(format!("CALL {{ {} }}", body.trim())),
            Clause::Call(Payload::Structured(clauses)) => {
                if clauses.is_empty() {
                    return Err(QueryBuilderError::invalid_clause(keyword, "empty subquery"));
                }
                let mut fragments = Vec::with_capacity(clauses.len());
                for clause in clauses {
                    fragments.push(clause.to_cypher(table)?);
                }
                Ok(format!("CALL {{ {} }}", join_fragments(&fragments)))
            }
            Clause::Raw(text) => Ok(text.trim().to_string()),
        }
    }
}

/// `KEYWORD body`, where a raw body is used verbatim.
fn prefixed<B: ToCypher>(
    keyword: &str,
    body: &B,
    table: &mut ParameterTable,
) -> Result<String, QueryBuilderError> {
    let body = body.to_cypher(table)?;
    Ok(format!("{} {}", keyword, body))
}

impl<T: ToCypher> ToCypher for Payload<T> {
    fn to_cypher(&self, table: &mut ParameterTable) -> Result<String, QueryBuilderError> {
        match self {
            Payload::Raw(text) => Ok(text.trim().to_string()),
            Payload::Structured(spec) => spec.to_cypher(table),
        }
    }
}

impl ToCypher for Pattern {
    fn to_cypher(&self, table: &mut ParameterTable) -> Result<String, QueryBuilderError> {
        Ok(render_pattern(self, table)?)
    }
}

impl ToCypher for MatchSpec {
    fn to_cypher(&self, table: &mut ParameterTable) -> Result<String, QueryBuilderError> {
        self.pattern.to_cypher(table)
    }
}

impl ToCypher for SetSpec {
    fn to_cypher(&self, table: &mut ParameterTable) -> Result<String, QueryBuilderError> {
        if self.properties.is_empty() {
            return Err(QueryBuilderError::invalid_clause(
                "SET",
                format!("no properties given for '{}'", self.identifier),
            ));
        }
        let identifier = escape_identifier(&self.identifier);
        let mut assignments = Vec::with_capacity(self.properties.len());
        for (property, operand) in &self.properties {
            let rhs = match operand {
                Operand::Literal(expression) => expression.clone(),
                Operand::Value(value) => {
                    format!("${}", bind(&self.identifier, property, value, table)?)
                }
            };
            assignments.push(format!(
                "{}.{} = {}",
                identifier,
                escape_identifier(property),
                rhs
            ));
        }
        Ok(assignments.join(", "))
    }
}

impl ToCypher for DeleteSpec {
    fn to_cypher(&self, _table: &mut ParameterTable) -> Result<String, QueryBuilderError> {
        if self.identifiers.is_empty() {
            return Err(QueryBuilderError::invalid_clause(
                "DELETE",
                "no identifiers given",
            ));
        }
        Ok(self
            .identifiers
            .iter()
            .map(|identifier| escape_identifier(identifier))
            .collect::<Vec<_>>()
            .join(", "))
    }
}

impl ToCypher for RemoveSpec {
    fn to_cypher(&self, _table: &mut ParameterTable) -> Result<String, QueryBuilderError> {
        if self.properties.is_empty() && self.labels.is_empty() {
            return Err(QueryBuilderError::invalid_clause(
                "REMOVE",
                format!("nothing to remove from '{}'", self.identifier),
            ));
        }
        let identifier = escape_identifier(&self.identifier);
        let properties = self
            .properties
            .iter()
            .map(|property| format!("{}.{}", identifier, escape_identifier(property)));
        let labels = self
            .labels
            .iter()
            .map(|label| format!("{}:{}", identifier, escape_label(label)));
        Ok(properties.chain(labels).collect::<Vec<_>>().join(", "))
    }
}

impl ToCypher for ProjectionSpec {
    fn to_cypher(&self, _table: &mut ParameterTable) -> Result<String, QueryBuilderError> {
        if self.items.is_empty() {
            return Err(QueryBuilderError::invalid_clause(
                "projection",
                "no items given",
            ));
        }
        let mut items = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let expression = item.expression.trim();
            if expression.is_empty() {
                return Err(QueryBuilderError::invalid_clause(
                    "projection",
                    "empty expression",
                ));
            }
            items.push(match &item.alias {
                Some(alias) => format!("{} AS {}", expression, escape_identifier(alias)),
                None => expression.to_string(),
            });
        }
        let distinct = if self.distinct { "DISTINCT " } else { "" };
        Ok(format!("{}{}", distinct, items.join(", ")))
    }
}

impl ToCypher for OrderBySpec {
    fn to_cypher(&self, _table: &mut ParameterTable) -> Result<String, QueryBuilderError> {
        if self.items.is_empty() {
            return Err(QueryBuilderError::invalid_clause(
                "ORDER BY",
                "no items given",
            ));
        }
        Ok(self
            .items
            .iter()
            .map(|item| match item.direction {
                Some(direction) => format!("{} {}", item.expression.trim(), direction.keyword()),
                None => item.expression.trim().to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "))
    }
}

impl ToCypher for UnwindSpec {
    fn to_cypher(&self, table: &mut ParameterTable) -> Result<String, QueryBuilderError> {
        let list = match &self.value {
            Operand::Literal(expression) => expression.clone(),
            Operand::Value(value) => format!("${}", bind("", &self.alias, value, table)?),
        };
        Ok(format!("{} AS {}", list, escape_identifier(&self.alias)))
    }
}

impl ToCypher for WhereParams {
    fn to_cypher(&self, table: &mut ParameterTable) -> Result<String, QueryBuilderError> {
        let predicate = Where::new(self.clone(), table)?;
        if predicate.is_empty() {
            return Err(QueryBuilderError::invalid_clause("WHERE", "no filters given"));
        }
        Ok(predicate.text())
    }
}

/// `SKIP`/`LIMIT` count, bound as an integer parameter named after the clause
struct Paging<'a> {
    payload: &'a Payload<i64>,
    keyword: &'static str,
}

impl ToCypher for Paging<'_> {
    fn to_cypher(&self, table: &mut ParameterTable) -> Result<String, QueryBuilderError> {
        match self.payload {
            Payload::Raw(text) => Ok(text.trim().to_string()),
            Payload::Structured(count) if *count < 0 => Err(QueryBuilderError::invalid_clause(
                self.keyword,
                format!("count must be non-negative, got {}", count),
            )),
            Payload::Structured(count) => {
                let suffix = parameter_suffix(&self.keyword.to_lowercase());
                let name = table.unique_name_and_add(&suffix, Value::Integer(*count))?;
                Ok(format!("${}", name))
            }
        }
    }
}

/// Trim each fragment and join with single spaces, skipping empties.
pub(crate) fn join_fragments(fragments: &[String]) -> String {
    fragments
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
