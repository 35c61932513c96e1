//! Predicate compiler
//!
//! Turns `identifier -> property -> value | operators` filters into either
//! - a boolean predicate (`n.age >= $age AND n.deleted IS NULL`) for `WHERE`, or
//! - a bracket object (`{ id: $id }`) for inline node/relationship patterns.
//!
//! Every operand is bound through the caller's [`ParameterTable`]. A [`Where`]
//! remembers the parameter names it allocated, so refining it with
//! [`Where::add_params`] replaces its bindings instead of leaking stale ones.
//!
//! ```
//! use cypherweave::parameters::ParameterTable;
//! use cypherweave::predicate::{Condition, StatementMode, Where, WhereParams};
//!
//! let mut table = ParameterTable::new();
//! let params = WhereParams::new().with("node", "age", Condition::Gte(18.into()));
//! let predicate = Where::new(params, &mut table).unwrap();
//! assert_eq!(predicate.statement(StatementMode::Text).unwrap(), "node.age >= $age");
//! ```

mod errors;
mod operator;
mod params;
mod split;

pub use errors::PredicateError;
pub use operator::{Condition, Operand, Operator, WhereValue};
pub use params::{PropertyFilters, WhereParams};
pub use split::{split_by_operator, SplitFilters};

use crate::parameters::ParameterTable;
use crate::utils::{escape_identifier, parameter_suffix, validate_identifier};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// How a [`Where`] is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementMode {
    /// Boolean predicate joined with `AND`
    Text,
    /// Bracket object; equality only
    Object,
}

/// Right-hand side of a compiled entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOperand {
    /// `is`/`isNot`
    None,
    Parameter(String),
    Literal(String),
}

/// One compiled comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateEntry {
    pub identifier: String,
    pub property: String,
    pub operator: Operator,
    pub operand: EntryOperand,
}

impl PredicateEntry {
    fn target(&self) -> String {
        let property = escape_identifier(&self.property);
        if self.identifier.is_empty() {
            property
        } else {
            format!("{}.{}", self.identifier, property)
        }
    }

    fn rendered_operand(&self) -> String {
        match &self.operand {
            EntryOperand::None => String::new(),
            EntryOperand::Parameter(name) => format!("${}", name),
            EntryOperand::Literal(expr) => expr.clone(),
        }
    }

    fn to_text(&self) -> String {
        match self.operator {
            Operator::Is | Operator::IsNot => {
                format!("{} {}", self.target(), self.operator.keyword())
            }
            Operator::ReverseIn => format!(
                "{} {} {}",
                self.rendered_operand(),
                self.operator.keyword(),
                self.target()
            ),
            op => format!(
                "{} {} {}",
                self.target(),
                op.keyword(),
                self.rendered_operand()
            ),
        }
    }
}

/// Compiled filters plus the parameter names they own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Where {
    params: WhereParams,
    entries: Vec<PredicateEntry>,
    owned_parameters: Vec<String>,
}

impl Where {
    pub fn new(params: WhereParams, table: &mut ParameterTable) -> Result<Self, PredicateError> {
        let mut predicate = Where::default();
        predicate.add_params(params, table)?;
        Ok(predicate)
    }

    /// Merge `params` into the accumulated filters and recompile.
    ///
    /// Parameters allocated by earlier calls are removed from `table` first, so
    /// `table` must be the one this `Where` was compiled against. On error both
    /// `self` and `table` are left as they were.
    pub fn add_params(
        &mut self,
        params: WhereParams,
        table: &mut ParameterTable,
    ) -> Result<(), PredicateError> {
        for identifier in params.identifiers() {
            if !identifier.is_empty() {
                validate_identifier(identifier)?;
            }
        }

        let mut merged = self.params.clone();
        merged.merge(params);

        let snapshot = table.clone();
        table.remove(&self.owned_parameters);

        let mut entries = Vec::new();
        let mut owned = Vec::new();
        for (identifier, filters) in merged.iter() {
            for (property, value) in filters.iter() {
                let compiled =
                    compile_value(identifier, property, value, table, &mut entries, &mut owned);
                if let Err(e) = compiled {
                    *table = snapshot;
                    return Err(e);
                }
            }
        }

        self.params = merged;
        self.entries = entries;
        self.owned_parameters = owned;
        Ok(())
    }

    pub fn statement(&self, mode: StatementMode) -> Result<String, PredicateError> {
        match mode {
            StatementMode::Text => Ok(self.text()),
            StatementMode::Object => self.object(),
        }
    }

    /// `a.x = $x AND a.y IS NULL`
    pub fn text(&self) -> String {
        self.entries
            .iter()
            .map(PredicateEntry::to_text)
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// `{ x: $x, y: $y }`; `{}` when there are no entries.
    pub fn object(&self) -> Result<String, PredicateError> {
        if self.entries.is_empty() {
            return Ok("{}".to_string());
        }
        let mut parts = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if entry.operator != Operator::Eq {
                return Err(PredicateError::UnsupportedMode(entry.operator));
            }
            parts.push(format!(
                "{}: {}",
                escape_identifier(&entry.property),
                entry.rendered_operand()
            ));
        }
        Ok(format!("{{ {} }}", parts.join(", ")))
    }

    pub fn entries(&self) -> &[PredicateEntry] {
        &self.entries
    }

    pub fn params(&self) -> &WhereParams {
        &self.params
    }

    /// Parameter names this predicate bound in its table
    pub fn owned_parameters(&self) -> &[String] {
        &self.owned_parameters
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn compile_value(
    identifier: &str,
    property: &str,
    value: &WhereValue,
    table: &mut ParameterTable,
    entries: &mut Vec<PredicateEntry>,
    owned: &mut Vec<String>,
) -> Result<(), PredicateError> {
    let entry = |operator: Operator, operand: EntryOperand| PredicateEntry {
        identifier: identifier.to_string(),
        property: property.to_string(),
        operator,
        operand,
    };

    match value {
        WhereValue::Value(Value::Null) => entries.push(entry(Operator::Is, EntryOperand::None)),
        WhereValue::Value(v) => {
            let name = bind(identifier, property, v, table)?;
            owned.push(name.clone());
            entries.push(entry(Operator::Eq, EntryOperand::Parameter(name)));
        }
        WhereValue::Literal(expr) => {
            entries.push(entry(Operator::Eq, EntryOperand::Literal(expr.clone())))
        }
        WhereValue::Conditions(conditions) => {
            for condition in conditions {
                let (operator, operand) = condition.normalized();
                let operand = match operand {
                    _ if operator.is_unary() => EntryOperand::None,
                    None => EntryOperand::None,
                    Some(Operand::Literal(expr)) => EntryOperand::Literal(expr.clone()),
                    Some(Operand::Value(v)) => {
                        let name = bind(identifier, property, v, table)?;
                        owned.push(name.clone());
                        EntryOperand::Parameter(name)
                    }
                };
                entries.push(entry(operator, operand));
            }
        }
    }
    Ok(())
}

/// Bind `value` under a name derived from `property`; `NULL` is allowed.
pub(crate) fn bind(
    identifier: &str,
    property: &str,
    value: &Value,
    table: &mut ParameterTable,
) -> Result<String, PredicateError> {
    if !value.is_bindable() && !value.is_null() {
        return Err(PredicateError::UnsupportedValue {
            identifier: identifier.to_string(),
            property: property.to_string(),
            value_type: value.type_name(),
        });
    }
    Ok(table.unique_name_and_add(&parameter_suffix(property), value.clone())?)
}

#[cfg(test)]
mod tests;
