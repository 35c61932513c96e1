//! Comparison operators and the values they compare against

use super::PredicateError;
use crate::value::{Point, Value};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator of a single predicate entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "eq")]
    Eq,
    #[serde(rename = "ne")]
    Ne,
    #[serde(rename = "in")]
    In,
    /// `$param IN identifier.property`
    #[serde(rename = "_in")]
    ReverseIn,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "gt")]
    Gt,
    #[serde(rename = "gte")]
    Gte,
    #[serde(rename = "lt")]
    Lt,
    #[serde(rename = "lte")]
    Lte,
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "isNot")]
    IsNot,
}

impl Operator {
    pub const ALL: [Operator; 11] = [
        Operator::Eq,
        Operator::Ne,
        Operator::In,
        Operator::ReverseIn,
        Operator::Contains,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Is,
        Operator::IsNot,
    ];

    /// Keyword emitted in text mode
    pub fn keyword(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::In | Operator::ReverseIn => "IN",
            Operator::Contains => "CONTAINS",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Is => "IS NULL",
            Operator::IsNot => "IS NOT NULL",
        }
    }

    /// `is`/`isNot` take no operand and never bind a parameter.
    pub fn is_unary(self) -> bool {
        matches!(self, Operator::Is | Operator::IsNot)
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::In => "in",
            Operator::ReverseIn => "_in",
            Operator::Contains => "contains",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Is => "is",
            Operator::IsNot => "isNot",
        }
    }

    pub fn from_name(name: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Bound as a parameter
    Value(Value),
    /// Emitted verbatim, e.g. `other.price`. Caller-trusted.
    Literal(String),
}

impl Operand {
    pub fn literal(expression: impl Into<String>) -> Self {
        Operand::Literal(expression.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Operand::Value(Value::Null))
    }
}

/// A comparison against one property. `Is`/`IsNot` carry no payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Operand),
    Ne(Operand),
    In(Operand),
    ReverseIn(Operand),
    Contains(Operand),
    Gt(Operand),
    Gte(Operand),
    Lt(Operand),
    Lte(Operand),
    Is,
    IsNot,
}

impl Condition {
    /// Build from an operator and payload; the payload of `is`/`isNot` is ignored.
    pub fn from_parts(operator: Operator, operand: Operand) -> Self {
        match operator {
            Operator::Eq => Condition::Eq(operand),
            Operator::Ne => Condition::Ne(operand),
            Operator::In => Condition::In(operand),
            Operator::ReverseIn => Condition::ReverseIn(operand),
            Operator::Contains => Condition::Contains(operand),
            Operator::Gt => Condition::Gt(operand),
            Operator::Gte => Condition::Gte(operand),
            Operator::Lt => Condition::Lt(operand),
            Operator::Lte => Condition::Lte(operand),
            Operator::Is => Condition::Is,
            Operator::IsNot => Condition::IsNot,
        }
    }

    pub fn operator(&self) -> Operator {
        match self {
            Condition::Eq(_) => Operator::Eq,
            Condition::Ne(_) => Operator::Ne,
            Condition::In(_) => Operator::In,
            Condition::ReverseIn(_) => Operator::ReverseIn,
            Condition::Contains(_) => Operator::Contains,
            Condition::Gt(_) => Operator::Gt,
            Condition::Gte(_) => Operator::Gte,
            Condition::Lt(_) => Operator::Lt,
            Condition::Lte(_) => Operator::Lte,
            Condition::Is => Operator::Is,
            Condition::IsNot => Operator::IsNot,
        }
    }

    pub fn operand(&self) -> Option<&Operand> {
        match self {
            Condition::Eq(o)
            | Condition::Ne(o)
            | Condition::In(o)
            | Condition::ReverseIn(o)
            | Condition::Contains(o)
            | Condition::Gt(o)
            | Condition::Gte(o)
            | Condition::Lt(o)
            | Condition::Lte(o) => Some(o),
            Condition::Is | Condition::IsNot => None,
        }
    }

    /// Operator and operand after null normalization:
    /// `eq null` becomes `is`, `ne null` becomes `isNot`.
    pub fn normalized(&self) -> (Operator, Option<&Operand>) {
        match self {
            Condition::Eq(o) if o.is_null() => (Operator::Is, None),
            Condition::Ne(o) if o.is_null() => (Operator::IsNot, None),
            other => (other.operator(), other.operand()),
        }
    }

    /// Plain equality against a non-null operand.
    pub fn is_equality(&self) -> bool {
        self.normalized().0 == Operator::Eq
    }
}

/// What a single property is filtered by.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereValue {
    /// Implicit `eq`; `NULL` becomes `IS NULL`
    Value(Value),
    /// Implicit `eq` against a verbatim expression
    Literal(String),
    /// Explicit operators, rendered in insertion order
    Conditions(Vec<Condition>),
}

impl WhereValue {
    pub fn literal(expression: impl Into<String>) -> Self {
        WhereValue::Literal(expression.into())
    }

    pub fn conditions(conditions: impl IntoIterator<Item = Condition>) -> Self {
        WhereValue::Conditions(conditions.into_iter().collect())
    }
}

impl From<Condition> for WhereValue {
    fn from(condition: Condition) -> Self {
        WhereValue::Conditions(vec![condition])
    }
}

impl<T: Into<Value>> From<Vec<T>> for WhereValue {
    fn from(items: Vec<T>) -> Self {
        WhereValue::Value(Value::from(items))
    }
}

impl<T: Into<Value>> From<Option<T>> for WhereValue {
    fn from(opt: Option<T>) -> Self {
        WhereValue::Value(Value::from(opt))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(items: Vec<T>) -> Self {
        Operand::Value(Value::from(items))
    }
}

macro_rules! impl_from_value {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for WhereValue {
                fn from(v: $source) -> Self {
                    WhereValue::Value(Value::from(v))
                }
            }

            impl From<$source> for Operand {
                fn from(v: $source) -> Self {
                    Operand::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_from_value!(
    bool,
    i64,
    i32,
    u32,
    f64,
    &str,
    String,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    DateTime<FixedOffset>,
    Point,
);

impl From<Value> for WhereValue {
    fn from(v: Value) -> Self {
        WhereValue::Value(v)
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

/// JSON key marking a verbatim expression: `{"literal": "m.price"}`
const LITERAL_KEY: &str = "literal";

fn literal_from_json(map: &serde_json::Map<String, serde_json::Value>) -> Option<String> {
    match (map.len(), map.get(LITERAL_KEY)) {
        (1, Some(serde_json::Value::String(expr))) => Some(expr.clone()),
        _ => None,
    }
}

fn operand_from_json(json: serde_json::Value) -> Operand {
    match json {
        serde_json::Value::Object(map) => match literal_from_json(&map) {
            Some(expr) => Operand::Literal(expr),
            None => Operand::Value(Value::from(serde_json::Value::Object(map))),
        },
        other => Operand::Value(Value::from(other)),
    }
}

impl From<serde_json::Value> for Operand {
    fn from(json: serde_json::Value) -> Self {
        operand_from_json(json)
    }
}

/// Plain JSON values are implicit equality; objects are either
/// `{"literal": "..."}` or a map of operator name to payload, e.g. `{"gte": 18}`.
impl TryFrom<serde_json::Value> for WhereValue {
    type Error = PredicateError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        let map = match json {
            serde_json::Value::Object(map) => map,
            other => return Ok(WhereValue::Value(Value::from(other))),
        };
        if let Some(expr) = literal_from_json(&map) {
            return Ok(WhereValue::Literal(expr));
        }

        let mut conditions = Vec::with_capacity(map.len());
        for (name, payload) in map {
            let operator = Operator::from_name(&name)
                .ok_or_else(|| PredicateError::UnknownOperator(name.clone()))?;
            conditions.push(Condition::from_parts(operator, operand_from_json(payload)));
        }
        Ok(WhereValue::Conditions(conditions))
    }
}
