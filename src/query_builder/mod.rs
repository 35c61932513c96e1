//! Clause composer
//!
//! A [`QueryBuilder`] holds an ordered list of clause descriptors and one
//! [`ParameterTable`]. Each `add*` call lowers its clause immediately; a clause
//! that fails to lower leaves both the statement and the table untouched.

pub mod clause;
mod errors;
pub mod to_cypher;

pub use clause::{
    Clause, DeleteSpec, MatchSpec, OrderBySpec, OrderItem, Payload, ProjectionItem,
    ProjectionSpec, RemoveSpec, SetSpec, SortDirection, UnwindSpec,
};
pub use errors::QueryBuilderError;
pub use to_cypher::ToCypher;

use crate::parameters::ParameterTable;
use crate::pattern::Pattern;
use crate::predicate::WhereParams;
use serde::Serialize;
use to_cypher::join_fragments;

/// Final statement text plus its bound parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    #[serde(rename = "statement")]
    pub text: String,
    pub parameters: ParameterTable,
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    clauses: Vec<Clause>,
    fragments: Vec<String>,
    parameters: ParameterTable,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from bindings the caller already holds.
    pub fn with_parameters(parameters: ParameterTable) -> Self {
        QueryBuilder {
            parameters,
            ..Self::default()
        }
    }

    /// Build from descriptors, stopping at the first one that fails to lower.
    pub fn from_clauses(
        clauses: impl IntoIterator<Item = Clause>,
        parameters: ParameterTable,
    ) -> Result<Self, QueryBuilderError> {
        let mut builder = QueryBuilder::with_parameters(parameters);
        for clause in clauses {
            builder.add(clause)?;
        }
        Ok(builder)
    }

    pub fn add(&mut self, clause: Clause) -> Result<&mut Self, QueryBuilderError> {
        let snapshot = self.parameters.clone();
        match clause.to_cypher(&mut self.parameters) {
            Ok(fragment) => {
                log::debug!("Lowered {} clause: {}", clause.keyword(), fragment);
                self.fragments.push(fragment);
                self.clauses.push(clause);
                Ok(self)
            }
            Err(e) => {
                self.parameters = snapshot;
                Err(e)
            }
        }
    }

    pub fn match_(
        &mut self,
        payload: impl Into<Payload<MatchSpec>>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::Match(payload.into()))
    }

    pub fn optional_match(
        &mut self,
        pattern: impl Into<Pattern>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::Match(MatchSpec::optional(pattern).into()))
    }

    pub fn create(
        &mut self,
        payload: impl Into<Payload<Pattern>>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::Create(payload.into()))
    }

    pub fn merge(
        &mut self,
        payload: impl Into<Payload<Pattern>>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::Merge(payload.into()))
    }

    pub fn set(
        &mut self,
        payload: impl Into<Payload<SetSpec>>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::Set(payload.into()))
    }

    pub fn on_create_set(
        &mut self,
        payload: impl Into<Payload<SetSpec>>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::OnCreateSet(payload.into()))
    }

    pub fn on_match_set(
        &mut self,
        payload: impl Into<Payload<SetSpec>>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::OnMatchSet(payload.into()))
    }

    pub fn delete(
        &mut self,
        payload: impl Into<Payload<DeleteSpec>>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::Delete(payload.into()))
    }

    pub fn remove(
        &mut self,
        payload: impl Into<Payload<RemoveSpec>>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::Remove(payload.into()))
    }

    pub fn return_(
        &mut self,
        payload: impl Into<Payload<ProjectionSpec>>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::Return(payload.into()))
    }

    pub fn with(
        &mut self,
        payload: impl Into<Payload<ProjectionSpec>>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::With(payload.into()))
    }

    pub fn order_by(
        &mut self,
        payload: impl Into<Payload<OrderBySpec>>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::OrderBy(payload.into()))
    }

    pub fn unwind(
        &mut self,
        payload: impl Into<Payload<UnwindSpec>>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::Unwind(payload.into()))
    }

    pub fn for_each(&mut self, body: impl Into<String>) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::ForEach(body.into()))
    }

    pub fn where_(
        &mut self,
        payload: impl Into<Payload<WhereParams>>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::Where(payload.into()))
    }

    pub fn skip(&mut self, payload: impl Into<Payload<i64>>) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::Skip(payload.into()))
    }

    pub fn limit(&mut self, payload: impl Into<Payload<i64>>) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::Limit(payload.into()))
    }

    pub fn call(
        &mut self,
        payload: impl Into<Payload<Vec<Clause>>>,
    ) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::Call(payload.into()))
    }

    pub fn raw(&mut self, text: impl Into<String>) -> Result<&mut Self, QueryBuilderError> {
        self.add(Clause::Raw(text.into()))
    }

    /// Statement text so far
    pub fn text(&self) -> String {
        join_fragments(&self.fragments)
    }

    pub fn parameters(&self) -> &ParameterTable {
        &self.parameters
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn statement(&self) -> Statement {
        Statement {
            text: self.text(),
            parameters: self.parameters.clone(),
        }
    }

    pub fn build(self) -> Statement {
        Statement {
            text: join_fragments(&self.fragments),
            parameters: self.parameters,
        }
    }
}
