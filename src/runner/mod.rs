//! Execution collaborator
//!
//! Statements are executed by whatever driver the caller injects. Nothing in
//! this crate holds a global connection.

use crate::query_builder::Statement;
use crate::value::Value;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// One result row keyed by column name
pub type Row = HashMap<String, Value>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RunnerError {
    #[error("Query execution failed: {0}")]
    Execution(String),

    #[error("Database unavailable: {0}")]
    Unavailable(String),
}

/// Where a statement runs; all fields are passed through to the driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    pub database: Option<String>,
    /// Driver-specific handle of an open transaction
    pub transaction: Option<String>,
}

impl RunOptions {
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn transaction(mut self, transaction: impl Into<String>) -> Self {
        self.transaction = Some(transaction.into());
        self
    }
}

#[async_trait]
pub trait QueryRunner: Send + Sync {
    async fn run(&self, statement: &Statement, options: &RunOptions)
        -> Result<Vec<Row>, RunnerError>;
}
