//! cypherweave - parameterized Cypher statement compiler
//!
//! This crate turns structured query intent into Cypher text plus bind
//! parameters:
//! - Collision-free parameter tables
//! - Predicate compilation to `WHERE` text or inline bracket maps
//! - Node/relationship pattern rendering and clause composition
//! - Eager-load synthesis of nested relationships and hydration of the rows

pub mod config;
pub mod eager_load;
pub mod errors;
pub mod parameters;
pub mod pattern;
pub mod predicate;
pub mod query_builder;
pub mod runner;
pub mod utils;
pub mod value;

pub use errors::CypherWeaveError;
pub use query_builder::{QueryBuilder, Statement};
