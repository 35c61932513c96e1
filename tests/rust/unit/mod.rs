//! Unit tests - public API behaviour of single components, no runner involved

mod parameter_table_tests;
mod predicate_json_tests;
mod statement_safety_tests;
