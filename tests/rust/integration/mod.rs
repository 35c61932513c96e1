//! Integration tests - Full statement pipelines, with a mocked driver where execution is needed

mod eager_load_tests;
mod query_builder_tests;
