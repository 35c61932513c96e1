//! Eager loading of nested relationships
//!
//! [`synthesize`] compiles an [`EagerLoadRequest`] into a single statement that
//! returns the root plus one collected column per top-level alias;
//! [`EagerLoadResult::hydrate`] inverts the rows into [`HydratedEntity`] trees
//! without issuing further queries.

mod errors;
pub mod hydration;
pub mod load_tree;
pub mod synthesis;

pub use errors::EagerLoadError;
pub use hydration::{hydrate_row, hydrate_rows, HydratedEntity, RelatedEntity};
pub use load_tree::{
    LoadOrder, LoadTarget, LoadWhere, RelationshipLoadConfig, RelationshipLoadNode,
    RelationshipTree,
};
pub use synthesis::{synthesize, EagerLoadRequest, EagerLoadResult, DEFAULT_ROOT_IDENTIFIER};
