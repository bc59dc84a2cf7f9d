//! Scout - typed search and aggregation compiler
//!
//! Turns declarative, field-typed filter conditions into compiled boolean
//! queries, and batches of named aggregations into a single search-engine
//! request whose response is decoded back into per-query results.
//!
//! # Building blocks
//!
//! - [`FieldName`] / [`index_fields!`] - closed per-schema field sets
//! - [`Condition`] / [`QueryWindow`] - filter expressions and paging
//! - [`QueryBuilderRegistry`] / [`RangeBuilderRegistry`] - per-field strategies
//! - [`QueryCompiler`] - conditions → [`Query`]
//! - [`aggregation`] - aggregation specs, compiler and executor
//! - [`SearchBackend`] - the engine seam (see the `scout-es` crate)
//! - [`DocumentSearch`] - per-index facade used by applications

pub mod aggregation;
pub mod backend;
pub mod builder;
pub mod compiler;
pub mod condition;
pub mod config;
pub mod error;
pub mod field;
pub mod query;
pub mod registry;
pub mod schema;
pub mod search;
pub mod stats;

pub use backend::{SearchBackend, SearchHits, SearchRequest, SortOption, SortOrder};
pub use builder::{BoolRole, FieldQueryBuilder, RangeQueryBuilder};
pub use compiler::{BoolComposer, QueryCompiler};
pub use condition::{Condition, Page, QueryWindow};
pub use error::{BoxError, Error, Result};
pub use field::FieldName;
pub use query::{BoolQuery, Query};
pub use registry::{FieldRegistries, QueryBuilderRegistry, RangeBuilderRegistry};
pub use search::DocumentSearch;
