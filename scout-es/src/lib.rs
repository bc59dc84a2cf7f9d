//! Elasticsearch backend for Scout
//!
//! Renders compiled [`scout::Query`] trees and aggregation trees as
//! Elasticsearch Query DSL, and decodes search and aggregation responses
//! back into Scout's engine-agnostic types.
//!
//! # Endpoints used
//!
//! - `POST /{index}/_search?typed_keys=true` - document pages and aggregations
//! - `GET /{index}/_doc/{id}` - single document lookup
//!
//! # Supported DSL
//!
//! Queries: `match_all`, `term`, `match`, `range`, `bool`
//!
//! Aggregations: `filter`, `global`, `terms`, `date_histogram`,
//! `avg` / `sum` / `min` / `max` / `value_count` / `cardinality`

pub mod client;
pub mod dsl;
pub mod error;
pub mod response;

pub use client::ElasticsearchClient;
pub use error::EsError;

/// Result type for Elasticsearch operations
pub type Result<T> = std::result::Result<T, EsError>;
