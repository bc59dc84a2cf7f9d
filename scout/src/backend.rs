//! Seam between the compilers and a concrete search engine.

use crate::aggregation::{AggregateMap, AggregationTree};
use crate::error::BoxError;
use crate::query::Query;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Field sort; documents missing the field sort last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOption {
    pub field: String,
    pub order: SortOrder,
}

impl SortOption {
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }
}

/// A document page request. Without `sort` the engine ranks by relevance.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: Query,
    pub from: usize,
    pub size: usize,
    pub sort: Option<SortOption>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    pub total: u64,
    pub documents: Vec<Value>,
}

/// A document-search engine able to run compiled queries.
///
/// Every method is one round-trip; errors are transport or protocol
/// failures and carry no index context, callers add it.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, index: &str, request: &SearchRequest) -> Result<SearchHits, BoxError>;

    /// Runs `{ size: 0, aggs }` and returns the decoded top-level nodes.
    async fn aggregate(&self, index: &str, aggs: &AggregationTree)
        -> Result<AggregateMap, BoxError>;

    /// `Ok(None)` when the document does not exist.
    async fn get_by_id(&self, index: &str, id: &str) -> Result<Option<Value>, BoxError>;
}
