use thiserror::Error;

/// Transport-level failure reported by a search backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unsupported bucket type: {0}")]
    UnsupportedBucketType(String),

    #[error("Metric '{metric}' of type {kind} requires a field")]
    MissingMetricField { metric: String, kind: &'static str },

    #[error("Invalid query window: to ({to}) is before from ({from})")]
    InvalidWindow { from: i64, to: i64 },

    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    #[error("Aggregation query name must not be blank")]
    BlankQueryName,

    #[error("Aggregation query '{0}' has neither a bucket nor metrics")]
    EmptyAggregation(String),

    #[error("Aggregation batch must contain at least one query")]
    EmptyBatch,

    #[error("Duplicate aggregation query name: {0}")]
    DuplicateQueryName(String),

    #[error("Aggregation failed on index '{index}': {source}")]
    AggregationExecution {
        index: String,
        #[source]
        source: BoxError,
    },

    #[error("Search failed on index '{index}': {source}")]
    Search {
        index: String,
        #[source]
        source: BoxError,
    },

    #[error("Document '{id}' not found in index '{index}'")]
    DocumentNotFound { index: String, id: String },
}

pub type Result<T> = std::result::Result<T, Error>;
