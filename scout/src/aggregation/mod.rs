//! Named, independently filtered aggregations run in one request.
//!
//! A batch of [`AggregationQuery`] values is compiled into one aggregation
//! tree ([`AggregationCompiler`]), sent to the backend, and the response is
//! decoded back into an [`AggregationResult`] keyed by query name
//! ([`AggregationExecutor`]).

mod compiler;
mod executor;
mod request;
mod response;
mod result;
mod spec;

pub use compiler::{AggregationCompiler, AggregationNode, AggregationTree, IDENTITY_FIELD};
pub use executor::{decode, AggregationExecutor};
pub use request::BucketRequest;
pub use response::{Aggregate, AggregateMap, BucketNode, MultiBucket, SingleBucket};
pub use result::{AggregationResult, BucketEntry, QueryResult};
pub use spec::{
    AggregationBatch, AggregationQuery, BucketKind, BucketSpec, BucketType, MetricSpec,
    MetricType, DEFAULT_CALENDAR_INTERVAL, DEFAULT_TERMS_SIZE,
};
