//! Decoded aggregation response nodes, as reported by a backend.

use super::spec::MetricType;
use std::collections::BTreeMap;

pub type AggregateMap = BTreeMap<String, Aggregate>;

/// One aggregation node from a response, tagged by the kind the backend
/// reported for it.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate {
    Filter(SingleBucket),
    Global(SingleBucket),
    Terms(MultiBucket),
    DateHistogram(MultiBucket),
    /// Single-value metric. `value` is `None` when the metric had no input
    /// (e.g. an average over zero documents).
    Metric {
        kind: MetricType,
        value: Option<f64>,
    },
    /// Any kind this crate does not model.
    Unknown(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SingleBucket {
    pub doc_count: u64,
    pub aggregations: AggregateMap,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiBucket {
    pub buckets: Vec<BucketNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BucketNode {
    /// Terms label, or the formatted timestamp of a date histogram bucket.
    pub key: String,
    pub doc_count: u64,
    pub aggregations: AggregateMap,
}

impl Aggregate {
    /// Kind label used in log lines.
    pub fn kind(&self) -> &str {
        match self {
            Aggregate::Filter(_) => "filter",
            Aggregate::Global(_) => "global",
            Aggregate::Terms(_) => "terms",
            Aggregate::DateHistogram(_) => "date_histogram",
            Aggregate::Metric { kind, .. } => kind.as_str(),
            Aggregate::Unknown(kind) => kind,
        }
    }

    pub fn metric(kind: MetricType, value: Option<f64>) -> Self {
        Aggregate::Metric { kind, value }
    }
}
