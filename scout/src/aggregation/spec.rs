use crate::condition::Condition;
use crate::error::{Error, Result};
use crate::field::FieldName;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Default number of terms buckets when none is given.
pub const DEFAULT_TERMS_SIZE: u32 = 10;

/// Default calendar interval for date histograms.
pub const DEFAULT_CALENDAR_INTERVAL: &str = "1d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Avg,
    Sum,
    Min,
    Max,
    ValueCount,
    Cardinality,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Avg => "avg",
            MetricType::Sum => "sum",
            MetricType::Min => "min",
            MetricType::Max => "max",
            MetricType::ValueCount => "value_count",
            MetricType::Cardinality => "cardinality",
        }
    }

    pub fn requires_field(&self) -> bool {
        !matches!(self, MetricType::ValueCount)
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketType {
    Terms,
    DateHistogram,
}

impl FromStr for BucketType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "terms" => Ok(BucketType::Terms),
            "date_histogram" => Ok(BucketType::DateHistogram),
            other => Err(Error::UnsupportedBucketType(other.to_string())),
        }
    }
}

/// A single metric computed over a document set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec<F> {
    field: Option<F>,
    kind: MetricType,
    name: String,
}

impl<F: FieldName> MetricSpec<F> {
    /// Every metric except `ValueCount` needs a field.
    pub fn new(kind: MetricType, field: Option<F>, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if kind.requires_field() && field.is_none() {
            return Err(Error::MissingMetricField {
                metric: name,
                kind: kind.as_str(),
            });
        }
        Ok(Self { field, kind, name })
    }

    /// Document count.
    pub fn count(name: impl Into<String>) -> Self {
        Self {
            field: None,
            kind: MetricType::ValueCount,
            name: name.into(),
        }
    }

    pub fn avg(field: F, name: impl Into<String>) -> Self {
        Self::with_field(MetricType::Avg, field, name)
    }

    pub fn sum(field: F, name: impl Into<String>) -> Self {
        Self::with_field(MetricType::Sum, field, name)
    }

    pub fn min(field: F, name: impl Into<String>) -> Self {
        Self::with_field(MetricType::Min, field, name)
    }

    pub fn max(field: F, name: impl Into<String>) -> Self {
        Self::with_field(MetricType::Max, field, name)
    }

    pub fn cardinality(field: F, name: impl Into<String>) -> Self {
        Self::with_field(MetricType::Cardinality, field, name)
    }

    fn with_field(kind: MetricType, field: F, name: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            kind,
            name: name.into(),
        }
    }

    pub fn field(&self) -> Option<F> {
        self.field
    }

    pub fn kind(&self) -> MetricType {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketKind {
    Terms { size: u32 },
    DateHistogram { calendar_interval: String },
}

impl BucketKind {
    pub fn bucket_type(&self) -> BucketType {
        match self {
            BucketKind::Terms { .. } => BucketType::Terms,
            BucketKind::DateHistogram { .. } => BucketType::DateHistogram,
        }
    }
}

/// Grouping of documents with per-bucket sub-metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSpec<F> {
    field: F,
    kind: BucketKind,
    name: String,
    metrics: Vec<MetricSpec<F>>,
}

impl<F: FieldName> BucketSpec<F> {
    /// Size applies to terms buckets, interval to date histograms; missing
    /// values fall back to [`DEFAULT_TERMS_SIZE`] and
    /// [`DEFAULT_CALENDAR_INTERVAL`].
    pub fn new(
        field: F,
        bucket_type: BucketType,
        name: impl Into<String>,
        size: Option<u32>,
        interval: Option<String>,
        metrics: Vec<MetricSpec<F>>,
    ) -> Self {
        let kind = match bucket_type {
            BucketType::Terms => BucketKind::Terms {
                size: size.unwrap_or(DEFAULT_TERMS_SIZE),
            },
            BucketType::DateHistogram => BucketKind::DateHistogram {
                calendar_interval: interval
                    .unwrap_or_else(|| DEFAULT_CALENDAR_INTERVAL.to_string()),
            },
        };
        Self {
            field,
            kind,
            name: name.into(),
            metrics,
        }
    }

    pub fn terms(field: F, name: impl Into<String>, size: u32) -> Self {
        Self {
            field,
            kind: BucketKind::Terms { size },
            name: name.into(),
            metrics: Vec::new(),
        }
    }

    pub fn date_histogram(field: F, name: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            field,
            kind: BucketKind::DateHistogram {
                calendar_interval: interval.into(),
            },
            name: name.into(),
            metrics: Vec::new(),
        }
    }

    pub fn with_metric(mut self, metric: MetricSpec<F>) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn field(&self) -> F {
        self.field
    }

    pub fn kind(&self) -> &BucketKind {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> &[MetricSpec<F>] {
        &self.metrics
    }
}

/// A named aggregation with its own filter conditions.
///
/// When a bucket is present it is what gets computed; top-level metrics are
/// only used for metric-only queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationQuery<F> {
    name: String,
    conditions: Vec<Condition<F>>,
    bucket: Option<BucketSpec<F>>,
    metrics: Vec<MetricSpec<F>>,
}

impl<F: FieldName> AggregationQuery<F> {
    pub fn new(
        name: impl Into<String>,
        conditions: Vec<Condition<F>>,
        bucket: Option<BucketSpec<F>>,
        metrics: Vec<MetricSpec<F>>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::BlankQueryName);
        }
        if bucket.is_none() && metrics.is_empty() {
            return Err(Error::EmptyAggregation(name));
        }
        Ok(Self {
            name,
            conditions,
            bucket,
            metrics,
        })
    }

    pub fn bucket(
        name: impl Into<String>,
        conditions: Vec<Condition<F>>,
        bucket: BucketSpec<F>,
    ) -> Result<Self> {
        Self::new(name, conditions, Some(bucket), Vec::new())
    }

    pub fn metrics(
        name: impl Into<String>,
        conditions: Vec<Condition<F>>,
        metrics: Vec<MetricSpec<F>>,
    ) -> Result<Self> {
        Self::new(name, conditions, None, metrics)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn conditions(&self) -> &[Condition<F>] {
        &self.conditions
    }

    pub fn bucket_spec(&self) -> Option<&BucketSpec<F>> {
        self.bucket.as_ref()
    }

    pub fn metric_specs(&self) -> &[MetricSpec<F>] {
        &self.metrics
    }
}

/// Non-empty, ordered set of aggregation queries sent in one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationBatch<F> {
    queries: Vec<AggregationQuery<F>>,
}

impl<F: FieldName> AggregationBatch<F> {
    /// Query names become response keys, so they must be unique.
    pub fn new(queries: Vec<AggregationQuery<F>>) -> Result<Self> {
        if queries.is_empty() {
            return Err(Error::EmptyBatch);
        }
        let mut seen = HashSet::new();
        for query in &queries {
            if !seen.insert(query.name()) {
                return Err(Error::DuplicateQueryName(query.name().to_string()));
            }
        }
        Ok(Self { queries })
    }

    pub fn queries(&self) -> &[AggregationQuery<F>] {
        &self.queries
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}
