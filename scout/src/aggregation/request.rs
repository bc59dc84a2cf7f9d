use super::spec::{AggregationQuery, BucketSpec, BucketType, MetricSpec};
use crate::condition::Condition;
use crate::error::Result;
use crate::field::FieldName;

/// Shorthand for the common "filter, then bucket on one field" request.
///
/// The generated bucket is named `{query_name}_bucket`.
#[derive(Debug, Clone)]
pub struct BucketRequest<F> {
    pub query_name: String,
    pub conditions: Vec<Condition<F>>,
    pub bucket_field: F,
    pub bucket_type: BucketType,
    pub size: Option<u32>,
    pub interval: Option<String>,
    pub metrics: Vec<MetricSpec<F>>,
}

impl<F: FieldName> BucketRequest<F> {
    pub fn terms(
        query_name: impl Into<String>,
        conditions: Vec<Condition<F>>,
        field: F,
        size: u32,
        metrics: Vec<MetricSpec<F>>,
    ) -> Self {
        Self {
            query_name: query_name.into(),
            conditions,
            bucket_field: field,
            bucket_type: BucketType::Terms,
            size: Some(size),
            interval: None,
            metrics,
        }
    }

    pub fn date_histogram(
        query_name: impl Into<String>,
        conditions: Vec<Condition<F>>,
        field: F,
        interval: impl Into<String>,
        metrics: Vec<MetricSpec<F>>,
    ) -> Self {
        Self {
            query_name: query_name.into(),
            conditions,
            bucket_field: field,
            bucket_type: BucketType::DateHistogram,
            size: None,
            interval: Some(interval.into()),
            metrics,
        }
    }

    pub fn bucket_name(&self) -> String {
        format!("{}_bucket", self.query_name)
    }

    pub fn into_query(self) -> Result<AggregationQuery<F>> {
        let bucket = BucketSpec::new(
            self.bucket_field,
            self.bucket_type,
            self.bucket_name(),
            self.size,
            self.interval,
            self.metrics,
        );
        AggregationQuery::bucket(self.query_name, self.conditions, bucket)
    }
}
