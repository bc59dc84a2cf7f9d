use super::compiler::AggregationCompiler;
use super::response::{Aggregate, AggregateMap, BucketNode};
use super::result::{AggregationResult, BucketEntry, QueryResult};
use super::spec::{AggregationBatch, AggregationQuery, BucketSpec, MetricSpec};
use crate::backend::SearchBackend;
use crate::error::{Error, Result};
use crate::field::FieldName;
use crate::registry::{QueryBuilderRegistry, RangeBuilderRegistry};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Runs an aggregation batch in a single backend round-trip.
#[derive(Clone)]
pub struct AggregationExecutor {
    backend: Arc<dyn SearchBackend>,
}

impl AggregationExecutor {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Compiler errors are returned as-is; transport failures are wrapped in
    /// [`Error::AggregationExecution`] with the index name.
    pub async fn execute<F: FieldName>(
        &self,
        index: &str,
        batch: &AggregationBatch<F>,
        queries: &QueryBuilderRegistry<F>,
        ranges: &RangeBuilderRegistry<F>,
    ) -> Result<AggregationResult> {
        let tree = AggregationCompiler::compile(batch, queries, ranges)?;

        tracing::info!(index, queries = batch.len(), "Executing aggregation batch");
        tracing::debug!(?tree, "Compiled aggregation tree");
        metrics::counter!("scout_aggregation_requests_total", "index" => index.to_string())
            .increment(1);

        let start = Instant::now();
        let response = self.backend.aggregate(index, &tree).await.map_err(|source| {
            tracing::error!(index, error = %source, "Aggregation request failed");
            metrics::counter!("scout_aggregation_failures_total", "index" => index.to_string())
                .increment(1);
            Error::AggregationExecution {
                index: index.to_string(),
                source,
            }
        })?;
        metrics::histogram!("scout_aggregation_duration_seconds", "index" => index.to_string())
            .record(start.elapsed().as_secs_f64());

        Ok(decode(batch, &response))
    }
}

/// Rebuilds per-query results from the top-level response nodes.
///
/// Missing query nodes and missing sub-metrics are skipped, never errors.
pub fn decode<F: FieldName>(batch: &AggregationBatch<F>, response: &AggregateMap) -> AggregationResult {
    let mut results = BTreeMap::new();

    for query in batch.queries() {
        let Some(node) = response.get(query.name()) else {
            tracing::warn!(query = query.name(), "No aggregation result in response");
            continue;
        };
        tracing::debug!(query = query.name(), kind = node.kind(), "Decoding aggregation");

        if let Some(result) = decode_query(query, node) {
            results.insert(query.name().to_string(), result);
        }
    }

    AggregationResult { results }
}

fn decode_query<F: FieldName>(query: &AggregationQuery<F>, node: &Aggregate) -> Option<QueryResult> {
    match node {
        Aggregate::Filter(filter) => match query.bucket_spec() {
            Some(bucket) => match filter.aggregations.get(bucket.name()) {
                Some(inner) => Some(bucket_result(inner, bucket, Some(filter.doc_count))),
                None => {
                    tracing::warn!(
                        query = query.name(),
                        bucket = bucket.name(),
                        "Filter result has no bucket aggregation"
                    );
                    None
                }
            },
            None => Some(QueryResult::Metrics {
                values: collect_metrics(&filter.aggregations, query.metric_specs()),
            }),
        },
        Aggregate::Global(global) => Some(QueryResult::Metrics {
            values: collect_metrics(&global.aggregations, query.metric_specs()),
        }),
        other => match query.bucket_spec() {
            Some(bucket) => Some(bucket_result(other, bucket, None)),
            None => {
                tracing::warn!(
                    query = query.name(),
                    kind = other.kind(),
                    "Metric query answered without a container node"
                );
                Some(QueryResult::Metrics {
                    values: BTreeMap::new(),
                })
            }
        },
    }
}

fn bucket_result<F: FieldName>(
    node: &Aggregate,
    bucket: &BucketSpec<F>,
    filter_doc_count: Option<u64>,
) -> QueryResult {
    let entries = match node {
        Aggregate::Terms(multi) | Aggregate::DateHistogram(multi) => multi
            .buckets
            .iter()
            .map(|b| bucket_entry(b, bucket.metrics()))
            .collect(),
        other => {
            tracing::warn!(
                bucket = bucket.name(),
                kind = other.kind(),
                "Unexpected node where buckets were expected"
            );
            Vec::new()
        }
    };
    QueryResult::Bucket {
        entries,
        filter_doc_count,
    }
}

fn bucket_entry<F: FieldName>(node: &BucketNode, metrics: &[MetricSpec<F>]) -> BucketEntry {
    BucketEntry {
        key: node.key.clone(),
        doc_count: node.doc_count,
        metrics: collect_metrics(&node.aggregations, metrics),
    }
}

fn collect_metrics<F: FieldName>(
    aggregations: &AggregateMap,
    specs: &[MetricSpec<F>],
) -> BTreeMap<String, f64> {
    specs
        .iter()
        .filter_map(|spec| {
            aggregations
                .get(spec.name())
                .map(|agg| (spec.name().to_string(), metric_value(agg)))
        })
        .collect()
}

/// Null metric values read as 0.0; non-metric kinds warn and read as 0.0.
fn metric_value(agg: &Aggregate) -> f64 {
    match agg {
        Aggregate::Metric { value, .. } => value.unwrap_or(0.0),
        other => {
            tracing::warn!(kind = other.kind(), "Unknown metric kind");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{MetricType, MultiBucket, SingleBucket};

    crate::index_fields! {
        enum Field {
            Company => "company",
            ViewCount => "view_count",
        }
    }

    fn count_bucket_query(name: &str) -> AggregationQuery<Field> {
        AggregationQuery::bucket(
            name,
            vec![],
            BucketSpec::terms(Field::Company, format!("{name}_bucket"), 10)
                .with_metric(MetricSpec::count("count"))
                .with_metric(MetricSpec::avg(Field::ViewCount, "avg_views")),
        )
        .unwrap()
    }

    fn terms(buckets: Vec<BucketNode>) -> Aggregate {
        Aggregate::Terms(MultiBucket { buckets })
    }

    fn bucket(key: &str, doc_count: u64, aggs: Vec<(&str, Aggregate)>) -> BucketNode {
        BucketNode {
            key: key.into(),
            doc_count,
            aggregations: aggs.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }

    #[test]
    fn test_metric_value_dispatch() {
        assert_eq!(metric_value(&Aggregate::metric(MetricType::Sum, Some(4.5))), 4.5);
        assert_eq!(metric_value(&Aggregate::metric(MetricType::Avg, None)), 0.0);
        assert_eq!(metric_value(&Aggregate::Unknown("percentiles".into())), 0.0);
    }

    #[test]
    fn test_bare_bucket_omits_missing_sub_metrics() {
        let batch = AggregationBatch::new(vec![count_bucket_query("by_company")]).unwrap();
        let mut response = AggregateMap::new();
        response.insert(
            "by_company".into(),
            terms(vec![bucket(
                "META",
                3,
                vec![("count", Aggregate::metric(MetricType::ValueCount, Some(3.0)))],
            )]),
        );

        let result = decode(&batch, &response);
        match result.get("by_company").unwrap() {
            QueryResult::Bucket {
                entries,
                filter_doc_count,
            } => {
                assert_eq!(*filter_doc_count, None);
                assert_eq!(entries[0].metrics.get("count"), Some(&3.0));
                assert!(!entries[0].metrics.contains_key("avg_views"));
            }
            other => panic!("Expected bucket result, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_without_bucket_child_is_skipped() {
        let batch = AggregationBatch::new(vec![count_bucket_query("q")]).unwrap();
        let mut response = AggregateMap::new();
        response.insert(
            "q".into(),
            Aggregate::Filter(SingleBucket {
                doc_count: 5,
                aggregations: AggregateMap::new(),
            }),
        );
        assert!(decode(&batch, &response).is_empty());
    }

    #[test]
    fn test_unexpected_bucket_kind_yields_no_entries() {
        let batch = AggregationBatch::new(vec![count_bucket_query("q")]).unwrap();
        let mut response = AggregateMap::new();
        response.insert("q".into(), Aggregate::Unknown("geohash_grid".into()));

        assert!(decode(&batch, &response).entries("q").is_empty());
        assert!(decode(&batch, &response).get("q").is_some());
    }
}
