use super::spec::{AggregationBatch, AggregationQuery, BucketKind, BucketSpec, MetricSpec, MetricType};
use crate::compiler::QueryCompiler;
use crate::error::Result;
use crate::field::FieldName;
use crate::query::Query;
use crate::registry::{QueryBuilderRegistry, RangeBuilderRegistry};
use std::collections::BTreeMap;

/// Backend identity field used to count every document in scope.
pub const IDENTITY_FIELD: &str = "_index";

pub type AggregationTree = BTreeMap<String, AggregationNode>;

/// Compiled aggregation tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationNode {
    /// Restricts nested aggregations to documents matching `query`.
    Filter {
        query: Query,
        aggs: AggregationTree,
    },
    /// Runs nested aggregations over the whole index, ignoring any query.
    Global { aggs: AggregationTree },
    Terms {
        field: String,
        size: u32,
        aggs: AggregationTree,
    },
    DateHistogram {
        field: String,
        calendar_interval: String,
        aggs: AggregationTree,
    },
    Metric { kind: MetricType, field: String },
}

impl AggregationNode {
    pub fn children(&self) -> Option<&AggregationTree> {
        match self {
            AggregationNode::Filter { aggs, .. }
            | AggregationNode::Global { aggs }
            | AggregationNode::Terms { aggs, .. }
            | AggregationNode::DateHistogram { aggs, .. } => Some(aggs),
            AggregationNode::Metric { .. } => None,
        }
    }
}

pub struct AggregationCompiler;

impl AggregationCompiler {
    /// Expands every query of the batch into its own top-level node.
    ///
    /// - conditions present: a filter node holding the bucket (keyed by the
    ///   bucket's name) or the metrics
    /// - no conditions, bucket: the bare bucket, keyed by the query name
    /// - no conditions, metrics only: a global node holding the metrics
    pub fn compile<F: FieldName>(
        batch: &AggregationBatch<F>,
        queries: &QueryBuilderRegistry<F>,
        ranges: &RangeBuilderRegistry<F>,
    ) -> Result<AggregationTree> {
        let mut tree = AggregationTree::new();
        for query in batch.queries() {
            let node = Self::compile_query(query, queries, ranges)?;
            tree.insert(query.name().to_string(), node);
        }
        Ok(tree)
    }

    fn compile_query<F: FieldName>(
        query: &AggregationQuery<F>,
        queries: &QueryBuilderRegistry<F>,
        ranges: &RangeBuilderRegistry<F>,
    ) -> Result<AggregationNode> {
        if !query.conditions().is_empty() {
            let filter = QueryCompiler::compile(query.conditions(), queries, ranges)?;
            let aggs = match query.bucket_spec() {
                Some(bucket) => {
                    let mut aggs = AggregationTree::new();
                    aggs.insert(bucket.name().to_string(), Self::bucket_node(bucket));
                    aggs
                }
                None => Self::metric_nodes(query.metric_specs()),
            };
            return Ok(AggregationNode::Filter {
                query: filter,
                aggs,
            });
        }

        Ok(match query.bucket_spec() {
            Some(bucket) => Self::bucket_node(bucket),
            None => AggregationNode::Global {
                aggs: Self::metric_nodes(query.metric_specs()),
            },
        })
    }

    fn bucket_node<F: FieldName>(bucket: &BucketSpec<F>) -> AggregationNode {
        let field = bucket.field().field_name().to_string();
        let aggs = Self::metric_nodes(bucket.metrics());
        match bucket.kind() {
            BucketKind::Terms { size } => AggregationNode::Terms {
                field,
                size: *size,
                aggs,
            },
            BucketKind::DateHistogram { calendar_interval } => AggregationNode::DateHistogram {
                field,
                calendar_interval: calendar_interval.clone(),
                aggs,
            },
        }
    }

    fn metric_nodes<F: FieldName>(metrics: &[MetricSpec<F>]) -> AggregationTree {
        metrics
            .iter()
            .map(|m| (m.name().to_string(), Self::metric_node(m)))
            .collect()
    }

    fn metric_node<F: FieldName>(metric: &MetricSpec<F>) -> AggregationNode {
        let field = match (metric.kind(), metric.field()) {
            (MetricType::ValueCount, _) | (_, None) => IDENTITY_FIELD.to_string(),
            (_, Some(field)) => field.field_name().to_string(),
        };
        AggregationNode::Metric {
            kind: metric.kind(),
            field,
        }
    }
}
