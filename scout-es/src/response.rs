//! Response decoding from Elasticsearch format
//!
//! Aggregation responses are requested with `typed_keys=true`, so every
//! aggregation key arrives as `kind#name` and can be decoded without knowing
//! the request that produced it.

use crate::error::EsError;
use crate::Result;
use chrono::{DateTime, SecondsFormat};
use scout::aggregation::{Aggregate, AggregateMap, BucketNode, MetricType, MultiBucket, SingleBucket};
use scout::SearchHits;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct EsSearchResponse {
    #[serde(default)]
    pub hits: Option<EsHits>,
    #[serde(default)]
    pub aggregations: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub struct EsHits {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub hits: Vec<EsHit>,
}

/// `hits.total` is an object since 7.0 and a bare number before.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Object { value: u64 },
    Count(u64),
}

#[derive(Debug, Deserialize)]
pub struct EsHit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct EsGetResponse {
    #[serde(default)]
    pub found: bool,
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Object { value } | TotalHits::Count(value) => *value,
        }
    }
}

impl From<EsHits> for SearchHits {
    /// Hits without `_source` come through as JSON null.
    fn from(hits: EsHits) -> Self {
        let total = hits
            .total
            .as_ref()
            .map(TotalHits::value)
            .unwrap_or(hits.hits.len() as u64);
        SearchHits {
            total,
            documents: hits
                .hits
                .into_iter()
                .map(|h| h.source.unwrap_or(Value::Null))
                .collect(),
        }
    }
}

/// Decodes a typed-keys `aggregations` object.
///
/// Keys without a `kind#` prefix cannot be classified and are decoded as
/// [`Aggregate::Unknown`]. A node whose structure does not match its kind is
/// also decoded as [`Aggregate::Unknown`], leaving its siblings intact.
pub fn decode_aggregations(aggregations: &Map<String, Value>) -> AggregateMap {
    let mut out = AggregateMap::new();
    for (key, body) in aggregations {
        let (kind, name) = match key.split_once('#') {
            Some((kind, name)) => (kind, name),
            None => {
                tracing::warn!(key, "Aggregation key without type prefix");
                out.insert(key.clone(), Aggregate::Unknown(String::new()));
                continue;
            }
        };
        let aggregate = decode_aggregate(kind, name, body).unwrap_or_else(|e| {
            tracing::warn!(aggregation = name, kind, error = %e, "Malformed aggregation node");
            Aggregate::Unknown(kind.to_string())
        });
        out.insert(name.to_string(), aggregate);
    }
    out
}

fn decode_aggregate(kind: &str, name: &str, body: &Value) -> Result<Aggregate> {
    let obj = body
        .as_object()
        .ok_or_else(|| EsError::Decode(format!("aggregation '{name}' is not an object")))?;

    let aggregate = match kind {
        "filter" => Aggregate::Filter(single_bucket(name, obj)?),
        "global" => Aggregate::Global(single_bucket(name, obj)?),
        "sterms" | "lterms" | "dterms" | "umterms" => {
            Aggregate::Terms(multi_bucket(name, obj, format_terms_key)?)
        }
        "date_histogram" => Aggregate::DateHistogram(multi_bucket(name, obj, format_date_key)?),
        _ => match metric_kind(kind) {
            Some(metric) => Aggregate::Metric {
                kind: metric,
                value: obj.get("value").and_then(Value::as_f64),
            },
            None => Aggregate::Unknown(kind.to_string()),
        },
    };
    Ok(aggregate)
}

fn metric_kind(kind: &str) -> Option<MetricType> {
    match kind {
        "avg" => Some(MetricType::Avg),
        "sum" => Some(MetricType::Sum),
        "min" => Some(MetricType::Min),
        "max" => Some(MetricType::Max),
        "value_count" => Some(MetricType::ValueCount),
        "cardinality" => Some(MetricType::Cardinality),
        _ => None,
    }
}

fn single_bucket(name: &str, obj: &Map<String, Value>) -> Result<SingleBucket> {
    Ok(SingleBucket {
        doc_count: doc_count(name, obj)?,
        aggregations: decode_aggregations(&sub_aggregations(obj)),
    })
}

/// Buckets that cannot be decoded are dropped; the rest keep their order.
fn multi_bucket(
    name: &str,
    obj: &Map<String, Value>,
    format_key: fn(&Map<String, Value>) -> Option<String>,
) -> Result<MultiBucket> {
    let buckets = obj
        .get("buckets")
        .and_then(Value::as_array)
        .ok_or_else(|| EsError::Decode(format!("aggregation '{name}' has no buckets array")))?;

    let buckets = buckets
        .iter()
        .filter_map(|bucket| match decode_bucket(name, bucket, format_key) {
            Ok(bucket) => Some(bucket),
            Err(e) => {
                tracing::warn!(aggregation = name, error = %e, "Skipping malformed bucket");
                None
            }
        })
        .collect();

    Ok(MultiBucket { buckets })
}

fn decode_bucket(
    name: &str,
    bucket: &Value,
    format_key: fn(&Map<String, Value>) -> Option<String>,
) -> Result<BucketNode> {
    let bucket = bucket
        .as_object()
        .ok_or_else(|| EsError::Decode(format!("bucket in '{name}' is not an object")))?;
    let key = format_key(bucket)
        .ok_or_else(|| EsError::Decode(format!("bucket in '{name}' has no usable key")))?;
    Ok(BucketNode {
        key,
        doc_count: doc_count(name, bucket)?,
        aggregations: decode_aggregations(&sub_aggregations(bucket)),
    })
}

fn doc_count(name: &str, obj: &Map<String, Value>) -> Result<u64> {
    obj.get("doc_count")
        .and_then(Value::as_u64)
        .ok_or_else(|| EsError::Decode(format!("aggregation '{name}' has no doc_count")))
}

/// Child aggregations are the typed keys among a bucket's fields.
fn sub_aggregations(obj: &Map<String, Value>) -> Map<String, Value> {
    obj.iter()
        .filter(|(k, _)| k.contains('#'))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn format_terms_key(bucket: &Map<String, Value>) -> Option<String> {
    if let Some(s) = bucket.get("key_as_string").and_then(Value::as_str) {
        return Some(s.to_string());
    }
    match bucket.get("key")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Prefers the cluster's own formatting; otherwise renders the epoch-millis
/// key as RFC 3339 in UTC.
fn format_date_key(bucket: &Map<String, Value>) -> Option<String> {
    if let Some(s) = bucket.get("key_as_string").and_then(Value::as_str) {
        return Some(s.to_string());
    }
    let millis = bucket.get("key")?.as_i64()?;
    DateTime::from_timestamp_millis(millis).map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> AggregateMap {
        decode_aggregations(value.as_object().unwrap())
    }

    #[test]
    fn test_filter_with_terms_and_counts() {
        let aggs = decode(json!({
            "filter#by_company": {
                "doc_count": 71,
                "sterms#company_bucket": {
                    "doc_count_error_upper_bound": 0,
                    "sum_other_doc_count": 0,
                    "buckets": [
                        { "key": "META", "doc_count": 40, "value_count#job_count": { "value": 40 } },
                        { "key": "GOOGLE", "doc_count": 31, "value_count#job_count": { "value": 31 } }
                    ]
                }
            }
        }));

        let Aggregate::Filter(filter) = &aggs["by_company"] else {
            panic!("Expected filter, got {:?}", aggs["by_company"]);
        };
        assert_eq!(filter.doc_count, 71);
        let Aggregate::Terms(terms) = &filter.aggregations["company_bucket"] else {
            panic!("Expected terms");
        };
        let keys: Vec<_> = terms.buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["META", "GOOGLE"]);
        assert_eq!(
            terms.buckets[1].aggregations["job_count"],
            Aggregate::metric(MetricType::ValueCount, Some(31.0))
        );
    }

    #[test]
    fn test_global_metrics_with_null_value() {
        let aggs = decode(json!({
            "global#overall_stats": {
                "doc_count": 0,
                "avg#avg_views": { "value": null },
                "cardinality#companies": { "value": 12 }
            }
        }));

        let Aggregate::Global(global) = &aggs["overall_stats"] else {
            panic!("Expected global");
        };
        assert_eq!(global.aggregations["avg_views"], Aggregate::metric(MetricType::Avg, None));
        assert_eq!(
            global.aggregations["companies"],
            Aggregate::metric(MetricType::Cardinality, Some(12.0))
        );
    }

    #[test]
    fn test_numeric_and_boolean_terms_keys() {
        let aggs = decode(json!({
            "lterms#years": { "buckets": [{ "key": 3, "doc_count": 5 }] },
            "lterms#remote": { "buckets": [{ "key": 1, "key_as_string": "true", "doc_count": 2 }] }
        }));

        let Aggregate::Terms(years) = &aggs["years"] else { panic!() };
        assert_eq!(years.buckets[0].key, "3");
        let Aggregate::Terms(remote) = &aggs["remote"] else { panic!() };
        assert_eq!(remote.buckets[0].key, "true");
    }

    #[test]
    fn test_date_histogram_key_formatting() {
        let aggs = decode(json!({
            "date_histogram#trend": { "buckets": [
                { "key": 1760918400000i64, "doc_count": 4 },
                { "key": 1761004800000i64, "key_as_string": "2025-10-21", "doc_count": 6 }
            ]}
        }));

        let Aggregate::DateHistogram(trend) = &aggs["trend"] else { panic!() };
        assert_eq!(trend.buckets[0].key, "2025-10-20T00:00:00.000Z");
        assert_eq!(trend.buckets[1].key, "2025-10-21");
    }

    #[test]
    fn test_unmodelled_kinds() {
        let aggs = decode(json!({
            "percentiles#latency": { "values": { "50.0": 12.0 } },
            "plain": { "value": 1 }
        }));
        assert_eq!(aggs["latency"], Aggregate::Unknown("percentiles".into()));
        assert_eq!(aggs["plain"], Aggregate::Unknown(String::new()));
    }

    #[test]
    fn test_malformed_node_leaves_siblings_intact() {
        let aggs = decode(json!({
            "filter#good": {
                "doc_count": 3,
                "sterms#company_bucket": { "buckets": [{ "key": "META", "doc_count": 3 }] }
            },
            "sterms#bad": { "doc_count_error_upper_bound": 0 },
            "global#no_count": { "avg#avg_views": { "value": 1.0 } }
        }));

        assert_eq!(aggs["bad"], Aggregate::Unknown("sterms".into()));
        assert_eq!(aggs["no_count"], Aggregate::Unknown("global".into()));
        let Aggregate::Filter(good) = &aggs["good"] else {
            panic!("Expected filter, got {:?}", aggs["good"]);
        };
        assert_eq!(good.doc_count, 3);
        let Aggregate::Terms(terms) = &good.aggregations["company_bucket"] else { panic!() };
        assert_eq!(terms.buckets[0].key, "META");
    }

    #[test]
    fn test_malformed_buckets_are_skipped() {
        let aggs = decode(json!({
            "sterms#company_bucket": { "buckets": [
                { "key": "META", "doc_count": 40 },
                { "key": "AMAZON" },
                { "key": null, "doc_count": 2 },
                "not-a-bucket",
                { "key": "GOOGLE", "doc_count": 31 }
            ]}
        }));

        let Aggregate::Terms(terms) = &aggs["company_bucket"] else { panic!() };
        let keys: Vec<_> = terms.buckets.iter().map(|b| (b.key.as_str(), b.doc_count)).collect();
        assert_eq!(keys, vec![("META", 40), ("GOOGLE", 31)]);
    }

    #[test]
    fn test_hits_total_formats() {
        let modern: EsSearchResponse = serde_json::from_value(json!({
            "hits": { "total": { "value": 42, "relation": "eq" }, "hits": [
                { "_id": "a", "_source": { "title": "x" } },
                { "_id": "b" }
            ]}
        }))
        .unwrap();
        let hits: SearchHits = modern.hits.unwrap().into();
        assert_eq!(hits.total, 42);
        assert_eq!(hits.documents[0]["title"], "x");
        assert!(hits.documents[1].is_null());

        let legacy: EsSearchResponse =
            serde_json::from_value(json!({ "hits": { "total": 7, "hits": [] } })).unwrap();
        assert_eq!(SearchHits::from(legacy.hits.unwrap()).total, 7);
    }
}
