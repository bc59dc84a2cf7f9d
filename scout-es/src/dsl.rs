//! Query DSL rendering for compiled Scout trees.

use scout::aggregation::{AggregationNode, AggregationTree};
use scout::{BoolQuery, Query, SearchRequest};
use serde_json::{json, Map, Value};

/// Renders a compiled query as an Elasticsearch query clause.
pub fn query(query: &Query) -> Value {
    match query {
        Query::MatchAll => json!({ "match_all": {} }),
        Query::Term { field, value } => json!({ "term": { field: value } }),
        Query::Match { field, text } => json!({ "match": { field: text } }),
        Query::Range { field, gte, lte } => {
            let mut bounds = Map::new();
            if let Some(gte) = gte {
                bounds.insert("gte".into(), Value::String(gte.clone()));
            }
            if let Some(lte) = lte {
                bounds.insert("lte".into(), Value::String(lte.clone()));
            }
            json!({ "range": { field: bounds } })
        }
        Query::Bool(b) => json!({ "bool": bool_body(b) }),
    }
}

fn bool_body(b: &BoolQuery) -> Map<String, Value> {
    let mut body = Map::new();
    for (key, clauses) in [
        ("must", &b.must),
        ("should", &b.should),
        ("filter", &b.filter),
        ("must_not", &b.must_not),
    ] {
        if !clauses.is_empty() {
            body.insert(key.into(), clauses.iter().map(query).collect());
        }
    }
    if let Some(msm) = b.minimum_should_match {
        body.insert("minimum_should_match".into(), json!(msm));
    }
    body
}

/// Renders an aggregation tree as the value of a request's `aggs` key.
pub fn aggregations(tree: &AggregationTree) -> Value {
    Value::Object(
        tree.iter()
            .map(|(name, node)| (name.clone(), aggregation(node)))
            .collect(),
    )
}

fn aggregation(node: &AggregationNode) -> Value {
    let mut body = match node {
        AggregationNode::Filter { query: q, .. } => json!({ "filter": query(q) }),
        AggregationNode::Global { .. } => json!({ "global": {} }),
        AggregationNode::Terms { field, size, .. } => {
            json!({ "terms": { "field": field, "size": size } })
        }
        AggregationNode::DateHistogram {
            field,
            calendar_interval,
            ..
        } => json!({
            "date_histogram": { "field": field, "calendar_interval": calendar_interval }
        }),
        AggregationNode::Metric { kind, field } => json!({ kind.as_str(): { "field": field } }),
    };

    if let (Some(children), Value::Object(map)) = (node.children(), &mut body) {
        if !children.is_empty() {
            map.insert("aggs".into(), aggregations(children));
        }
    }
    body
}

/// Body for a document page request.
///
/// Documents missing the sort field are placed last.
pub fn search_body(request: &SearchRequest) -> Value {
    let mut body = json!({
        "from": request.from,
        "size": request.size,
        "query": query(&request.query),
        "track_total_hits": true,
    });
    if let Some(sort) = &request.sort {
        body["sort"] = json!([
            { sort.field.as_str(): { "order": sort.order.as_str(), "missing": "_last" } }
        ]);
    }
    body
}

/// Body for an aggregation-only request.
pub fn aggregation_body(tree: &AggregationTree) -> Value {
    json!({
        "size": 0,
        "aggs": aggregations(tree),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout::aggregation::{MetricType, IDENTITY_FIELD};
    use scout::SortOption;

    #[test]
    fn test_leaf_queries() {
        assert_eq!(query(&Query::MatchAll), json!({ "match_all": {} }));
        assert_eq!(
            query(&Query::term("company", "META")),
            json!({ "term": { "company": "META" } })
        );
        assert_eq!(
            query(&Query::text("title", "rust engineer")),
            json!({ "match": { "title": "rust engineer" } })
        );
    }

    #[test]
    fn test_range_omits_missing_bound() {
        assert_eq!(
            query(&Query::range("min_years", Some("3".into()), None)),
            json!({ "range": { "min_years": { "gte": "3" } } })
        );
        assert_eq!(
            query(&Query::range("created_at", Some("1".into()), Some("2".into()))),
            json!({ "range": { "created_at": { "gte": "1", "lte": "2" } } })
        );
    }

    #[test]
    fn test_bool_skips_empty_groups() {
        let q = Query::Bool(BoolQuery {
            must: vec![Query::term("deleted", "false")],
            should: vec![Query::text("title", "kafka")],
            minimum_should_match: Some(1),
            ..Default::default()
        });
        assert_eq!(
            query(&q),
            json!({
                "bool": {
                    "must": [{ "term": { "deleted": "false" } }],
                    "should": [{ "match": { "title": "kafka" } }],
                    "minimum_should_match": 1
                }
            })
        );
    }

    #[test]
    fn test_filter_wrapping_terms_with_count() {
        let mut metrics = AggregationTree::new();
        metrics.insert(
            "job_count".into(),
            AggregationNode::Metric {
                kind: MetricType::ValueCount,
                field: IDENTITY_FIELD.into(),
            },
        );
        let mut inner = AggregationTree::new();
        inner.insert(
            "company_bucket".into(),
            AggregationNode::Terms {
                field: "company".into(),
                size: 10,
                aggs: metrics,
            },
        );
        let mut tree = AggregationTree::new();
        tree.insert(
            "by_company".into(),
            AggregationNode::Filter {
                query: Query::term("company", "META"),
                aggs: inner,
            },
        );

        assert_eq!(
            aggregation_body(&tree),
            json!({
                "size": 0,
                "aggs": {
                    "by_company": {
                        "filter": { "term": { "company": "META" } },
                        "aggs": {
                            "company_bucket": {
                                "terms": { "field": "company", "size": 10 },
                                "aggs": {
                                    "job_count": { "value_count": { "field": "_index" } }
                                }
                            }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_global_and_date_histogram() {
        let mut metrics = AggregationTree::new();
        metrics.insert(
            "avg_views".into(),
            AggregationNode::Metric {
                kind: MetricType::Avg,
                field: "popularity_view_count".into(),
            },
        );
        let mut tree = AggregationTree::new();
        tree.insert("overall".into(), AggregationNode::Global { aggs: metrics });
        tree.insert(
            "trend".into(),
            AggregationNode::DateHistogram {
                field: "created_at".into(),
                calendar_interval: "1d".into(),
                aggs: AggregationTree::new(),
            },
        );

        assert_eq!(
            aggregations(&tree),
            json!({
                "overall": {
                    "global": {},
                    "aggs": { "avg_views": { "avg": { "field": "popularity_view_count" } } }
                },
                "trend": {
                    "date_histogram": { "field": "created_at", "calendar_interval": "1d" }
                }
            })
        );
    }

    #[test]
    fn test_search_body_sort_and_paging() {
        let request = SearchRequest {
            query: Query::MatchAll,
            from: 30,
            size: 31,
            sort: Some(SortOption::desc("created_at")),
        };
        let body = search_body(&request);
        assert_eq!(body["from"], 30);
        assert_eq!(body["size"], 31);
        assert_eq!(
            body["sort"],
            json!([{ "created_at": { "order": "desc", "missing": "_last" } }])
        );

        let relevance = SearchRequest { sort: None, ..request };
        assert!(search_body(&relevance).get("sort").is_none());
    }
}
