use serde::Serialize;
use std::collections::BTreeMap;

/// Results of one batch, keyed by query name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationResult {
    pub results: BTreeMap<String, QueryResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryResult {
    Bucket {
        entries: Vec<BucketEntry>,
        /// Documents matched by the query's filter, when it had one.
        #[serde(skip_serializing_if = "Option::is_none")]
        filter_doc_count: Option<u64>,
    },
    Metrics {
        values: BTreeMap<String, f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketEntry {
    pub key: String,
    pub doc_count: u64,
    pub metrics: BTreeMap<String, f64>,
}

impl AggregationResult {
    pub fn get(&self, query_name: &str) -> Option<&QueryResult> {
        self.results.get(query_name)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Bucket entries of a query, empty when absent or metric-only.
    pub fn entries(&self, query_name: &str) -> &[BucketEntry] {
        match self.results.get(query_name) {
            Some(QueryResult::Bucket { entries, .. }) => entries,
            _ => &[],
        }
    }

    /// Total matched by a filtered query; falls back to the summed bucket
    /// counts, and to 0 when the query has no result.
    pub fn total_count(&self, query_name: &str) -> u64 {
        match self.results.get(query_name) {
            Some(QueryResult::Bucket {
                filter_doc_count: Some(count),
                ..
            }) => *count,
            Some(QueryResult::Bucket { entries, .. }) => entries.iter().map(|e| e.doc_count).sum(),
            _ => 0,
        }
    }

    pub fn metric(&self, query_name: &str, metric: &str) -> Option<f64> {
        match self.results.get(query_name)? {
            QueryResult::Metrics { values } => values.get(metric).copied(),
            QueryResult::Bucket { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(key: &str, doc_count: u64) -> BucketEntry {
        BucketEntry {
            key: key.into(),
            doc_count,
            metrics: BTreeMap::new(),
        }
    }

    #[test]
    fn test_total_count_prefers_filter_doc_count() {
        let mut r = AggregationResult::default();
        r.results.insert(
            "filtered".into(),
            QueryResult::Bucket {
                entries: vec![entry("META", 1)],
                filter_doc_count: Some(71),
            },
        );
        r.results.insert(
            "bare".into(),
            QueryResult::Bucket {
                entries: vec![entry("META", 40), entry("GOOGLE", 31)],
                filter_doc_count: None,
            },
        );

        assert_eq!(r.total_count("filtered"), 71);
        assert_eq!(r.total_count("bare"), 71);
        assert_eq!(r.total_count("missing"), 0);
        assert_eq!(r.entries("bare").len(), 2);
        assert!(r.entries("missing").is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let mut values = BTreeMap::new();
        values.insert("total".to_string(), 12.0);
        let mut r = AggregationResult::default();
        r.results
            .insert("stats".into(), QueryResult::Metrics { values });

        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({"results": {"stats": {"type": "metrics", "values": {"total": 12.0}}}})
        );
        assert_eq!(r.metric("stats", "total"), Some(12.0));
    }
}
