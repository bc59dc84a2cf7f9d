//! Shared helpers: an in-memory backend that records every call.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use scout::aggregation::{AggregateMap, AggregationTree};
use scout::{BoxError, SearchBackend, SearchHits, SearchRequest};
use serde_json::Value;
use std::collections::HashMap;

/// Append-only call log.
pub struct Recorder<T>(Mutex<Vec<T>>);

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self(Mutex::new(Vec::new()))
    }
}

impl<T: Clone> Recorder<T> {
    pub fn push(&self, item: T) {
        self.0.lock().push(item);
    }

    pub fn all(&self) -> Vec<T> {
        self.0.lock().clone()
    }
}

#[derive(Default)]
pub struct FakeBackend {
    pub aggregations: AggregateMap,
    pub hits: SearchHits,
    pub documents: HashMap<String, Value>,
    pub fail_with: Option<String>,
    pub aggregate_calls: Recorder<(String, AggregationTree)>,
    pub search_calls: Recorder<(String, SearchRequest)>,
}

#[derive(Debug)]
pub struct TransportError(pub String);

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "transport error: {}", self.0)
    }
}

impl std::error::Error for TransportError {}

impl FakeBackend {
    pub fn with_aggregations(aggregations: AggregateMap) -> Self {
        Self {
            aggregations,
            ..Default::default()
        }
    }

    pub fn with_hits(total: u64, documents: Vec<Value>) -> Self {
        Self {
            hits: SearchHits { total, documents },
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), BoxError> {
        match &self.fail_with {
            Some(msg) => Err(Box::new(TransportError(msg.clone()))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SearchBackend for FakeBackend {
    async fn search(&self, index: &str, request: &SearchRequest) -> Result<SearchHits, BoxError> {
        self.search_calls.push((index.to_string(), request.clone()));
        self.check()?;
        Ok(self.hits.clone())
    }

    async fn aggregate(
        &self,
        index: &str,
        aggs: &AggregationTree,
    ) -> Result<AggregateMap, BoxError> {
        self.aggregate_calls.push((index.to_string(), aggs.clone()));
        self.check()?;
        Ok(self.aggregations.clone())
    }

    async fn get_by_id(&self, _index: &str, id: &str) -> Result<Option<Value>, BoxError> {
        self.check()?;
        Ok(self.documents.get(id).cloned())
    }
}
