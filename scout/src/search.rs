//! Per-index search facade: default filters, sort selection and paging.

use crate::aggregation::{AggregationBatch, AggregationExecutor, AggregationResult, BucketRequest};
use crate::backend::{SearchBackend, SearchRequest};
use crate::compiler::QueryCompiler;
use crate::condition::{Page, QueryWindow};
use crate::error::{Error, Result};
use crate::query::Query;
use crate::schema::IndexSchema;
use std::marker::PhantomData;
use std::sync::Arc;

pub struct DocumentSearch<S: IndexSchema> {
    backend: Arc<dyn SearchBackend>,
    executor: AggregationExecutor,
    index: String,
    _schema: PhantomData<S>,
}

impl<S: IndexSchema> DocumentSearch<S> {
    pub fn new(backend: Arc<dyn SearchBackend>, index: impl Into<String>) -> Self {
        Self {
            executor: AggregationExecutor::new(backend.clone()),
            backend,
            index: index.into(),
            _schema: PhantomData,
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Compiles the window into a backend request without sending it.
    ///
    /// Schema default conditions are added for fields the window leaves
    /// unconstrained. Windows touching a relevance field are ranked by
    /// score, everything else uses the schema's default sort. One extra
    /// document is requested so the caller can tell whether a next page
    /// exists.
    pub fn build_request(
        &self,
        window: QueryWindow<S::Field>,
        boosts: Vec<Query>,
    ) -> Result<SearchRequest> {
        let window = S::default_conditions()
            .into_iter()
            .fold(window, |w, c| w.with_default_condition(c));

        let registries = S::registries();
        let query = QueryCompiler::compile(window.conditions(), &registries.queries, &registries.ranges)?
            .with_boosts(boosts);

        let by_relevance = S::relevance_fields()
            .iter()
            .any(|f| window.has_condition_on(*f));

        Ok(SearchRequest {
            query,
            from: window.from(),
            size: window.fetch_size(),
            sort: (!by_relevance).then(S::default_sort),
        })
    }

    pub async fn search(&self, window: QueryWindow<S::Field>) -> Result<Page<S::Document>> {
        self.search_boosted(window, Vec::new()).await
    }

    /// Like [`search`](Self::search) with extra score-only clauses.
    pub async fn search_boosted(
        &self,
        window: QueryWindow<S::Field>,
        boosts: Vec<Query>,
    ) -> Result<Page<S::Document>> {
        let requested = window.size();
        let request = self.build_request(window, boosts)?;

        tracing::debug!(index = %self.index, ?request, "Search request");
        metrics::counter!("scout_search_requests_total", "index" => self.index.clone())
            .increment(1);

        let hits = self
            .backend
            .search(&self.index, &request)
            .await
            .map_err(|source| self.search_error(source))?;

        // Paging is decided on raw hits so a null source past the page
        // still signals the next page.
        Page::from_overfetch(hits.documents, requested, hits.total)
            .try_filter_map(|doc| {
                if doc.is_null() {
                    return Ok(None);
                }
                serde_json::from_value::<S::Document>(doc).map(Some)
            })
            .map_err(|e| self.search_error(Box::new(e)))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<S::Document> {
        let doc = self
            .backend
            .get_by_id(&self.index, id)
            .await
            .map_err(|source| self.search_error(source))?
            .ok_or_else(|| Error::DocumentNotFound {
                index: self.index.clone(),
                id: id.to_string(),
            })?;

        serde_json::from_value(doc).map_err(|e| self.search_error(Box::new(e)))
    }

    pub async fn aggregate(&self, batch: &AggregationBatch<S::Field>) -> Result<AggregationResult> {
        let registries = S::registries();
        self.executor
            .execute(&self.index, batch, &registries.queries, &registries.ranges)
            .await
    }

    /// Runs several single-bucket requests as one batch.
    pub async fn aggregate_requests(
        &self,
        requests: Vec<BucketRequest<S::Field>>,
    ) -> Result<AggregationResult> {
        tracing::debug!(
            index = %self.index,
            schema = S::NAME,
            count = requests.len(),
            "Executing bucket requests"
        );
        let queries = requests
            .into_iter()
            .map(BucketRequest::into_query)
            .collect::<Result<Vec<_>>>()?;
        self.aggregate(&AggregationBatch::new(queries)?).await
    }

    fn search_error(&self, source: crate::error::BoxError) -> Error {
        tracing::error!(index = %self.index, error = %source, "Search request failed");
        Error::Search {
            index: self.index.clone(),
            source,
        }
    }
}
