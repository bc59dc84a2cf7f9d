//! HTTP client implementing [`SearchBackend`] against an Elasticsearch cluster.

use crate::error::EsError;
use crate::response::{decode_aggregations, EsGetResponse, EsSearchResponse};
use crate::{dsl, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use scout::aggregation::{AggregateMap, AggregationTree};
use scout::config::ElasticsearchConfig;
use scout::{BoxError, SearchBackend, SearchHits, SearchRequest};
use serde_json::Value;
use std::time::Duration;

/// Elasticsearch cluster client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ElasticsearchClient {
    client: Client,
    base_url: Url,
    basic_auth: Option<(String, Option<String>)>,
}

impl ElasticsearchClient {
    /// Builds a client from config. With both an API key and a username set,
    /// the API key wins.
    pub fn new(config: &ElasticsearchConfig) -> Result<Self> {
        let base_url = Url::parse(config.url.trim_end_matches('/'))
            .map_err(|e| EsError::InvalidUrl(format!("{}: {}", config.url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(EsError::InvalidUrl(config.url.clone()));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = format!("ApiKey {}", key)
                .parse()
                .map_err(|_| EsError::Config("API key contains invalid header characters".into()))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()?;

        let basic_auth = match (&config.api_key, &config.username) {
            (None, Some(user)) => Some((user.clone(), config.password.clone())),
            _ => None,
        };

        tracing::debug!(url = %base_url, "Elasticsearch client ready");

        Ok(Self {
            client,
            base_url,
            basic_auth,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EsError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.basic_auth {
            Some((user, password)) => request.basic_auth(user, password.as_ref()),
            None => request,
        }
    }

    /// POSTs a search body and returns the parsed response.
    pub async fn search_raw(&self, index: &str, body: &Value) -> Result<EsSearchResponse> {
        let mut url = self.url(&[index, "_search"])?;
        url.query_pairs_mut().append_pair("typed_keys", "true");

        tracing::debug!(%url, body = %body, "POST _search");
        let response = self
            .authorize(self.client.post(url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        metrics::counter!("scout_es_requests_total", "status" => status.as_u16().to_string())
            .increment(1);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(EsError::from_status(status.as_u16(), &text));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetches one document's `_source`; `None` when it does not exist.
    pub async fn get_source(&self, index: &str, id: &str) -> Result<Option<Value>> {
        let url = self.url(&[index, "_doc", id])?;

        tracing::debug!(%url, "GET _doc");
        let response = self.authorize(self.client.get(url)).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(EsError::from_status(status.as_u16(), &text));
        }

        let doc: EsGetResponse = response.json().await?;
        Ok(if doc.found { doc.source } else { None })
    }
}

#[async_trait]
impl SearchBackend for ElasticsearchClient {
    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> std::result::Result<SearchHits, BoxError> {
        let response = self.search_raw(index, &dsl::search_body(request)).await?;
        let hits = response
            .hits
            .ok_or_else(|| EsError::Decode("search response has no hits".into()))?;
        Ok(hits.into())
    }

    async fn aggregate(
        &self,
        index: &str,
        aggs: &AggregationTree,
    ) -> std::result::Result<AggregateMap, BoxError> {
        let response = self.search_raw(index, &dsl::aggregation_body(aggs)).await?;
        match response.aggregations {
            Some(aggregations) => Ok(decode_aggregations(&aggregations)),
            None => {
                tracing::warn!(index, "Response carried no aggregations");
                Ok(AggregateMap::new())
            }
        }
    }

    async fn get_by_id(
        &self,
        index: &str,
        id: &str,
    ) -> std::result::Result<Option<Value>, BoxError> {
        Ok(self.get_source(index, id).await?)
    }
}
