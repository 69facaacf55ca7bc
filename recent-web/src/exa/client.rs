//! Thin wrapper around Exa `POST /search` with contents retrieval.
//!
//! Every call is sent exactly once; failures surface as
//! [`RecentError::Search`] and it is up to the caller to decide whether a
//! missing batch of results matters.
use super::types::{ExaSearchBody, ExaSearchResponse, SearchHit, SearchRequest};
use crate::SearchClient;
use async_trait::async_trait;
use recent_common::{RecentError, Result};
use recent_http::{Auth, HttpClient, HttpError, RequestOpts};
use reqwest::header::{HeaderName, HeaderValue};
use std::time::{Duration, Instant};

pub const EXA_BASE_URL: &str = "https://api.exa.ai";

#[derive(Clone)]
pub struct ExaApi {
    http: HttpClient,
    api_key: HeaderValue,
}

impl ExaApi {
    /// Build a client; fails on an empty or header-unsafe key.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let key = api_key.trim();
        if key.is_empty() {
            return Err(RecentError::Config("search API key is empty".into()));
        }
        let mut api_key = HeaderValue::from_str(key)
            .map_err(|e| RecentError::Config(format!("invalid search API key: {e}")))?;
        api_key.set_sensitive(true);

        let http = HttpClient::new(base_url)
            .map_err(|e| RecentError::Config(format!("invalid search base URL: {e}")))?;
        Ok(Self { http, api_key })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<ExaSearchResponse> {
        let body = ExaSearchBody::from(request);
        let started = Instant::now();
        tracing::debug!(
            target: "web.exa",
            query = %request.query,
            num_results = request.num_results,
            start = %body.start_published_date,
            end = %body.end_published_date,
            "exa.search.start"
        );

        let resp: ExaSearchResponse = self
            .http
            .post_json_opts(
                "search",
                &body,
                RequestOpts {
                    auth: Some(Auth::Header {
                        name: HeaderName::from_static("x-api-key"),
                        value: self.api_key.clone(),
                    }),
                    ..Default::default()
                },
            )
            .await
            .map_err(http_to_recent)?;

        tracing::info!(
            target: "web.exa",
            query = %request.query,
            hit_count = resp.results.len(),
            request_id = ?resp.request_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "exa.search.done"
        );
        Ok(resp)
    }
}

#[async_trait]
impl SearchClient for ExaApi {
    async fn search_and_contents(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        let resp = self.search(request).await?;
        Ok(resp.results.into_iter().map(SearchHit::from).collect())
    }
}

fn http_to_recent(e: HttpError) -> RecentError {
    RecentError::Search(e.to_string())
}
