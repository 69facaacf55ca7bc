//! Per-category search fan-out.
//!
//! Every (category, topic) pair is one sequential search call. A failed call
//! is logged and contributes nothing; it never aborts the run.
use crate::model::{DateRange, FetchBundle, FetchRecord, SourceCategory};
use chrono::Local;
use recent_common::{RecentError, Result};
use recent_config::{DigestConfig, SearchSettings};
use recent_web::{ExaApi, SearchClient, SearchRequest};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Knobs shared by every search call of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    pub num_results: u32,
    pub days_back: u32,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            num_results: 10,
            days_back: 7,
        }
    }
}

impl From<&SearchSettings> for FetchSettings {
    fn from(s: &SearchSettings) -> Self {
        Self {
            num_results: s.num_results,
            days_back: s.days_back,
        }
    }
}

pub struct Fetcher {
    client: Arc<dyn SearchClient + Send + Sync>,
    settings: FetchSettings,
}

impl Fetcher {
    /// Build a fetcher backed by Exa. Fails before any network traffic when
    /// the search key is missing.
    pub fn from_config(cfg: &DigestConfig) -> Result<Self> {
        let key = cfg
            .search_api_key()
            .map_err(|e| RecentError::Config(e.to_string()))?;
        let mut exa = ExaApi::new(&cfg.search.base_url, key)?;
        if let Some(secs) = cfg.http.timeout_secs {
            exa = exa.with_timeout(Duration::from_secs(secs));
        }
        Ok(Self::with_client(Arc::new(exa), FetchSettings::from(&cfg.search)))
    }

    pub fn with_client(client: Arc<dyn SearchClient + Send + Sync>, settings: FetchSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> FetchSettings {
        self.settings
    }

    /// Window ending today.
    pub fn date_range(&self) -> DateRange {
        DateRange::trailing(self.settings.days_back, Local::now().date_naive())
    }

    /// Search the leading topics for one category.
    pub async fn fetch_category(
        &self,
        category: SourceCategory,
        topics: &[String],
    ) -> Vec<FetchRecord> {
        self.fetch_category_in(category, topics, self.date_range()).await
    }

    pub async fn fetch_x_posts(&self, topics: &[String]) -> Vec<FetchRecord> {
        self.fetch_category(SourceCategory::Social, topics).await
    }

    pub async fn fetch_github_repos(&self, topics: &[String]) -> Vec<FetchRecord> {
        self.fetch_category(SourceCategory::Code, topics).await
    }

    pub async fn fetch_arxiv_papers(&self, topics: &[String]) -> Vec<FetchRecord> {
        self.fetch_category(SourceCategory::Papers, topics).await
    }

    /// Fetch all three categories over one shared window.
    pub async fn fetch_all(&self, topics: &[String]) -> FetchBundle {
        let range = self.date_range();
        tracing::info!(
            target: "digest.fetch",
            topics = topics.len(),
            window = %range,
            "fetch.all.start"
        );

        let x_posts = self
            .fetch_category_in(SourceCategory::Social, topics, range)
            .await;
        let github_repos = self
            .fetch_category_in(SourceCategory::Code, topics, range)
            .await;
        let arxiv_papers = self
            .fetch_category_in(SourceCategory::Papers, topics, range)
            .await;

        let bundle = FetchBundle::new(x_posts, github_repos, arxiv_papers, range, Local::now());
        tracing::info!(
            target: "digest.fetch",
            x_posts = bundle.count(SourceCategory::Social),
            github_repos = bundle.count(SourceCategory::Code),
            arxiv_papers = bundle.count(SourceCategory::Papers),
            "fetch.all.done"
        );
        bundle
    }

    /// Fetch-only mode: one category, or everything when `selection` is `None`.
    pub async fn quick_fetch(
        &self,
        selection: Option<SourceCategory>,
        topics: &[String],
    ) -> QuickFetch {
        match selection {
            Some(category) => QuickFetch::Category(self.fetch_category(category, topics).await),
            None => QuickFetch::All(Box::new(self.fetch_all(topics).await)),
        }
    }

    async fn fetch_category_in(
        &self,
        category: SourceCategory,
        topics: &[String],
        range: DateRange,
    ) -> Vec<FetchRecord> {
        let mut records = Vec::new();
        for topic in topics.iter().take(category.topic_limit()) {
            let request = SearchRequest {
                query: category.query_for(topic),
                num_results: self.settings.num_results,
                start_published_date: range.start,
                end_published_date: range.end,
                text: true,
                highlights: true,
            };
            match self.client.search_and_contents(&request).await {
                Ok(hits) => {
                    tracing::debug!(
                        target: "digest.fetch",
                        category = category.key(),
                        topic = %topic,
                        hits = hits.len(),
                        "fetch.topic.ok"
                    );
                    // The backend may ignore the requested limit.
                    records.extend(
                        hits.into_iter()
                            .take(self.settings.num_results as usize)
                            .map(|hit| FetchRecord::from_hit(category, topic, hit)),
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        target: "digest.fetch",
                        category = category.key(),
                        topic = %topic,
                        error = %e,
                        "Error fetching {} for {}",
                        category.label(),
                        topic
                    );
                }
            }
        }
        records
    }
}

/// Output of [`Fetcher::quick_fetch`], serialized as-is for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QuickFetch {
    Category(Vec<FetchRecord>),
    All(Box<FetchBundle>),
}
