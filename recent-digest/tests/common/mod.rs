#![allow(dead_code)]

use async_trait::async_trait;
use recent_common::{RecentError, Result};
use recent_llm::traits::{LlmClient, LlmResponse};
use recent_web::{SearchClient, SearchHit, SearchRequest};
use std::sync::Mutex;

/// Returns `per_query` hits for every query regardless of the requested
/// limit, except queries mentioning one of the `failing` topics, which error.
pub struct StubSearch {
    pub per_query: usize,
    pub text_len: usize,
    pub failing: Vec<String>,
    pub seen: Mutex<Vec<SearchRequest>>,
}

impl StubSearch {
    pub fn new(per_query: usize) -> Self {
        Self {
            per_query,
            text_len: 2_000,
            failing: Vec::new(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, topic: &str) -> Self {
        self.failing.push(topic.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.query.clone())
            .collect()
    }
}

#[async_trait]
impl SearchClient for StubSearch {
    async fn search_and_contents(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        self.seen.lock().unwrap().push(request.clone());
        if self
            .failing
            .iter()
            .any(|t| request.query.starts_with(&format!("{t} ")))
        {
            return Err(RecentError::Search("HTTP 500: upstream unavailable".into()));
        }
        let hits = (0..self.per_query)
            .map(|i| SearchHit {
                url: format!("https://github.com/org{i}/repo{i}"),
                title: (i % 2 == 0).then(|| format!("Result {i}")),
                text: Some("x".repeat(self.text_len)),
                highlights: vec!["h1".into(), "h2".into()],
                published_date: Some("2025-01-05T00:00:00.000Z".into()),
                author: Some("someone".into()),
            })
            .collect();
        Ok(hits)
    }
}

/// Completion stub: a canned reply, or a failure when `reply` is `None`.
pub struct StubLlm {
    pub reply: Option<String>,
    pub calls: Mutex<Vec<StubCall>>,
}

#[derive(Debug, Clone)]
pub struct StubCall {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl StubLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for StubLlm {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        self.calls.lock().unwrap().push(StubCall {
            prompt: prompt.to_string(),
            system_prompt: system_prompt.map(str::to_string),
            max_tokens,
            temperature,
        });
        match &self.reply {
            Some(text) => Ok(LlmResponse {
                text: text.clone(),
                model: Some("stub".into()),
                tokens_used: Some(42),
                finish_reason: Some("stop".into()),
            }),
            None => Err(RecentError::Llm("HTTP 401: No auth credentials found".into())),
        }
    }

    fn model_name(&self) -> &str {
        "stub/model"
    }
}

pub fn topics(names: &[&str]) -> Vec<String> {
    names.iter().map(|t| t.to_string()).collect()
}
