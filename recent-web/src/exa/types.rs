use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Parameters for one search-and-contents call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    /// Upper bound on returned hits.
    pub num_results: u32,
    pub start_published_date: NaiveDate,
    pub end_published_date: NaiveDate,
    /// Ask for the page text alongside each hit.
    pub text: bool,
    /// Ask for the most relevant sentences of each page.
    pub highlights: bool,
}

/// Normalized search hit handed to callers of [`crate::SearchClient`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: Option<String>,
    pub text: Option<String>,
    pub highlights: Vec<String>,
    pub published_date: Option<String>,
    pub author: Option<String>,
}

/// Request body for Exa `POST /search`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExaSearchBody {
    pub query: String,
    pub num_results: u32,
    /// ISO 8601 date, e.g. `2025-01-01`.
    pub start_published_date: String,
    pub end_published_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<ExaContents>,
}

/// Which page contents Exa should attach to each result.
#[derive(Debug, Clone, Serialize)]
pub struct ExaContents {
    pub text: bool,
    pub highlights: bool,
}

impl From<&SearchRequest> for ExaSearchBody {
    fn from(req: &SearchRequest) -> Self {
        let contents = (req.text || req.highlights).then_some(ExaContents {
            text: req.text,
            highlights: req.highlights,
        });
        Self {
            query: req.query.clone(),
            num_results: req.num_results,
            start_published_date: req.start_published_date.format("%Y-%m-%d").to_string(),
            end_published_date: req.end_published_date.format("%Y-%m-%d").to_string(),
            contents,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExaSearchResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub results: Vec<ExaResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExaResult {
    pub url: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub highlights: Option<Vec<String>>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

impl From<ExaResult> for SearchHit {
    fn from(r: ExaResult) -> Self {
        Self {
            url: r.url,
            title: r.title.filter(|t| !t.trim().is_empty()),
            text: r.text.filter(|t| !t.is_empty()),
            highlights: r.highlights.unwrap_or_default(),
            published_date: r.published_date,
            author: r.author.filter(|a| !a.trim().is_empty()),
        }
    }
}
