//! Records produced by the fetcher and the per-run bundle that carries them.
use chrono::{DateTime, Days, Local, NaiveDate};
use recent_web::SearchHit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three fixed content origins searched every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceCategory {
    #[serde(rename = "X/Twitter")]
    Social,
    #[serde(rename = "GitHub")]
    Code,
    #[serde(rename = "arXiv")]
    Papers,
}

impl SourceCategory {
    /// Fetch order for a full run.
    pub const ALL: [SourceCategory; 3] = [
        SourceCategory::Social,
        SourceCategory::Code,
        SourceCategory::Papers,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SourceCategory::Social => "X/Twitter",
            SourceCategory::Code => "GitHub",
            SourceCategory::Papers => "arXiv",
        }
    }

    /// Heading used in prompts and the stats table.
    pub fn heading(self) -> &'static str {
        match self {
            SourceCategory::Social => "X/Twitter Posts",
            SourceCategory::Code => "GitHub Repositories",
            SourceCategory::Papers => "arXiv Papers",
        }
    }

    /// Key of this category in the raw JSON dump.
    pub fn key(self) -> &'static str {
        match self {
            SourceCategory::Social => "x_posts",
            SourceCategory::Code => "github_repos",
            SourceCategory::Papers => "arxiv_papers",
        }
    }

    /// How many leading topics are searched, bounding request volume.
    pub fn topic_limit(self) -> usize {
        match self {
            SourceCategory::Social | SourceCategory::Code => 3,
            SourceCategory::Papers => 4,
        }
    }

    /// Maximum excerpt length, in characters.
    pub fn excerpt_cap(self) -> usize {
        match self {
            SourceCategory::Social | SourceCategory::Code => 500,
            SourceCategory::Papers => 800,
        }
    }

    pub fn query_for(self, topic: &str) -> String {
        match self {
            SourceCategory::Social => {
                format!("{topic} AI breakthrough OR announcement site:twitter.com OR site:x.com")
            }
            SourceCategory::Code => format!("{topic} repository stars site:github.com"),
            SourceCategory::Papers => format!("{topic} research paper site:arxiv.org"),
        }
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized representation of one search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchRecord {
    pub source: SourceCategory,
    pub topic: String,
    pub url: String,
    pub title: String,
    /// Page text cut to [`SourceCategory::excerpt_cap`] characters.
    pub content: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// `owner/repo`, GitHub results only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_name: Option<String>,
}

impl FetchRecord {
    pub fn from_hit(source: SourceCategory, topic: &str, hit: SearchHit) -> Self {
        let repo_name = (source == SourceCategory::Code).then(|| repo_name_from_url(&hit.url));
        let title = match (hit.title, source) {
            (Some(title), _) => title,
            (None, SourceCategory::Social) => "No title".to_string(),
            (None, SourceCategory::Code) => repo_name.clone().unwrap_or_default(),
            (None, SourceCategory::Papers) => "Untitled Paper".to_string(),
        };
        let content = hit
            .text
            .as_deref()
            .map(|t| truncate_chars(t, source.excerpt_cap()).to_string())
            .unwrap_or_default();

        Self {
            source,
            topic: topic.to_string(),
            url: hit.url,
            title,
            content,
            highlights: hit.highlights,
            published_date: hit.published_date,
            author: if source == SourceCategory::Code {
                None
            } else {
                hit.author
            },
            repo_name,
        }
    }
}

/// Longest prefix of `s` holding at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// `https://github.com/owner/repo/...` becomes `owner/repo`; anything else is
/// returned unchanged.
pub fn repo_name_from_url(url: &str) -> String {
    let rest = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))
        .or_else(|| url.strip_prefix("https://www.github.com/"));
    let Some(rest) = rest else {
        return url.to_string();
    };
    let mut parts = rest.split('/').filter(|p| !p.is_empty());
    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo)) => format!("{owner}/{repo}"),
        _ => url.to_string(),
    }
}

/// Inclusive publish-date window, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The `days` days leading up to and including `today`.
    pub fn trailing(days: u32, today: NaiveDate) -> Self {
        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Everything one run fetched, plus when and for which window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchBundle {
    x_posts: Vec<FetchRecord>,
    github_repos: Vec<FetchRecord>,
    arxiv_papers: Vec<FetchRecord>,
    fetch_date: DateTime<Local>,
    date_range: DateRange,
}

impl FetchBundle {
    pub fn new(
        x_posts: Vec<FetchRecord>,
        github_repos: Vec<FetchRecord>,
        arxiv_papers: Vec<FetchRecord>,
        date_range: DateRange,
        fetch_date: DateTime<Local>,
    ) -> Self {
        Self {
            x_posts,
            github_repos,
            arxiv_papers,
            fetch_date,
            date_range,
        }
    }

    pub fn empty(date_range: DateRange, fetch_date: DateTime<Local>) -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), date_range, fetch_date)
    }

    pub fn records(&self, category: SourceCategory) -> &[FetchRecord] {
        match category {
            SourceCategory::Social => &self.x_posts,
            SourceCategory::Code => &self.github_repos,
            SourceCategory::Papers => &self.arxiv_papers,
        }
    }

    pub fn count(&self, category: SourceCategory) -> usize {
        self.records(category).len()
    }

    pub fn total(&self) -> usize {
        SourceCategory::ALL.iter().map(|c| self.count(*c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn fetch_date(&self) -> DateTime<Local> {
        self.fetch_date
    }
}
