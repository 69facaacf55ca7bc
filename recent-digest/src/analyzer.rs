//! Turns a fetched bundle into a written narrative via the completion API.
use crate::model::{FetchBundle, FetchRecord, SourceCategory};
use recent_common::{RecentError, Result};
use recent_config::{DigestConfig, LlmSettings};
use recent_llm::{build_llm_client, traits::LlmClient};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const SYSTEM_PROMPT: &str = "You are an expert AI/ML research analyst. Your job is to analyze \
recent developments in AI, LLMs, and robotics, and compile a comprehensive weekly digest.

Your report should:
1. Identify the most significant developments and trends
2. Group related items together thematically
3. Provide insightful analysis on why these developments matter
4. Include proper citations with URLs for all sources
5. Highlight any breakthrough research or viral projects
6. Note connections between different developments
7. Provide a brief executive summary at the top

Format the report in clean Markdown with:
- Executive Summary section
- Key Themes/Trends section
- Detailed breakdown by category (Papers, GitHub Projects, Social Discussion)
- Each item should have a linked citation
- A \"What to Watch\" section for emerging trends

Be concise but thorough. Focus on signal over noise.";

const MAX_HIGHLIGHTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub summary_max_tokens: u32,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4000,
            summary_max_tokens: 1500,
        }
    }
}

impl From<&LlmSettings> for AnalyzerSettings {
    fn from(s: &LlmSettings) -> Self {
        Self {
            temperature: s.temperature,
            max_tokens: s.max_tokens,
            summary_max_tokens: s.summary_max_tokens,
        }
    }
}

/// Outcome of one analysis call. Failures are values, not errors, so a
/// report can always be composed.
#[derive(Debug, Clone, PartialEq)]
pub enum Narrative {
    Generated(String),
    NoData { category: SourceCategory },
    Failed { context: FailureContext, error: String },
}

/// Which analyzer entry point produced a [`Narrative::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureContext {
    Digest,
    Summary(SourceCategory),
}

impl Narrative {
    pub fn is_generated(&self) -> bool {
        matches!(self, Narrative::Generated(_))
    }
}

impl fmt::Display for Narrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Narrative::Generated(text) => f.write_str(text),
            Narrative::NoData { category } => write!(f, "No {} data available.", category.key()),
            Narrative::Failed {
                context: FailureContext::Digest,
                error,
            } => write!(f, "Error generating analysis: {error}"),
            Narrative::Failed {
                context: FailureContext::Summary(category),
                error,
            } => write!(f, "Error summarizing {}: {error}", category.key()),
        }
    }
}

pub struct Analyzer {
    llm: Arc<dyn LlmClient + Send + Sync>,
    settings: AnalyzerSettings,
}

impl Analyzer {
    /// Build an analyzer backed by the configured completion endpoint. Fails
    /// before any network traffic when the key is missing.
    pub fn from_config(cfg: &DigestConfig) -> Result<Self> {
        let key = cfg
            .llm_api_key()
            .map_err(|e| RecentError::Config(e.to_string()))?;
        let timeout = cfg.http.timeout_secs.map(Duration::from_secs);
        let llm = build_llm_client(&cfg.llm.base_url, key, &cfg.llm.model, timeout)?;
        Ok(Self::with_client(llm, AnalyzerSettings::from(&cfg.llm)))
    }

    pub fn with_client(llm: Arc<dyn LlmClient + Send + Sync>, settings: AnalyzerSettings) -> Self {
        Self { llm, settings }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Full digest over every category of the bundle.
    pub async fn analyze(&self, bundle: &FetchBundle) -> Narrative {
        let prompt = digest_prompt(bundle);
        tracing::info!(
            target: "digest.analyze",
            model = self.llm.model_name(),
            items = bundle.total(),
            prompt_chars = prompt.len(),
            "analyze.start"
        );

        match self
            .llm
            .generate(
                &prompt,
                Some(SYSTEM_PROMPT),
                Some(self.settings.max_tokens),
                Some(self.settings.temperature),
            )
            .await
        {
            Ok(resp) => {
                tracing::info!(
                    target: "digest.analyze",
                    tokens_used = ?resp.tokens_used,
                    finish_reason = ?resp.finish_reason,
                    "analyze.done"
                );
                Narrative::Generated(resp.text)
            }
            Err(e) => {
                tracing::warn!(target: "digest.analyze", error = %e, "analyze.failed");
                Narrative::Failed {
                    context: FailureContext::Digest,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Short summary of one category's records.
    pub async fn summarize_category(
        &self,
        category: SourceCategory,
        records: &[FetchRecord],
    ) -> Narrative {
        if records.is_empty() {
            return Narrative::NoData { category };
        }
        let prompt = summary_prompt(category, records);
        match self
            .llm
            .generate(
                &prompt,
                None,
                Some(self.settings.summary_max_tokens),
                Some(self.settings.temperature),
            )
            .await
        {
            Ok(resp) => Narrative::Generated(resp.text),
            Err(e) => {
                tracing::warn!(
                    target: "digest.analyze",
                    category = category.key(),
                    error = %e,
                    "summarize.failed"
                );
                Narrative::Failed {
                    context: FailureContext::Summary(category),
                    error: e.to_string(),
                }
            }
        }
    }
}

/// One section per non-empty category, in fetch order.
pub fn build_context(bundle: &FetchBundle) -> String {
    let mut sections = Vec::new();
    for category in SourceCategory::ALL {
        let records = bundle.records(category);
        if records.is_empty() {
            continue;
        }
        let heading = if sections.is_empty() {
            format!("## {}\n", category.heading())
        } else {
            format!("\n## {}\n", category.heading())
        };
        sections.push(heading);
        sections.push(format_items(records));
    }
    sections.join("\n")
}

/// Numbered stanzas, one per record.
pub fn format_items(records: &[FetchRecord]) -> String {
    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let mut entry = format!(
                "\n### Item {n}\n\
                 - **Source**: {source}\n\
                 - **Topic**: {topic}\n\
                 - **Title**: {title}\n\
                 - **URL**: {url}\n\
                 - **Date**: {date}\n\
                 - **Content**: {content}\n",
                n = i + 1,
                source = rec.source.label(),
                topic = rec.topic,
                title = rec.title,
                url = rec.url,
                date = rec.published_date.as_deref().unwrap_or("Unknown date"),
                content = rec.content,
            );
            if !rec.highlights.is_empty() {
                let top: Vec<&str> = rec
                    .highlights
                    .iter()
                    .take(MAX_HIGHLIGHTS)
                    .map(String::as_str)
                    .collect();
                entry.push_str(&format!("- **Key Highlights**: {}\n", top.join(" | ")));
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn digest_prompt(bundle: &FetchBundle) -> String {
    let range = bundle.date_range();
    format!(
        "Please analyze the following data collected over the past week and compile \n\
         a comprehensive AI/ML/Robotics weekly digest with full citations and links.\n\n\
         Date Range: {start} to {end}\n\n\
         {context}\n\n\
         Please compile a comprehensive report with analysis, insights, and proper citations (include URLs).",
        start = range.start.format("%Y-%m-%d"),
        end = range.end.format("%Y-%m-%d"),
        context = build_context(bundle),
    )
}

fn summary_prompt(category: SourceCategory, records: &[FetchRecord]) -> String {
    format!(
        "Summarize the following {heading} \n\
         about AI/LLM/Robotics. Highlight the most important/trending items and include URLs as citations.\n\n\
         {context}\n\n\
         Provide a concise summary with key takeaways and links to the most notable items.",
        heading = category.heading(),
        context = format_items(records),
    )
}
