//! Markdown report composition and persistence.
use crate::analyzer::Narrative;
use crate::model::{DateRange, FetchBundle, SourceCategory};
use chrono::{DateTime, Local};
use recent_common::Result;
use std::fs;
use std::path::{Path, PathBuf};

const TITLE: &str = "# 🤖 AI/ML/Robotics Weekly Digest";

const FOOTER: &str = "## 📝 Methodology

This digest was compiled using:
- **Exa AI** for intelligent web search and content extraction
- **OpenRouter** for LLM analysis and synthesis
- Data sources: X/Twitter, GitHub, arXiv

---

*Generated automatically by RecentNews AI Digest System*
";

/// A fully composed digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    markdown: String,
}

impl Report {
    pub fn as_str(&self) -> &str {
        &self.markdown
    }

    pub fn into_string(self) -> String {
        self.markdown
    }
}

pub struct ReportFormatter {
    output_dir: PathBuf,
}

impl ReportFormatter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn header(date_range: DateRange, generated_at: DateTime<Local>) -> String {
        format!(
            "{TITLE}\n\n\
             **Generated**: {generated}  \n\
             **Period**: {start} to {end}\n\n\
             ---\n\n",
            generated = generated_at.format("%B %d, %Y at %I:%M %p"),
            start = date_range.start.format("%Y-%m-%d"),
            end = date_range.end.format("%Y-%m-%d"),
        )
    }

    pub fn stats_section(bundle: &FetchBundle) -> String {
        let mut out = String::from(
            "## 📊 Data Summary\n\n\
             | Source | Items Collected |\n\
             |--------|-----------------|\n",
        );
        for category in SourceCategory::ALL {
            out.push_str(&format!(
                "| {} | {} |\n",
                category.heading(),
                bundle.count(category)
            ));
        }
        out.push_str(&format!(
            "| **Total** | **{}** |\n\n---\n\n",
            bundle.total()
        ));
        out
    }

    pub fn compose(&self, bundle: &FetchBundle, narrative: &Narrative) -> Report {
        self.compose_at(bundle, narrative, Local::now())
    }

    /// Header, stats, narrative verbatim, footer.
    pub fn compose_at(
        &self,
        bundle: &FetchBundle,
        narrative: &Narrative,
        generated_at: DateTime<Local>,
    ) -> Report {
        let markdown = format!(
            "{header}{stats}{narrative}\n\n---\n\n{FOOTER}",
            header = Self::header(bundle.date_range(), generated_at),
            stats = Self::stats_section(bundle),
        );
        Report { markdown }
    }

    /// Write the report; the name defaults to `ai_digest_<timestamp>.md`.
    pub fn save_report(&self, report: &Report, filename: Option<&str>) -> Result<PathBuf> {
        let name = filename
            .map(str::to_string)
            .unwrap_or_else(|| timestamped("ai_digest", "md", Local::now()));
        self.write(&name, report.as_str())
    }

    /// Write the bundle as pretty JSON; the name defaults to
    /// `raw_data_<timestamp>.json`.
    pub fn save_raw(&self, bundle: &FetchBundle, filename: Option<&str>) -> Result<PathBuf> {
        let name = filename
            .map(str::to_string)
            .unwrap_or_else(|| timestamped("raw_data", "json", Local::now()));
        let json = serde_json::to_string_pretty(bundle)?;
        self.write(&name, &json)
    }

    fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(name);
        fs::write(&path, contents)?;
        tracing::info!(
            target: "digest.output",
            path = %path.display(),
            bytes = contents.len(),
            "output.saved"
        );
        Ok(path)
    }
}

fn timestamped(prefix: &str, ext: &str, at: DateTime<Local>) -> String {
    format!("{prefix}_{}.{ext}", at.format("%Y-%m-%d_%H-%M-%S"))
}
