use clap::{Parser, ValueEnum};
use recent_config::DigestConfig;
use recent_digest::SourceCategory;
use std::path::PathBuf;

/// Topics used by quick fetch when none are given.
const QUICK_TOPIC_COUNT: usize = 3;

/// Generate an AI/ML/Robotics weekly digest.
#[derive(Debug, Parser)]
#[command(name = "recentnews", version, about)]
pub struct Cli {
    /// Don't save the report to file
    #[arg(long)]
    pub no_save: bool,

    /// Also save raw JSON data
    #[arg(long)]
    pub save_raw: bool,

    /// Don't display report in console
    #[arg(long)]
    pub no_display: bool,

    /// Custom topics to search for
    #[arg(long, num_args = 1..)]
    pub topics: Vec<String>,

    /// Fetch without LLM analysis and print the records as JSON
    #[arg(long, value_enum, conflicts_with = "summarize")]
    pub quick: Option<QuickSource>,

    /// Fetch one source and print a short LLM summary of it
    #[arg(long, value_enum)]
    pub summarize: Option<Source>,

    /// Completion model override
    #[arg(long)]
    pub model: Option<String>,

    /// Directory for saved reports
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// YAML config file (defaults to ./recentnews.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Mirror logs to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    X,
    Github,
    Arxiv,
}

impl From<Source> for SourceCategory {
    fn from(s: Source) -> Self {
        match s {
            Source::X => SourceCategory::Social,
            Source::Github => SourceCategory::Code,
            Source::Arxiv => SourceCategory::Papers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuickSource {
    X,
    Github,
    Arxiv,
    All,
}

impl QuickSource {
    /// `None` selects every category.
    pub fn category(self) -> Option<SourceCategory> {
        match self {
            QuickSource::X => Some(SourceCategory::Social),
            QuickSource::Github => Some(SourceCategory::Code),
            QuickSource::Arxiv => Some(SourceCategory::Papers),
            QuickSource::All => None,
        }
    }
}

impl Cli {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply(&self, cfg: &mut DigestConfig) {
        if !self.topics.is_empty() {
            cfg.topics = self.topics.clone();
        }
        if let Some(model) = &self.model {
            cfg.llm.model = model.clone();
        }
        if let Some(dir) = &self.output_dir {
            cfg.output.dir = dir.clone();
        }
    }

    /// Explicit topics, else the leading configured ones.
    pub fn quick_topics(&self, cfg: &DigestConfig) -> Vec<String> {
        if self.topics.is_empty() {
            cfg.topics.iter().take(QUICK_TOPIC_COUNT).cloned().collect()
        } else {
            self.topics.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_save_and_display() {
        let cli = Cli::parse_from(["recentnews"]);
        assert!(!cli.no_save && !cli.save_raw && !cli.no_display);
        assert!(cli.topics.is_empty());
        assert_eq!(cli.quick, None);
    }

    #[test]
    fn topics_take_several_values() {
        let cli = Cli::parse_from(["recentnews", "--topics", "LLM", "robotics", "--save-raw"]);
        assert_eq!(cli.topics, vec!["LLM", "robotics"]);
        assert!(cli.save_raw);
    }

    #[test]
    fn overrides_fold_into_config() {
        let cli = Cli::parse_from([
            "recentnews",
            "--topics",
            "GPT",
            "--model",
            "openai/gpt-4o-mini",
            "--output-dir",
            "out",
        ]);
        let mut cfg = DigestConfig::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg.topics, vec!["GPT"]);
        assert_eq!(cfg.llm.model, "openai/gpt-4o-mini");
        assert_eq!(cfg.output.dir, PathBuf::from("out"));
    }

    #[test]
    fn quick_defaults_to_three_topics() {
        let cli = Cli::parse_from(["recentnews", "--quick", "github"]);
        assert_eq!(cli.quick.and_then(QuickSource::category), Some(SourceCategory::Code));
        let cfg = DigestConfig::default();
        assert_eq!(cli.quick_topics(&cfg), cfg.topics[..3].to_vec());
    }

    #[test]
    fn quick_and_summarize_conflict() {
        assert!(Cli::try_parse_from(["recentnews", "--quick", "all", "--summarize", "x"]).is_err());
    }
}
