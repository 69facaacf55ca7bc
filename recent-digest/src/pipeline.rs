//! The fetch → analyze → compose sequence of one digest run.
use crate::analyzer::{Analyzer, Narrative};
use crate::fetcher::Fetcher;
use crate::formatter::{Report, ReportFormatter};
use crate::model::FetchBundle;
use std::time::Instant;

/// Pipeline stage about to start, reported to progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Analyzing,
    Composing,
}

impl Stage {
    pub fn describe(self) -> &'static str {
        match self {
            Stage::Fetching => "Fetching data from all sources...",
            Stage::Analyzing => "Analyzing with LLM...",
            Stage::Composing => "Generating report...",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DigestRun {
    pub bundle: FetchBundle,
    pub narrative: Narrative,
    pub report: Report,
}

pub async fn run_digest(
    fetcher: &Fetcher,
    analyzer: &Analyzer,
    formatter: &ReportFormatter,
    topics: &[String],
) -> DigestRun {
    run_digest_with(fetcher, analyzer, formatter, topics, |_| {}).await
}

/// Like [`run_digest`], calling `on_stage` before each stage.
pub async fn run_digest_with(
    fetcher: &Fetcher,
    analyzer: &Analyzer,
    formatter: &ReportFormatter,
    topics: &[String],
    mut on_stage: impl FnMut(Stage),
) -> DigestRun {
    let started = Instant::now();

    on_stage(Stage::Fetching);
    let bundle = fetcher.fetch_all(topics).await;

    on_stage(Stage::Analyzing);
    let narrative = analyzer.analyze(&bundle).await;

    on_stage(Stage::Composing);
    let report = formatter.compose(&bundle, &narrative);

    tracing::info!(
        target: "digest.run",
        items = bundle.total(),
        narrative_ok = narrative.is_generated(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "run.done"
    );
    DigestRun {
        bundle,
        narrative,
        report,
    }
}
