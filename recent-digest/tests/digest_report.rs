mod common;

use common::{topics, StubLlm, StubSearch};
use recent_digest::{
    run_digest_with, Analyzer, AnalyzerSettings, FetchSettings, Fetcher, Narrative,
    ReportFormatter, SourceCategory, Stage,
};
use std::sync::Arc;

const NARRATIVE: &str = "## Executive Summary\n\nAgents shipped. See [repo](https://github.com/org0/repo0).";

fn parts(stub_llm: Arc<StubLlm>, out: &std::path::Path) -> (Fetcher, Analyzer, ReportFormatter) {
    let fetcher = Fetcher::with_client(Arc::new(StubSearch::new(2)), FetchSettings::default());
    let analyzer = Analyzer::with_client(stub_llm, AnalyzerSettings::default());
    (fetcher, analyzer, ReportFormatter::new(out))
}

#[tokio::test]
async fn report_embeds_window_stats_and_narrative() {
    let llm = Arc::new(StubLlm::replying(NARRATIVE));
    let dir = tempfile::tempdir().unwrap();
    let (fetcher, analyzer, formatter) = parts(llm.clone(), dir.path());

    let mut stages = Vec::new();
    let run = run_digest_with(&fetcher, &analyzer, &formatter, &topics(&["LLM"]), |s| {
        stages.push(s)
    })
    .await;
    assert_eq!(stages, vec![Stage::Fetching, Stage::Analyzing, Stage::Composing]);

    let text = run.report.as_str();
    let range = run.bundle.date_range();
    assert!(text.starts_with("# 🤖 AI/ML/Robotics Weekly Digest"));
    assert!(text.contains(&format!(
        "**Period**: {} to {}",
        range.start.format("%Y-%m-%d"),
        range.end.format("%Y-%m-%d")
    )));
    assert!(text.contains("| X/Twitter Posts | 2 |"));
    assert!(text.contains("| GitHub Repositories | 2 |"));
    assert!(text.contains("| arXiv Papers | 2 |"));
    assert!(text.contains("| **Total** | **6** |"));
    assert!(text.contains(NARRATIVE));
    assert!(text.contains("## 📝 Methodology"));
    assert!(text.trim_end().ends_with("*Generated automatically by RecentNews AI Digest System*"));

    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].max_tokens, Some(4000));
    assert_eq!(calls[0].temperature, Some(0.7));
    assert!(calls[0]
        .system_prompt
        .as_deref()
        .unwrap()
        .starts_with("You are an expert AI/ML research analyst."));
    assert!(calls[0].prompt.contains("## X/Twitter Posts"));
    assert!(calls[0].prompt.contains("## arXiv Papers"));
}

#[tokio::test]
async fn failed_analysis_still_yields_a_report() {
    let dir = tempfile::tempdir().unwrap();
    let (fetcher, analyzer, formatter) = parts(Arc::new(StubLlm::failing()), dir.path());

    let run = run_digest_with(&fetcher, &analyzer, &formatter, &topics(&["GPT"]), |_| {}).await;

    assert!(matches!(run.narrative, Narrative::Failed { .. }));
    assert!(run
        .report
        .as_str()
        .contains("Error generating analysis: LLM error: HTTP 401: No auth credentials found"));
    assert!(run.report.as_str().contains("| **Total** | **6** |"));
}

#[tokio::test]
async fn summaries_use_a_single_user_prompt() {
    let llm = Arc::new(StubLlm::replying("short take"));
    let dir = tempfile::tempdir().unwrap();
    let (fetcher, analyzer, _) = parts(llm.clone(), dir.path());

    let papers = fetcher.fetch_arxiv_papers(&topics(&["robotics"])).await;
    let summary = analyzer
        .summarize_category(SourceCategory::Papers, &papers)
        .await;

    assert_eq!(summary, Narrative::Generated("short take".into()));
    let call = &llm.calls()[0];
    assert_eq!(call.system_prompt, None);
    assert_eq!(call.max_tokens, Some(1500));
    assert!(call.prompt.starts_with("Summarize the following arXiv Papers"));
}

#[tokio::test]
async fn empty_summary_input_skips_the_model() {
    let llm = Arc::new(StubLlm::replying("unused"));
    let analyzer = Analyzer::with_client(llm.clone(), AnalyzerSettings::default());

    let summary = analyzer.summarize_category(SourceCategory::Social, &[]).await;

    assert_eq!(summary.to_string(), "No x_posts data available.");
    assert!(llm.calls().is_empty());
}

#[tokio::test]
async fn failed_summary_names_the_category() {
    let dir = tempfile::tempdir().unwrap();
    let (fetcher, analyzer, _) = parts(Arc::new(StubLlm::failing()), dir.path());

    let repos = fetcher.fetch_github_repos(&topics(&["LLM"])).await;
    let summary = analyzer.summarize_category(SourceCategory::Code, &repos).await;

    assert!(summary
        .to_string()
        .starts_with("Error summarizing github_repos: "));
}

#[tokio::test]
async fn saves_report_and_raw_bundle() {
    let llm = Arc::new(StubLlm::replying(NARRATIVE));
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("reports");
    let (fetcher, analyzer, formatter) = parts(llm, &out);

    let run = run_digest_with(&fetcher, &analyzer, &formatter, &topics(&["LLM"]), |_| {}).await;

    let report_path = formatter.save_report(&run.report, None).unwrap();
    let name = report_path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("ai_digest_") && name.ends_with(".md"));
    assert_eq!(std::fs::read_to_string(&report_path).unwrap(), run.report.as_str());

    let raw_path = formatter.save_raw(&run.bundle, Some("raw.json")).unwrap();
    assert_eq!(raw_path, out.join("raw.json"));
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&raw_path).unwrap()).unwrap();
    assert_eq!(raw["x_posts"].as_array().unwrap().len(), 2);
    assert_eq!(raw["github_repos"][0]["repo_name"], "org0/repo0");
    assert!(raw["date_range"]["start"].is_string());
    assert!(raw["fetch_date"].is_string());
}
