use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use recent_common::RecentError;
use recent_common::observability::{LogConfig, LogFormat, init_logging};
use recent_config::{DEFAULT_CONFIG_FILE, DigestConfig, RecentConfigLoader, load_dotenv};
use recent_digest::{Analyzer, Fetcher, ReportFormatter, SourceCategory, run_digest_with};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;
mod console;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_path = bootstrap(&cli)?;

    let loader = match &cli.config {
        Some(path) => RecentConfigLoader::new().with_file(path),
        None => RecentConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let mut cfg = loader.load().context("loading configuration")?;
    cli.apply(&mut cfg);
    tracing::info!(
        log = %log_path.display(),
        topics = cfg.topics.len(),
        model = %cfg.llm.model,
        "recentnews.start"
    );

    if let Some(source) = cli.quick {
        return quick(&cli, &cfg, source.category()).await;
    }
    if let Some(source) = cli.summarize {
        return summarize(&cfg, source.into()).await;
    }
    digest(&cli, &cfg).await
}

/// Load `.env` and then start logging, so `RUST_LOG` and `RECENT_LOG_DIR`
/// from the file take effect. Returns the current log file path.
fn bootstrap(cli: &Cli) -> Result<PathBuf> {
    let dotenv = load_dotenv();
    let log_path = init_logging(LogConfig {
        emit_stderr: cli.verbose,
        format: if cli.log_json {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        ..LogConfig::default()
    })?;
    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "recentnews.dotenv");
    }
    Ok(log_path)
}

async fn digest(cli: &Cli, cfg: &DigestConfig) -> Result<ExitCode> {
    console::banner();

    let (fetcher, analyzer) = match Fetcher::from_config(cfg)
        .and_then(|f| Analyzer::from_config(cfg).map(|a| (f, a)))
    {
        Ok(parts) => parts,
        Err(e) => return config_failure(e),
    };
    let formatter = ReportFormatter::new(&cfg.output.dir);

    let mut progress = console::StageProgress::start();
    let run = run_digest_with(&fetcher, &analyzer, &formatter, &cfg.topics, |stage| {
        progress.advance(stage)
    })
    .await;
    progress.finish();

    if !run.narrative.is_generated() {
        console::warn(&run.narrative.to_string());
    }

    if !cli.no_save {
        let path = formatter.save_report(&run.report, None)?;
        console::saved("📄 Report", &path);
    }
    if cli.save_raw {
        let path = formatter.save_raw(&run.bundle, None)?;
        console::saved("📊 Raw data", &path);
    }
    if !cli.no_display {
        console::show_report(run.report.as_str());
    }
    Ok(ExitCode::SUCCESS)
}

async fn quick(
    cli: &Cli,
    cfg: &DigestConfig,
    selection: Option<SourceCategory>,
) -> Result<ExitCode> {
    let fetcher = match Fetcher::from_config(cfg) {
        Ok(f) => f,
        Err(e) => return config_failure(e),
    };
    let topics = cli.quick_topics(cfg);
    let out = fetcher.quick_fetch(selection, &topics).await;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(ExitCode::SUCCESS)
}

async fn summarize(cfg: &DigestConfig, category: SourceCategory) -> Result<ExitCode> {
    let (fetcher, analyzer) = match Fetcher::from_config(cfg)
        .and_then(|f| Analyzer::from_config(cfg).map(|a| (f, a)))
    {
        Ok(parts) => parts,
        Err(e) => return config_failure(e),
    };
    let records = fetcher.fetch_category(category, &cfg.topics).await;
    let summary = analyzer.summarize_category(category, &records).await;
    println!("{summary}");
    Ok(ExitCode::SUCCESS)
}

/// Missing keys end the run before any request is made; anything else is a
/// regular error.
fn config_failure(e: RecentError) -> Result<ExitCode> {
    if let RecentError::Config(msg) = &e {
        tracing::error!(error = %msg, "recentnews.config_error");
        console::config_error(msg);
        return Ok(ExitCode::FAILURE);
    }
    Err(e.into())
}
