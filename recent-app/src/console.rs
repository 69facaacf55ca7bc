//! Terminal output: banner, progress spinner and status lines.
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use recent_digest::Stage;
use std::path::Path;
use std::time::Duration;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn banner() {
    let rule = "─".repeat(46);
    println!("{}", rule.blue());
    println!("  {}", "🤖 AI/ML/Robotics Weekly Digest Generator".bold().blue());
    println!("  {}", "Powered by Exa AI & OpenRouter".dimmed());
    println!("{}", rule.blue());
}

/// Spinner that follows the pipeline stages and ticks off finished ones.
pub struct StageProgress {
    bar: ProgressBar,
    current: Option<Stage>,
}

impl StageProgress {
    pub fn start() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(SPINNER_FRAMES)
            .template("{spinner:.cyan} {msg}")
        {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar, current: None }
    }

    pub fn advance(&mut self, stage: Stage) {
        self.complete_current();
        self.bar.set_message(stage.describe().cyan().to_string());
        self.current = Some(stage);
    }

    pub fn finish(mut self) {
        self.complete_current();
        self.bar.finish_and_clear();
    }

    fn complete_current(&mut self) {
        if let Some(done) = self.current.take() {
            let line = match done {
                Stage::Fetching => "✓ Data fetching complete!",
                Stage::Analyzing => "✓ Analysis complete!",
                Stage::Composing => "✓ Report generated!",
            };
            self.bar.println(line.green().to_string());
        }
    }
}

pub fn saved(label: &str, path: &Path) {
    println!("{}", format!("{label} saved to: {}", path.display()).green());
}

pub fn warn(msg: &str) {
    eprintln!("{}", msg.yellow());
}

/// Configuration failures get the remediation hint underneath.
pub fn config_error(msg: &str) {
    eprintln!("{}", format!("Configuration Error: {msg}").red());
    eprintln!(
        "{}",
        "Please ensure your .env file has EXA_API_KEY and OPENROUTER_API_KEY set.".yellow()
    );
}

pub fn show_report(markdown: &str) {
    let rule = "═".repeat(60);
    println!();
    println!("{}", rule.green());
    println!("{}", "Weekly AI Digest".bold());
    println!("{}", rule.green());
    println!("{markdown}");
    println!("{}", rule.green());
}
