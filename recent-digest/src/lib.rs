//! RecentNews digest pipeline.
//!
//! - [`fetcher`]: per-category searches over a trailing date window
//! - [`analyzer`]: LLM narrative over the fetched records
//! - [`formatter`]: Markdown report and raw JSON output
//! - [`pipeline`]: the three stages in order
//!
//! Search and completion backends are injected as trait objects, so every
//! stage can run against stubs.

pub mod analyzer;
pub mod fetcher;
pub mod formatter;
pub mod model;
pub mod pipeline;

pub use analyzer::{Analyzer, AnalyzerSettings, FailureContext, Narrative};
pub use fetcher::{FetchSettings, Fetcher, QuickFetch};
pub use formatter::{Report, ReportFormatter};
pub use model::{DateRange, FetchBundle, FetchRecord, SourceCategory};
pub use pipeline::{run_digest, run_digest_with, DigestRun, Stage};
