//! LLM integration for RecentNews.
//!
//! This crate exposes a common [`traits::LlmClient`] interface and a client for
//! OpenAI-compatible chat completion endpoints ([`openai::OpenAiClient`]),
//! which is how the digest talks to OpenRouter.
//!
//! # Examples
//! ```no_run
//! use recent_common::Result;
//! use recent_llm::{openai::OpenAiClient, traits::LlmClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let client = OpenAiClient::new(DEFAULT_BASE_URL, "sk-or-...".into(), DEFAULT_MODEL.into())?;
//! let reply = client.generate("Say OK", None, Some(8), Some(0.2)).await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```
pub mod openai;
pub mod traits;

use openai::OpenAiClient;
use recent_common::Result;
use std::sync::Arc;
use std::time::Duration;
use traits::LlmClient;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// Free model with a large (262k) context window.
pub const DEFAULT_MODEL: &str = "xiaomi/mimo-v2-flash:free";

const APP_NAME: &str = "RecentNews";

/// Build the shared completion client for a run.
pub fn build_llm_client(
    base_url: &str,
    api_key: &str,
    model: &str,
    timeout: Option<Duration>,
) -> Result<Arc<dyn LlmClient + Send + Sync + 'static>> {
    let mut client =
        OpenAiClient::new(base_url, api_key.to_string(), model.to_string())?.with_app_name(APP_NAME);
    if let Some(t) = timeout {
        client = client.with_timeout(t);
    }
    Ok(Arc::new(client))
}
