//! Loader for digest configuration with YAML + environment overlays.
//!
//! Precedence, lowest first: built-in defaults, YAML files (in the order they
//! were added), `RECENT__`-prefixed environment variables (`__` separates
//! nesting, e.g. `RECENT__SEARCH__NUM_RESULTS=5`, `RECENT__TOPICS=LLM,robotics`).
//! String values may reference other variables as `${VAR}`; expansion is
//! recursive up to a fixed depth. The two API keys fall back to the
//! conventional `EXA_API_KEY` / `OPENROUTER_API_KEY` variables.
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const SEARCH_KEY_ENV: &str = "EXA_API_KEY";
pub const LLM_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_CONFIG_FILE: &str = "recentnews.yaml";

pub const DEFAULT_TOPICS: &[&str] = &[
    "LLM",
    "large language model",
    "AI artificial intelligence",
    "robotics",
    "machine learning",
    "neural network",
    "GPT",
    "transformer model",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub topics: Vec<String>,
    pub search: SearchSettings,
    pub llm: LlmSettings,
    pub http: HttpSettings,
    pub output: OutputSettings,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
            search: SearchSettings::default(),
            llm: LlmSettings::default(),
            http: HttpSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Results requested per topic query.
    pub num_results: u32,
    /// Length of the trailing publish-date window.
    pub days_back: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.exa.ai".into(),
            api_key: None,
            num_results: 10,
            days_back: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    /// Output cap for the full digest.
    pub max_tokens: u32,
    /// Output cap for single-category summaries.
    pub summary_max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".into(),
            api_key: None,
            model: "xiaomi/mimo-v2-flash:free".into(),
            temperature: 0.7,
            max_tokens: 4000,
            summary_max_tokens: 1500,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request timeout; unset means no timeout is imposed.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("reports"),
        }
    }
}

/// A required secret is absent from every configuration source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{var} not set. Please add it to your .env file.")]
pub struct MissingSecret {
    pub var: &'static str,
}

impl DigestConfig {
    pub fn search_api_key(&self) -> Result<&str, MissingSecret> {
        self.search.api_key.as_deref().ok_or(MissingSecret {
            var: SEARCH_KEY_ENV,
        })
    }

    pub fn llm_api_key(&self) -> Result<&str, MissingSecret> {
        self.llm.api_key.as_deref().ok_or(MissingSecret { var: LLM_KEY_ENV })
    }

    /// Normalize after loading: blank or unexpanded secrets count as absent,
    /// an empty topic list falls back to the defaults.
    fn finish(mut self) -> Self {
        self.search.api_key = self
            .search
            .api_key
            .and_then(clean_secret)
            .or_else(|| secret_from_env(SEARCH_KEY_ENV));
        self.llm.api_key = self
            .llm
            .api_key
            .and_then(clean_secret)
            .or_else(|| secret_from_env(LLM_KEY_ENV));

        self.topics = self
            .topics
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if self.topics.is_empty() {
            self.topics = DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect();
        }
        self
    }
}

fn clean_secret(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains("${") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn secret_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().and_then(clean_secret)
}

/// Load `.env` from the working directory (or a parent) into the process
/// environment. Existing variables win. Returns the file used, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "config.dotenv.loaded");
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!(error = %e, "config.dotenv.unreadable");
            None
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => break,
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct RecentConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for RecentConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RecentConfigLoader {
    /// Start from built-in defaults; sources added later take precedence,
    /// and `RECENT__` environment overrides are applied last.
    ///
    /// ```
    /// use recent_config::RecentConfigLoader;
    ///
    /// let config = RecentConfigLoader::new()
    ///     .with_yaml_str("search:\n  num_results: 5")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.search.num_results, 5);
    /// assert_eq!(config.search.days_back, 7);
    /// assert_eq!(config.topics.len(), 8);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the `config` crate infers the
    /// format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use recent_config::RecentConfigLoader;
    ///
    /// let cfg = RecentConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// topics: ["robotics", "GPT"]
    /// llm:
    ///   model: "openai/gpt-4o-mini"
    ///   temperature: 0.2
    /// output:
    ///   dir: "out"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.topics, vec!["robotics", "GPT"]);
    /// assert_eq!(cfg.llm.model, "openai/gpt-4o-mini");
    /// assert_eq!(cfg.llm.max_tokens, 4000);
    /// assert_eq!(cfg.output.dir, std::path::PathBuf::from("out"));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders are expanded before the strongly typed structs
    /// are materialised; absent keys take their defaults.
    ///
    /// ```
    /// use recent_config::RecentConfigLoader;
    ///
    /// unsafe { std::env::set_var("DIGEST_SEARCH_TOKEN", "injected-from-env"); }
    ///
    /// let config = RecentConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// search:
    ///   api_key: "${DIGEST_SEARCH_TOKEN}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.search_api_key().unwrap(), "injected-from-env");
    ///
    /// unsafe { std::env::remove_var("DIGEST_SEARCH_TOKEN"); }
    /// ```
    pub fn load(self) -> Result<DigestConfig, ConfigError> {
        let env = Environment::with_prefix("RECENT")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("topics");

        let cfg = self.builder.add_source(env).build()?;

        let mut v: Value = cfg.try_deserialize()?;
        if v.is_null() {
            v = Value::Object(Default::default());
        }
        expand_env_in_value(&mut v);

        let typed: DigestConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("DIGEST_DIR", Some("weekly"), || {
            let mut v = json!("reports/${DIGEST_DIR}/out");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("reports/weekly/out"));
        });
    }

    #[test]
    fn expands_nested_values() {
        temp_env::with_vars([("MODEL", Some("gpt")), ("VENDOR", Some("openai"))], || {
            let mut v = json!({
                "llm": {"model": "${VENDOR}/${MODEL}"},
                "topics": ["$MODEL", 3, null]
            });
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!({"llm": {"model": "openai/gpt"}, "topics": ["gpt", 3, null]})
            );
        });
    }

    #[test]
    fn expansion_terminates_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${RECENT_TEST_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${RECENT_TEST_DOES_NOT_EXIST}"));
    }

    #[test]
    fn blank_and_unexpanded_secrets_are_absent() {
        assert_eq!(clean_secret("  ".into()), None);
        assert_eq!(clean_secret("${EXA_API_KEY}".into()), None);
        assert_eq!(clean_secret(" exa-123 ".into()), Some("exa-123".into()));
    }

    #[test]
    fn missing_secret_names_the_variable() {
        let err = MissingSecret { var: SEARCH_KEY_ENV };
        assert_eq!(
            err.to_string(),
            "EXA_API_KEY not set. Please add it to your .env file."
        );
    }
}
