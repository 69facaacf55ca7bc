use recent_config::{DigestConfig, RecentConfigLoader, MissingSecret};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

const NO_SECRETS: [(&str, Option<&str>); 2] = [("EXA_API_KEY", None), ("OPENROUTER_API_KEY", None)];

#[test]
#[serial]
fn defaults_without_any_source() {
    temp_env::with_vars(NO_SECRETS, || {
        let cfg = RecentConfigLoader::new().load().expect("defaults load");
        let expected = DigestConfig::default();
        assert_eq!(cfg.topics, expected.topics);
        assert_eq!(cfg.search.num_results, 10);
        assert_eq!(cfg.search.days_back, 7);
        assert_eq!(cfg.llm.max_tokens, 4000);
        assert_eq!(cfg.llm.summary_max_tokens, 1500);
        assert_eq!(cfg.http.timeout_secs, None);
        assert_eq!(
            cfg.search_api_key(),
            Err(MissingSecret { var: "EXA_API_KEY" })
        );
        assert_eq!(
            cfg.llm_api_key(),
            Err(MissingSecret {
                var: "OPENROUTER_API_KEY"
            })
        );
    });
}

#[test]
#[serial]
fn file_values_and_conventional_secrets() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
topics:
  - robotics
  - "  "
  - GPT
search:
  num_results: 4
llm:
  model: "meta-llama/llama-3.3-70b-instruct"
  temperature: 0.3
http:
  timeout_secs: 90
output:
  dir: "${DIGEST_OUT}/weekly"
"#;
    let p = write_yaml(&tmp, "recentnews.yaml", file_yaml);

    temp_env::with_vars(
        [
            ("EXA_API_KEY", Some("exa-live")),
            ("OPENROUTER_API_KEY", Some("  sk-or-live  ")),
            ("DIGEST_OUT", Some("/srv/digests")),
        ],
        || {
            let cfg = RecentConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load digest config");

            assert_eq!(cfg.topics, vec!["robotics", "GPT"]);
            assert_eq!(cfg.search.num_results, 4);
            assert_eq!(cfg.llm.model, "meta-llama/llama-3.3-70b-instruct");
            assert!((cfg.llm.temperature - 0.3).abs() < f32::EPSILON);
            assert_eq!(cfg.http.timeout_secs, Some(90));
            assert_eq!(cfg.output.dir, PathBuf::from("/srv/digests/weekly"));
            assert_eq!(cfg.search_api_key().unwrap(), "exa-live");
            assert_eq!(cfg.llm_api_key().unwrap(), "sk-or-live");
        },
    );
}

#[test]
#[serial]
fn prefixed_environment_overrides_files() {
    temp_env::with_vars(
        [
            ("RECENT__SEARCH__NUM_RESULTS", Some("3")),
            ("RECENT__TOPICS", Some("LLM,robotics")),
            ("EXA_API_KEY", None),
            ("OPENROUTER_API_KEY", None),
        ],
        || {
            let cfg = RecentConfigLoader::new()
                .with_yaml_str("search:\n  num_results: 8\n")
                .load()
                .expect("load with env overrides");
            assert_eq!(cfg.search.num_results, 3);
            assert_eq!(cfg.topics, vec!["LLM", "robotics"]);
        },
    );
}

#[test]
#[serial]
fn missing_optional_file_is_skipped_but_required_fails() {
    let tmp = TempDir::new().unwrap();
    let absent = tmp.path().join("absent.yaml");

    temp_env::with_vars(NO_SECRETS, || {
        let cfg = RecentConfigLoader::new()
            .with_optional_file(&absent)
            .load()
            .expect("optional file may be missing");
        assert_eq!(cfg.output.dir, PathBuf::from("reports"));

        assert!(RecentConfigLoader::new().with_file(&absent).load().is_err());
    });
}
