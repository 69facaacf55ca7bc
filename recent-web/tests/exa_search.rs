use chrono::NaiveDate;
use recent_common::RecentError;
use recent_web::{ExaApi, SearchClient, SearchRequest};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(query: &str) -> SearchRequest {
    SearchRequest {
        query: query.to_string(),
        num_results: 10,
        start_published_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        end_published_date: NaiveDate::from_ymd_opt(2025, 6, 8).unwrap(),
        text: true,
        highlights: true,
    }
}

#[tokio::test]
async fn maps_results_into_hits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("x-api-key", "exa-test"))
        .and(body_json(json!({
            "query": "GPT repository stars site:github.com",
            "numResults": 10,
            "startPublishedDate": "2025-06-01",
            "endPublishedDate": "2025-06-08",
            "contents": {"text": true, "highlights": true}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "requestId": "req-42",
            "results": [
                {
                    "id": "https://github.com/openai/gpt-2",
                    "url": "https://github.com/openai/gpt-2",
                    "title": "openai/gpt-2",
                    "text": "Code for the paper",
                    "highlights": ["Language Models are Unsupervised Multitask Learners"],
                    "publishedDate": "2025-06-03T00:00:00.000Z",
                    "author": "openai",
                    "score": 0.31
                },
                {"url": "https://github.com/karpathy/nanoGPT"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ExaApi::new(&server.uri(), "exa-test").unwrap();
    let hits = api
        .search_and_contents(&request("GPT repository stars site:github.com"))
        .await
        .unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title.as_deref(), Some("openai/gpt-2"));
    assert_eq!(hits[0].highlights.len(), 1);
    assert_eq!(hits[0].published_date.as_deref(), Some("2025-06-03T00:00:00.000Z"));
    assert_eq!(hits[1].url, "https://github.com/karpathy/nanoGPT");
    assert_eq!(hits[1].text, None);
}

#[tokio::test]
async fn rejected_requests_become_search_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid API key"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = ExaApi::new(&server.uri(), "wrong").unwrap();
    let err = api.search_and_contents(&request("LLM")).await.unwrap_err();
    match err {
        RecentError::Search(msg) => assert!(msg.contains("Invalid API key"), "{msg}"),
        other => panic!("expected search error, got {other:?}"),
    }
}

#[test]
fn empty_key_is_rejected_up_front() {
    let err = ExaApi::new("https://api.exa.ai", "").err().expect("must fail");
    assert!(err.is_config());
}
