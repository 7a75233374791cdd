//! Integration tests for the HTTP clients using mockito for HTTP mocking.

use mockito::{Matcher, Server};
use serde_json::json;
use trip_planner::client::{AsyncOllamaClient, AsyncSearchClient, LanguageModel, WebSearch};
use trip_planner::error::ApiError;
use trip_planner::{DuckDuckGoClient, OllamaClient};

fn ollama(base_url: &str) -> OllamaClient {
    OllamaClient::with_endpoint(
        format!("{}/v1/chat/completions", base_url),
        "llama3.2".to_string(),
    )
}

#[test]
fn test_chat_completion() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama3.2",
            "stream": false,
            "messages": [
                {"role": "system", "content": "Be brief."},
                {"role": "user", "content": "Plan Paris"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "  Day 1 - Louvre\nTERMINATE  "},
                "finish_reason": "stop"
            }]
        }"#,
        )
        .create();

    let client = ollama(&server.url());
    let reply = client.chat("Be brief.", "Plan Paris").unwrap();

    mock.assert();
    assert_eq!(reply, "Day 1 - Louvre\nTERMINATE");
    assert_eq!(client.metrics().llm_completions_total(), 1);
    assert_eq!(client.metrics().http_requests_total(), 1);
}

#[test]
fn test_chat_empty_choices() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices": []}"#)
        .create();

    let result = ollama(&server.url()).chat("sys", "prompt");
    assert!(matches!(result, Err(ApiError::EmptyResponse(_))));
}

#[test]
fn test_chat_unknown_model() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(404)
        .with_body(r#"{"error": "model \"llama3.2\" not found"}"#)
        .create();

    let client = ollama(&server.url());
    match client.chat("sys", "prompt") {
        Err(ApiError::NotFound(message)) => assert!(message.contains("not found")),
        other => panic!("Expected NotFound error, got: {:?}", other),
    }
    assert_eq!(client.metrics().http_errors_total(), 1);
}

#[test]
fn test_chat_server_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("model runner crashed")
        .create();

    match ollama(&server.url()).chat("sys", "prompt") {
        Err(ApiError::ApiError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "model runner crashed");
        }
        other => panic!("Expected ApiError, got: {:?}", other),
    }
}

#[test]
fn test_search_instant_answer() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "eiffel tower".into()),
            Matcher::UrlEncoded("format".into(), "json".into()),
            Matcher::UrlEncoded("no_html".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/x-javascript")
        .with_body(
            r#"{
            "Heading": "Eiffel Tower",
            "AbstractText": "The Eiffel Tower is a wrought-iron lattice tower in Paris.",
            "AbstractURL": "https://en.wikipedia.org/wiki/Eiffel_Tower",
            "RelatedTopics": [
                {"Text": "Champ de Mars A large public green-space in Paris", "FirstURL": "https://duckduckgo.com/Champ_de_Mars"},
                {"Text": "Trocadero Gardens across the Seine", "FirstURL": "https://duckduckgo.com/Trocadero"}
            ]
        }"#,
        )
        .create();

    let client = DuckDuckGoClient::with_base_url(server.url());
    let hits = client.search("eiffel tower", 2).unwrap();

    mock.assert();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title, "Eiffel Tower");
    assert_eq!(hits[0].url, "https://en.wikipedia.org/wiki/Eiffel_Tower");
    assert_eq!(hits[1].title, "Champ de Mars");
    assert_eq!(hits[1].snippet, "A large public green-space in Paris");
}

#[test]
fn test_search_rate_limited() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(429)
        .create();

    let client = DuckDuckGoClient::with_base_url(server.url());
    let result = client.search("paris", 2);

    assert!(matches!(result, Err(ApiError::RateLimitExceeded)));
    assert_eq!(client.metrics().http_errors_total(), 1);
}

#[test]
fn test_search_invalid_json() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>blocked</html>")
        .create();

    let result = DuckDuckGoClient::with_base_url(server.url()).search("paris", 2);
    assert!(matches!(result, Err(ApiError::JsonError(_))));
}

#[test]
fn test_connection_refused() {
    let client = DuckDuckGoClient::with_base_url("http://127.0.0.1:1".to_string());
    assert!(client.search("paris", 2).is_err());
}

#[tokio::test]
async fn test_async_wrappers() {
    let mut server = Server::new_async().await;

    let _search = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"RelatedTopics": [{"Text": "Alfama Old quarter", "FirstURL": "https://duckduckgo.com/Alfama"}]}"#)
        .create_async()
        .await;
    let _chat = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices": [{"message": {"content": "Day 1"}}]}"#)
        .create_async()
        .await;

    let search = AsyncSearchClient::new(DuckDuckGoClient::with_base_url(server.url()));
    let hits = search.search("lisbon", 3).await.unwrap();
    assert_eq!(hits[0].title, "Alfama");

    let model = AsyncOllamaClient::new(ollama(&server.url()));
    assert_eq!(model.complete("sys", "prompt").await.unwrap(), "Day 1");
}
