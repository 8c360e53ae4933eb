// HTTP runner and configuration source tests against a mock upstream
// Author: kelexine (https://github.com/kelexine)

use mockito::Matcher;
use promptgate::config::ModelConfig;
use promptgate::error::{GatewayError, SubsystemError};
use promptgate::models::GenerationParams;
use promptgate::remote_config::{ConfigSource, HttpConfigSource};
use promptgate::runner::{HttpModelRunner, ModelRunner};
use serde_json::json;
use std::time::Duration;

const PARAMS: GenerationParams = GenerationParams {
    temperature: 0.3,
    max_tokens: 256,
};

fn runner_for(server: &mockito::Server, max_retries: u32) -> HttpModelRunner {
    let config = ModelConfig {
        endpoint: format!("{}/api/generate", server.url()),
        api_key: Some("secret-key".to_string()),
        timeout_seconds: 5,
        max_retries,
        ..ModelConfig::default()
    };
    HttpModelRunner::new(&config).unwrap()
}

fn config_source_for(server: &mockito::Server) -> HttpConfigSource {
    HttpConfigSource::new(&format!("{}/", server.url()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_runner_posts_params_and_extracts_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_header("authorization", "Bearer secret-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "m1",
            "prompt": "Explain X",
            "temperature": 0.3,
            "max_tokens": 256,
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response":"X is a letter","done":true}"#)
        .create_async()
        .await;

    let runner = runner_for(&server, 0);
    let text = runner.run("m1", "Explain X", &PARAMS).await.unwrap();

    assert_eq!(text, "X is a letter");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_runner_accepts_plain_text_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("just text")
        .create_async()
        .await;

    let runner = runner_for(&server, 0);
    assert_eq!(runner.run("m1", "p", &PARAMS).await.unwrap(), "just text");
}

#[tokio::test]
async fn test_runner_retries_transient_failures() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(503)
        .with_header("retry-after", "0")
        .with_body("warming up")
        .expect(3)
        .create_async()
        .await;

    let runner = runner_for(&server, 2);
    let err = runner.run("m1", "p", &PARAMS).await.unwrap_err();

    match err {
        GatewayError::UpstreamFailure(msg) => {
            assert!(msg.contains("503"), "unexpected message: {}", msg);
            assert!(msg.contains("warming up"));
        }
        other => panic!("expected upstream failure, got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_runner_does_not_retry_client_errors() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(400)
        .with_body("unknown model")
        .expect(1)
        .create_async()
        .await;

    let runner = runner_for(&server, 3);
    let err = runner.run("nope", "p", &PARAMS).await.unwrap_err();

    assert!(matches!(err, GatewayError::UpstreamFailure(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_config_source_loads_object() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/generation")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"temperature":0.2,"maxTokens":64,"model_aliases":{"fast":"m-small"}}"#)
        .create_async()
        .await;

    let source = config_source_for(&server);
    assert!(!source.base_url().ends_with('/'));

    let document = source.load("generation").await.unwrap();
    assert_eq!(document.temperature(), Some(0.2));
    assert_eq!(document.max_tokens(), Some(64));
    assert_eq!(
        document.model_aliases().get("fast").map(String::as_str),
        Some("m-small")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_config_source_missing_document_degrades() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/generation")
        .with_status(404)
        .create_async()
        .await;

    let err = config_source_for(&server).load("generation").await.unwrap_err();
    assert!(matches!(err, SubsystemError::DegradedConfig(_)));
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_config_source_rejects_malformed_and_non_object() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/broken")
        .with_status(200)
        .with_body("{not json")
        .create_async()
        .await;
    server
        .mock("GET", "/list")
        .with_status(200)
        .with_body("[1,2,3]")
        .create_async()
        .await;

    let source = config_source_for(&server);
    assert!(matches!(
        source.load("broken").await,
        Err(SubsystemError::DegradedConfig(_))
    ));
    assert!(matches!(
        source.load("list").await,
        Err(SubsystemError::DegradedConfig(_))
    ));
}

#[tokio::test]
async fn test_unreachable_config_store_degrades() {
    // Nothing listens on port 9 of the loopback interface
    let source = HttpConfigSource::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    let err = source.load("generation").await.unwrap_err();
    assert_eq!(err.label(), "config");
}
