//! Integration tests for RegisterClient.
//!
//! Uses wiremock for HTTP mocking. The client is blocking, so every call runs on
//! `spawn_blocking`. Tests cover query/header shape, first-match selection, status
//! mapping and the timeout path.

use std::time::Duration;

use codecheck_core::register::{
    RegisterClient, RegisterConfig, RegisterLookup, RegisterOutcome, UnavailableReason,
    REGISTER_USER_AGENT,
};
use codecheck_core::RegisterError;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(mock_server: &MockServer) -> RegisterConfig {
    RegisterConfig::default()
        .with_url(format!("{}/repos/codecheckers/register/issues", mock_server.uri()))
        .with_timeout_secs(1)
}

async fn search(config: RegisterConfig, certificate: &'static str) -> RegisterOutcome {
    tokio::task::spawn_blocking(move || {
        let client = RegisterClient::new(config).expect("failed to create client");
        client.search(certificate)
    })
    .await
    .expect("blocking task panicked")
}

fn listing() -> serde_json::Value {
    json!([
        {"number": 10, "title": "CODECHECK 2023-002: Another paper", "state": "open",
         "assignees": [{"login": "a"}], "html_url": "https://example.org/10"},
        {"number": 11, "title": "Certificate 2023-001 | First", "state": "closed",
         "assignees": [], "html_url": "https://example.org/11"},
        {"number": 12, "title": "Certificate 2023-001 | Second", "state": "open",
         "assignees": [{"login": "b"}], "html_url": "https://example.org/12"}
    ])
}

#[tokio::test]
async fn test_search_returns_first_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/codecheckers/register/issues"))
        .and(query_param("state", "all"))
        .and(query_param("per_page", "100"))
        .and(header("user-agent", REGISTER_USER_AGENT))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .mount(&mock_server)
        .await;

    match search(config_for(&mock_server), "2023-001").await {
        RegisterOutcome::Matched(issue) => {
            assert_eq!(issue.number, 11);
            assert!(issue.is_closed());
            assert!(issue.assignees.is_empty());
        }
        other => panic!("expected match, got {other:?}"),
    }
}

#[tokio::test]
async fn test_search_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/codecheckers/register/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .mount(&mock_server)
        .await;

    assert_eq!(
        search(config_for(&mock_server), "2023-999").await,
        RegisterOutcome::NotFound
    );
}

#[tokio::test]
async fn test_token_sent_as_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server).with_token("test-token");
    assert_eq!(search(config, "2023-001").await, RegisterOutcome::NotFound);
}

#[tokio::test]
async fn test_server_error_is_transport_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    match search(config_for(&mock_server), "2023-001").await {
        RegisterOutcome::CheckUnavailable {
            reason: UnavailableReason::Transport(message),
        } => assert!(message.contains("503"), "{message}"),
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_unexpected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "rate limited"})))
        .mount(&mock_server)
        .await;

    let outcome = search(config_for(&mock_server), "2023-001").await;
    assert!(matches!(
        outcome,
        RegisterOutcome::CheckUnavailable {
            reason: UnavailableReason::Unexpected(_)
        }
    ));
}

#[tokio::test]
async fn test_slow_register_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    assert_eq!(
        search(config_for(&mock_server), "2023-001").await,
        RegisterOutcome::CheckUnavailable {
            reason: UnavailableReason::Timeout
        }
    );
}

#[tokio::test]
async fn test_list_issues_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let result = tokio::task::spawn_blocking(move || {
        RegisterClient::new(config)
            .expect("failed to create client")
            .list_issues()
    })
    .await
    .expect("blocking task panicked");

    let err = result.unwrap_err();
    assert!(matches!(err, RegisterError::Status { status: 404 }));
    assert!(err.is_transport());
}

#[test]
fn test_unreachable_register_is_transport_unavailable() {
    // Nothing listens on port 9 (discard) in the test environment.
    let config = RegisterConfig::default()
        .with_url("http://127.0.0.1:9/issues")
        .with_timeout_secs(2);
    let client = RegisterClient::new(config).unwrap();
    assert!(matches!(
        client.search("2023-001"),
        RegisterOutcome::CheckUnavailable {
            reason: UnavailableReason::Transport(_) | UnavailableReason::Timeout
        }
    ));
}
