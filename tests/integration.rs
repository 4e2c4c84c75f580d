//! Integration tests for gh-namecheck

use gh_namecheck::{
    checker::{AvailabilityProbe, GithubChecker},
    session::CheckSession,
    types::{Availability, Category, CheckConfig, SessionState},
    NameCheckError,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> CheckConfig {
    CheckConfig {
        base_url: server.uri(),
        timeout: Duration::from_millis(500),
        ..Default::default()
    }
}

async fn mount_status(server: &MockServer, name: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(format!("/{}", name)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_not_found_means_available() {
    let server = MockServer::start().await;
    mount_status(&server, "freshname", 404).await;

    let checker = GithubChecker::with_config(&config_for(&server)).unwrap();
    let result = checker.check("freshname").await;
    assert_eq!(result.candidate, "freshname");
    assert_eq!(result.availability, Availability::Available);
    assert!(result.duration.is_some());
}

#[tokio::test]
async fn test_other_statuses_mean_unavailable() {
    let server = MockServer::start().await;
    mount_status(&server, "octocat", 200).await;
    mount_status(&server, "moved", 301).await;
    mount_status(&server, "limited", 429).await;
    mount_status(&server, "broken", 500).await;

    let checker = GithubChecker::with_config(&config_for(&server)).unwrap();
    for name in ["octocat", "moved", "limited", "broken"] {
        let result = checker.check(name).await;
        assert_eq!(result.availability, Availability::Unavailable, "{}", name);
    }
}

#[tokio::test]
async fn test_redirects_are_not_followed() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/renamed"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/gone"))
        .mount(&server)
        .await;
    mount_status(&server, "gone", 404).await;

    let checker = GithubChecker::with_config(&config_for(&server)).unwrap();
    let result = checker.check("renamed").await;
    assert_eq!(result.availability, Availability::Unavailable);
}

#[tokio::test]
async fn test_timeout_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/slowpoke"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let checker = GithubChecker::with_config(&config_for(&server)).unwrap();
    let result = checker.check("slowpoke").await;
    match result.availability {
        Availability::Error(message) => assert!(!message.is_empty()),
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_session_against_mock_server() {
    let server = MockServer::start().await;
    mount_status(&server, "taken1", 200).await;
    mount_status(&server, "free1", 404).await;
    mount_status(&server, "taken2", 200).await;

    let config = CheckConfig {
        concurrency: 2,
        ..config_for(&server)
    };
    let mut session = CheckSession::github(&config).unwrap();

    let candidates = vec!["taken1".to_string(), "free1".to_string(), "taken2".to_string()];
    let mut fractions = Vec::new();
    let summary = session
        .run(candidates, |event| fractions.push(event.fraction()))
        .await
        .unwrap();

    let results = session.results();
    assert_eq!(results.available, vec!["free1"]);
    assert_eq!(results.unavailable, vec!["taken1", "taken2"]);
    assert!(results.errors.is_empty());
    assert_eq!(summary.processed, 3);
    assert_eq!(fractions.last().copied(), Some(1.0));
    assert_eq!(session.state(), SessionState::Stopped);
}

#[tokio::test]
async fn test_session_records_unreachable_host_as_error() {
    let config = CheckConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let checker: Arc<dyn AvailabilityProbe> = Arc::new(GithubChecker::with_config(&config).unwrap());
    let mut session = CheckSession::with_config(checker, &config).unwrap();

    let summary = session.run(vec!["x1".to_string()], |_| {}).await.unwrap();
    assert_eq!(summary.errors, 1);

    let lines = session.results().lines(Category::Errors);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("x1: "));
}

#[tokio::test]
async fn test_export_after_session() {
    let server = MockServer::start().await;
    mount_status(&server, "a", 200).await;
    mount_status(&server, "b", 404).await;

    let mut session = CheckSession::github(&config_for(&server)).unwrap();
    session
        .run(vec!["a".to_string(), "b".to_string()], |_| {})
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let results = session.results();
    let available = dir.path().join("available.txt");
    assert_eq!(results.export(Category::Available, &available).unwrap(), 1);
    assert_eq!(std::fs::read_to_string(&available).unwrap(), "b\n");

    let err = results
        .export(Category::Errors, &dir.path().join("errors.txt"))
        .unwrap_err();
    assert!(matches!(err, NameCheckError::EmptyCategory { .. }));
    assert!(!dir.path().join("errors.txt").exists());
}

#[test]
fn test_library_initialization() {
    // Test that the library can be initialized without panicking
    let result = gh_namecheck::init();
    assert!(result.is_ok());
}
