//! GitHub client request and response handling
//!
//! A local `wiremock` server stands in for api.github.com so the exact request
//! shapes (paths, headers, dispatch body) are checked.

use iacdash::app::domain_config::SourceControlLink;
use iacdash::app::github::{GitHubClient, WorkflowApi};
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, token: Option<&str>) -> GitHubClient {
    GitHubClient::new(&server.uri(), token, Duration::from_secs(5)).unwrap()
}

fn link() -> SourceControlLink {
    SourceControlLink {
        owner: "acme".to_string(),
        repo: "infra".to_string(),
        branch: "release".to_string(),
    }
}

#[tokio::test]
async fn test_dispatch_sends_ref_inputs_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/infra/actions/workflows/deploy-gke.yml/dispatches"))
        .and(header("authorization", "Bearer ghp_test"))
        .and(header("accept", "application/vnd.github+json"))
        .and(body_json(json!({
            "ref": "release",
            "inputs": { "clusterName": "prod-gke-1", "region": "us-central1" }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut inputs = BTreeMap::new();
    inputs.insert("clusterName".to_string(), "prod-gke-1".to_string());
    inputs.insert("region".to_string(), "us-central1".to_string());

    client(&server, Some("ghp_test"))
        .dispatch_workflow(&link(), "deploy-gke.yml", &inputs)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_dispatch_error_carries_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/infra/actions/workflows/deploy-gke.yml/dispatches"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .dispatch_workflow(&link(), "deploy-gke.yml", &BTreeMap::new())
        .await
        .unwrap_err();
    assert_eq!(format!("{:#}", err), "GitHub API error 404: Not Found");
}

#[tokio::test]
async fn test_error_without_json_body_uses_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/infra/actions/runs/42"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client(&server, None).get_run(&link(), 42).await.unwrap_err();
    assert_eq!(format!("{:#}", err), "GitHub API error 502: Bad Gateway");
}

#[tokio::test]
async fn test_latest_dispatched_run_filters_by_branch_and_event() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/infra/actions/workflows/deploy-gke.yml/runs"))
        .and(query_param("branch", "release"))
        .and(query_param("event", "workflow_dispatch"))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "workflow_runs": [{
                "id": 9001,
                "html_url": "https://github.com/acme/infra/actions/runs/9001",
                "status": "queued",
                "conclusion": null,
                "created_at": "2026-03-14T09:26:53Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let run = client(&server, None)
        .latest_dispatched_run(&link(), "deploy-gke.yml")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(run.id, 9001);
    assert_eq!(run.status, "queued");
    assert!(!run.is_completed());
    assert!(run.created_at.is_some());
}

#[tokio::test]
async fn test_latest_dispatched_run_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/infra/actions/workflows/deploy-gke.yml/runs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "total_count": 0, "workflow_runs": [] })),
        )
        .mount(&server)
        .await;

    let run = client(&server, None)
        .latest_dispatched_run(&link(), "deploy-gke.yml")
        .await
        .unwrap();
    assert!(run.is_none());
}

#[tokio::test]
async fn test_get_run_reads_conclusion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/infra/actions/runs/9001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9001,
            "html_url": "https://github.com/acme/infra/actions/runs/9001",
            "status": "completed",
            "conclusion": "success",
            "run_number": 17
        })))
        .mount(&server)
        .await;

    let run = client(&server, None).get_run(&link(), 9001).await.unwrap();
    assert!(run.is_completed());
    assert_eq!(run.conclusion.as_deref(), Some("success"));
    assert!(run.created_at.is_none());
}
