//! Problem operations against a mocked Table API

mod support;

use serde_json::json;
use snowgate_domain::CreateProblemRequest;
use support::{basic_client, bodies, result};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer};

#[tokio::test]
async fn link_with_a_blank_id_sends_nothing() {
    let server = MockServer::start().await;
    let client = basic_client(&server);

    for ids in [vec!["inc-1", ""], vec!["inc-1", "  "], vec![]] {
        let ids: Vec<String> = ids.into_iter().map(String::from).collect();
        let err = client.link_incidents_to_problem("prb-1", &ids).await.unwrap_err();

        assert_eq!(err.code_str(), Some("MISSING_PARAMETER"), "{ids:?}");
        assert!(err.message.contains("incident_ids"));
    }

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn create_without_description_sends_nothing() {
    let server = MockServer::start().await;

    let err =
        basic_client(&server).create_problem(&CreateProblemRequest::default()).await.unwrap_err();

    assert_eq!(err.message, "Missing required parameters: short_description");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn resolve_omits_blank_workaround() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/now/table/problem/prb-1"))
        .respond_with(result(json!({ "sys_id": "prb-1", "state": "5" })))
        .expect(2)
        .mount(&server)
        .await;

    let client = basic_client(&server);
    client.resolve_problem("prb-1", "Expired certificate", Some(" ")).await.unwrap();
    client.resolve_problem("prb-1", "Expired certificate", Some("Restart the proxy")).await.unwrap();

    let sent = bodies(&server, "/api/now/table/problem/prb-1").await;
    assert_eq!(sent[0]["state"], "5");
    assert_eq!(sent[0]["root_cause"], "Expired certificate");
    assert!(sent[0]["resolved_at"].as_str().is_some_and(|at| at.contains('T')));
    assert!(sent[0].get("workaround").is_none());
    assert_eq!(sent[1]["workaround"], "Restart the proxy");
}
