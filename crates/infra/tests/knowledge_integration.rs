//! Knowledge base operations against a mocked Table API

mod support;

use serde_json::json;
use snowgate_domain::CreateKbArticleRequest;
use support::{basic_client, hits, result};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer};

const KB: &str = "/api/now/table/kb_knowledge";

#[tokio::test]
async fn search_matches_title_or_body_with_display_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(KB))
        .and(query_param("sysparm_query", "short_descriptionLIKEvpn^ORtextLIKEvpn"))
        .and(query_param("sysparm_display_value", "true"))
        .and(query_param("sysparm_limit", "50"))
        .respond_with(result(json!([
            { "sys_id": "kb-1", "short_description": "VPN setup" },
            { "sys_id": "kb-2", "short_description": "VPN drops" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let articles = basic_client(&server).search_knowledge("vpn", None).await.unwrap();

    let ids: Vec<&str> = articles.iter().map(|article| article.sys_id.as_str()).collect();
    assert_eq!(ids, ["kb-1", "kb-2"]);
}

#[tokio::test]
async fn get_article_prefers_number() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(KB))
        .and(query_param("sysparm_query", "number=KB0010002"))
        .respond_with(result(json!([{ "sys_id": "kb-2", "number": "KB0010002" }])))
        .expect(1)
        .mount(&server)
        .await;

    let article =
        basic_client(&server).get_kb_article(Some("kb-old"), Some("KB0010002")).await.unwrap();

    assert_eq!(article.sys_id, "kb-2");
    assert_eq!(hits(&server, &format!("{KB}/kb-old")).await, 0);
}

#[tokio::test]
async fn create_without_author_sends_nothing() {
    let server = MockServer::start().await;
    let request = CreateKbArticleRequest::new("Reset MFA", "Steps...", "kb-it", "");

    let err = basic_client(&server).create_kb_article(&request).await.unwrap_err();

    assert_eq!(err.message, "Missing required parameters: author");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
