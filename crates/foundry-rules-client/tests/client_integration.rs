//! Client behaviour against a mock platform.

use foundry_rules_client::{Error, FoundryClient, SearchQuery};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ONTOLOGY: &str = "ri.ontology.main.ontology.test";

fn client(server: &MockServer) -> FoundryClient {
    FoundryClient::builder()
        .base_url(server.uri())
        .ontology_rid(ONTOLOGY)
        .token("  abc\n123  ")
        .build()
        .unwrap()
}

fn ontology_path(rest: &str) -> String {
    format!("/api/v2/ontologies/{}/{}", ONTOLOGY, rest)
}

#[tokio::test]
async fn apply_action_posts_parameters_with_clean_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ontology_path("actions/approve-proposal/apply")))
        .and(header("authorization", "Bearer abc123"))
        .and(body_json(json!({"parameters": {"proposal_object": "PROP-1"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"validation": "VALID"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .actions()
        .apply("approve-proposal", json!({"proposal_object": "PROP-1"}))
        .await
        .unwrap();
    assert_eq!(response, json!({"validation": "VALID"}));
}

#[tokio::test]
async fn apply_action_empty_body_is_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ontology_path("actions/reject-proposal/apply")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let response = client(&server)
        .actions()
        .apply("reject-proposal", json!({}))
        .await
        .unwrap();
    assert_eq!(response, json!({}));
}

#[tokio::test]
async fn apply_action_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"errorName":"ActionValidationFailed"}"#),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .actions()
        .apply("create-proposal", json!({}))
        .await
        .unwrap_err();
    match err {
        Error::Api { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("ActionValidationFailed"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn search_follows_page_tokens() {
    let server = MockServer::start().await;
    let search = ontology_path("objectTypes/proposal/search");

    Mock::given(method("POST"))
        .and(path(search.clone()))
        .and(body_json(json!({"pageSize": 2, "select": ["id"]})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [{"id": 1}, {"id": 2}], "nextPageToken": "p2"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(search))
        .and(body_json(json!({"pageSize": 2, "select": ["id"], "pageToken": "p2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": 3}]})))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery {
        page_size: 2,
        filter: None,
        select: vec!["id".to_string()],
    };
    let objects = client(&server).objects().search("proposal", &query).await.unwrap();
    assert_eq!(objects, vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]);
}

#[tokio::test]
async fn get_object_passes_select_and_maps_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ontology_path("objectTypes/rule/objects/RULE-1")))
        .and(query_param("select", "name,logic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "r"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ontology_path("objectTypes/rule/objects/RULE-404")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let objects = client(&server).objects();
    let select = vec!["name".to_string(), "logic".to_string()];

    let found = objects.get("rule", "RULE-1", &select).await.unwrap();
    assert_eq!(found, Some(json!({"name": "r"})));

    let missing = objects.get("rule", "RULE-404", &[]).await.unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn get_object_other_errors_propagate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = client(&server)
        .objects()
        .get("rule", "RULE-1", &[])
        .await
        .unwrap_err();
    assert!(err.is_server_error());
}
