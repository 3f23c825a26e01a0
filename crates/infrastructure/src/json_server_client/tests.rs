use csrd_core::AppError;
use reqwest::Method;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::JsonServerClient;

fn client(server: &MockServer) -> JsonServerClient {
    let base_url = Url::parse(&server.uri()).unwrap_or_else(|_| unreachable!());
    JsonServerClient::new(reqwest::Client::new(), base_url)
}

#[test]
fn endpoint_encodes_segments_under_base_path() {
    let base_url = Url::parse("http://localhost:3000/api/").unwrap_or_else(|_| unreachable!());
    let client = JsonServerClient::new(reqwest::Client::new(), base_url);

    let url = client
        .endpoint(&["forms", "a b"])
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(url.as_str(), "http://localhost:3000/api/forms/a%20b");
}

#[tokio::test]
async fn non_success_status_becomes_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forms"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let url = client.endpoint(&["forms"]).unwrap_or_else(|_| unreachable!());
    let result = client.get::<Value>(url).await;

    assert_eq!(result, Err(AppError::Http(500)));
    assert_eq!(
        result.err().map(|error| error.user_message()),
        Some("Erreur HTTP: 500".to_owned())
    );
}

#[tokio::test]
async fn find_maps_not_found_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forms/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server);
    let url = client
        .endpoint(&["forms", "missing"])
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(client.find::<Value>(url).await, Ok(None));
}

#[tokio::test]
async fn find_keeps_other_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forms/1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client(&server);
    let url = client
        .endpoint(&["forms", "1"])
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(client.find::<Value>(url).await, Err(AppError::Http(503)));
}

#[tokio::test]
async fn send_posts_json_body_and_decodes_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/declarations"))
        .and(body_json(json!({"status": "draft"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let url = client
        .endpoint(&["declarations"])
        .unwrap_or_else(|_| unreachable!());
    let stored: Value = client
        .send(Method::POST, url, &json!({"status": "draft"}))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(stored, json!({"id": 9}));
}

#[tokio::test]
async fn undecodable_body_is_internal_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forms"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client(&server);
    let url = client.endpoint(&["forms"]).unwrap_or_else(|_| unreachable!());

    assert!(matches!(
        client.get::<Value>(url).await,
        Err(AppError::Internal(_))
    ));
}
