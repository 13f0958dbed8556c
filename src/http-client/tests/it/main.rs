#![deny(rust_2018_idioms)]

use http_client::{Error, HttpClient, StatusCode};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

#[tokio::test]
async fn test_get_json_decodes_body_and_sends_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/marine"))
        .and(query_param("hours", "24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hours": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let body: Value = HttpClient::new()
        .get_json(format!("{}/marine", server.uri()), Some(&[("hours", "24")]))
        .await
        .unwrap();

    assert_eq!(body, json!({ "hours": [] }));
}

#[tokio::test]
async fn test_non_success_status_is_an_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = HttpClient::new()
        .get_json::<Value>(server.uri(), None::<&()>)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(err.body(), Some("maintenance"));
}

#[tokio::test]
async fn test_undecodable_body_is_a_body_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = HttpClient::new()
        .get_json::<Value>(server.uri(), None::<&()>)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Body { .. }));
}

#[tokio::test]
async fn test_transient_failures_are_retried_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
        .mount(&server)
        .await;

    let body: Vec<i32> = HttpClient::builder()
        .max_retries(2)
        .build()
        .unwrap()
        .get_json(server.uri(), None::<&()>)
        .await
        .unwrap();

    assert_eq!(body, vec![1, 2]);
}
