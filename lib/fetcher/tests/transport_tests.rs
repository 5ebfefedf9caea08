//! Integration tests for `HyperClient` using wiremock.

use std::time::Duration;

use assert2::{check, let_assert};
use fetcher::middleware::{ConcurrencyLimitLayer, LoggingLayer};
use fetcher::{DEFAULT_USER_AGENT, Error, HttpClient, HyperClient, Method, Request};
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string, header, method, path},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

fn url(server: &MockServer, pathname: &str) -> url::Url {
    url::Url::parse(&format!("{}{pathname}", server.uri())).expect("url")
}

#[tokio::test]
async fn test_get_request() {
    let mock_server = MockServer::start().await;
    let user = User {
        id: 1,
        name: "Alice".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&user))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, url(&mock_server, "/users/1"))
        .header("Accept", "application/json")
        .build();

    let response = client.execute(request).await.expect("response");

    check!(response.is_success());
    check!(response.is_json());
    let body: User = response.json().expect("json");
    check!(body == user);
}

#[tokio::test]
async fn test_post_request_with_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/echo"))
        .and(header("Content-Type", "text/plain"))
        .and(body_string("hello"))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Post, url(&mock_server, "/echo"))
        .header("Content-Type", "text/plain")
        .body(bytes::Bytes::from_static(b"hello"))
        .build();

    let response = client.execute(request).await.expect("response");

    check!(response.status() == 201);
    check!(response.text() == "created");
}

#[tokio::test]
async fn test_error_status_is_not_a_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, url(&mock_server, "/down")).build();

    let response = client.execute(request).await.expect("response");

    check!(response.status() == 503);
    check!(response.status_text() == "Service Unavailable");
    check!(response.text() == "maintenance");
}

#[tokio::test]
async fn test_default_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(header("User-Agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, url(&mock_server, "/")).build();

    let response = client.execute(request).await.expect("response");
    check!(response.status() == 200);
}

#[tokio::test]
async fn test_custom_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(header("User-Agent", "dashboard/1.0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder().user_agent("dashboard/1.0").build();
    let request = Request::builder(Method::Get, url(&mock_server, "/")).build();

    let response = client.execute(request).await.expect("response");
    check!(response.status() == 200);
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .timeout(Duration::from_millis(50))
        .build();
    let request = Request::builder(Method::Get, url(&mock_server, "/slow")).build();

    let result = client.execute(request).await;

    let_assert!(Err(error) = result);
    check!(error.is_timeout());
}

#[tokio::test]
async fn test_connection_refused() {
    let client = HyperClient::builder()
        .connect_timeout(Duration::from_secs(1))
        .build();
    let target = url::Url::parse("http://127.0.0.1:1/").expect("url");

    let result = client.execute(Request::builder(Method::Get, target).build()).await;

    let_assert!(Err(Error::Connection(_)) = result);
}

#[tokio::test]
async fn test_layers_wrap_transport() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/layered"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .layer(LoggingLayer::debug())
        .layer(ConcurrencyLimitLayer::new(1))
        .build();

    for _ in 0..2 {
        let request = Request::builder(Method::Get, url(&mock_server, "/layered")).build();
        let response = client.execute(request).await.expect("response");
        check!(response.text() == "ok");
    }
}
