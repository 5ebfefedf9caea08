//! End-to-end tests of `Fetcher` over `HyperClient`, against wiremock.

use assert2::{check, let_assert};
use fetcher::middleware::{ConcurrencyLimitLayer, LoggingLayer};
use fetcher::{Error, Fetcher, Form, HyperClient, Payload, RequestOptions, query_string};
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

#[tokio::test]
async fn json_response_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "John"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = Fetcher::new(&server.uri()).expect("fetcher");
    let payload = api.path(["users", "1"]).call().await.expect("payload");

    check!(payload == Payload::Json(json!({"id": 1, "name": "John"})));
}

#[tokio::test]
async fn typed_fetch_with_json_body() {
    let server = MockServer::start().await;
    let input = User {
        id: 0,
        name: "Bob".to_string(),
    };
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&input))
        .respond_with(ResponseTemplate::new(201).set_body_json(User {
            id: 42,
            name: "Bob".to_string(),
        }))
        .expect(1)
        .mount(&server)
        .await;

    let api = Fetcher::new(&server.uri()).expect("fetcher");
    let created: User = api
        .path(["users"])
        .fetch(RequestOptions::post().json(&input).expect("json"))
        .await
        .expect("user");

    check!(created.id == 42);
}

#[tokio::test]
async fn text_response_is_returned_unchanged() {
    let server = MockServer::start().await;
    Mock::given(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Plain text response"))
        .mount(&server)
        .await;

    let api = Fetcher::new(&server.uri()).expect("fetcher");
    let payload = api.path(["status"]).call().await.expect("payload");

    check!(payload == Payload::Text("Plain text response".to_string()));
}

#[tokio::test]
async fn no_content_yields_absence_marker() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(204).insert_header("content-type", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let api = Fetcher::new(&server.uri()).expect("fetcher");
    let endpoint = api.path(["users", "1"]);

    let payload = endpoint.send(RequestOptions::delete()).await.expect("payload");
    check!(payload.is_no_content());
}

#[tokio::test]
async fn no_content_deserializes_as_none() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let api = Fetcher::new(&server.uri()).expect("fetcher");
    let updated: Option<User> = api
        .path(["users", "1"])
        .fetch(RequestOptions::put())
        .await
        .expect("payload");

    check!(updated.is_none());
}

#[tokio::test]
async fn error_message_comes_from_body() {
    let server = MockServer::start().await;
    Mock::given(path("/users/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "User not found"})))
        .mount(&server)
        .await;

    let api = Fetcher::new(&server.uri()).expect("fetcher");
    let result = api.path(["users", "999"]).call().await;

    let_assert!(Err(Error::Api(error)) = result);
    check!(error.status() == 404);
    check!(error.message() == "User not found");
    check!(error.url() == format!("{}/users/999", server.uri()));
    check!(error.is_client_error());
    check!(!error.is_server_error());
    check!(error.log().contains("\"message\": \"User not found\""));
}

#[tokio::test]
async fn error_message_falls_back_to_status_text() {
    let server = MockServer::start().await;
    Mock::given(path("/admin"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"code": 42})))
        .mount(&server)
        .await;

    let api = Fetcher::new(&server.uri()).expect("fetcher");
    let result = api.path(["admin"]).call().await;

    let_assert!(Err(error) = result);
    check!(error.is_forbidden());
    let_assert!(Some(api_error) = error.as_api());
    check!(api_error.message() == "Forbidden");
    check!(api_error.info() == Some(&json!({"code": 42})));
}

#[tokio::test]
async fn text_error_is_kept_as_info() {
    let server = MockServer::start().await;
    Mock::given(path("/crash"))
        .respond_with(ResponseTemplate::new(500).set_body_string("stack overflow"))
        .mount(&server)
        .await;

    let api = Fetcher::new(&server.uri()).expect("fetcher");
    let result = api.path(["crash"]).call().await;

    let_assert!(Err(Error::Api(error)) = result);
    check!(error.is_server_error());
    check!(error.message() == "Internal Server Error");
    check!(error.log() == "stack overflow");
}

#[tokio::test]
async fn default_headers_are_sent_and_overridable() {
    let server = MockServer::start().await;
    Mock::given(header("X-Custom", "value"))
        .and(header("Content-Type", "text/csv"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let api = Fetcher::new(&server.uri())
        .expect("fetcher")
        .with_default_header("X-Custom", "value");
    api.path(["import"])
        .send(
            RequestOptions::post()
                .header("content-type", "text/csv")
                .text("a,b"),
        )
        .await
        .expect("payload");

    let requests = server.received_requests().await.expect("recording");
    let_assert!([request] = requests.as_slice());
    check!(request.headers.get_all("content-type").iter().count() == 1);
}

#[tokio::test]
async fn query_segment_is_preserved() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/users"))
        .and(query_param("page", "2"))
        .and(query_param("tag", "a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    #[derive(Serialize)]
    struct Query {
        page: u32,
        tag: Vec<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        search: Option<String>,
    }
    let query = query_string(&Query {
        page: 2,
        tag: vec!["a", "b"],
        search: None,
    })
    .expect("query");

    let api = Fetcher::new(&format!("{}/", server.uri())).expect("fetcher");
    let endpoint = api.path(["api", "v1/", "users", query.as_str()]);
    check!(endpoint.pathname() == "/api/v1/users?page=2&tag=a&tag=b");

    let payload = endpoint.call().await.expect("payload");
    check!(payload == Payload::Json(json!([])));
}

#[tokio::test]
async fn multipart_fetcher_sends_boundary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents"))
        .and(header("Content-Type", "multipart/form-data; boundary=test-boundary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "doc-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let form = Form::with_boundary("test-boundary")
        .text("title", "Quarterly report")
        .file("file", "report.txt", b"hello".to_vec());

    let uploads = Fetcher::new_multipart(&server.uri()).expect("fetcher");
    let payload = uploads
        .path(["documents"])
        .send(RequestOptions::post().multipart(form))
        .await
        .expect("payload");

    check!(payload.as_json() == Some(&json!({"id": "doc-1"})));

    let requests = server.received_requests().await.expect("recording");
    let_assert!([request] = requests.as_slice());
    let body = String::from_utf8_lossy(&request.body);
    check!(body.contains("name=\"title\"\r\n\r\nQuarterly report\r\n"));
    check!(body.contains("filename=\"report.txt\""));
    check!(body.ends_with("--test-boundary--\r\n"));
}

#[tokio::test]
async fn form_body_is_url_encoded() {
    let server = MockServer::start().await;
    Mock::given(header("Content-Type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let api = Fetcher::new_multipart(&server.uri()).expect("fetcher");
    api.path(["login"])
        .send(
            RequestOptions::post()
                .form(&[("user", "ada"), ("pass", "p w")])
                .expect("form"),
        )
        .await
        .expect("payload");

    let requests = server.received_requests().await.expect("recording");
    let_assert!([request] = requests.as_slice());
    check!(request.body == b"user=ada&pass=p+w");
}

#[tokio::test]
async fn redirect_is_followed_to_final_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"moved": true})))
        .expect(1)
        .mount(&server)
        .await;

    let api = Fetcher::new(&server.uri()).expect("fetcher");
    let payload = api.path(["old"]).call().await.expect("payload");

    check!(payload == Payload::Json(json!({"moved": true})));
}

#[tokio::test]
async fn see_other_after_post_is_fetched_with_get() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(303).insert_header("Location", "/orders/7"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let api = Fetcher::new(&server.uri()).expect("fetcher");
    let payload = api
        .path(["orders"])
        .send(RequestOptions::post().json(&json!({"item": "book"})).expect("json"))
        .await
        .expect("payload");

    check!(payload == Payload::Json(json!({"id": 7})));
}

#[tokio::test]
async fn redirect_is_an_api_error_when_following_is_disabled() {
    let server = MockServer::start().await;
    Mock::given(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HyperClient::builder().max_redirects(0).build();
    let api = Fetcher::json(client, &server.uri()).expect("fetcher");
    let result = api.path(["old"]).call().await;

    let_assert!(Err(Error::Api(error)) = result);
    check!(error.status() == 302);
    check!(error.message() == "Found");
}

#[tokio::test]
async fn fetcher_over_layered_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
        .expect(3)
        .mount(&server)
        .await;

    let client = HyperClient::builder()
        .layer(LoggingLayer::new())
        .layer(ConcurrencyLimitLayer::new(2))
        .build();
    let api = Fetcher::json(client, &server.uri()).expect("fetcher");

    for _ in 0..3 {
        let payload = api.path(["items"]).call().await.expect("payload");
        check!(payload == Payload::Json(json!([1, 2])));
    }
}
