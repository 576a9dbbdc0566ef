//! In-process HTTP tests for the axum adapter.

use std::io::Write;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use flate2::write::GzEncoder;
use flate2::Compression;
use tower::ServiceExt;

use apibind::config::ServerConfig;
use apibind::http::X_REQUEST_ID;

mod common;

async fn send(config: ServerConfig, request: Request<Body>) -> Response {
    common::test_server(config)
        .router()
        .oneshot(request)
        .await
        .unwrap()
}

async fn get(uri: &str) -> Response {
    send(
        ServerConfig::default(),
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn content_type(response: &Response) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_hello_default() {
    let response = get("/hello").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "text/plain");
    assert!(response.headers().contains_key(X_REQUEST_ID));
    assert_eq!(body_text(response).await, "Hello world");
}

#[tokio::test]
async fn test_hello_with_message() {
    let response = get("/hello?message=Joe%21").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Hello Joe!");
}

#[tokio::test]
async fn test_hello_rejects_short_and_repeated_messages() {
    let response = get("/hello?message=Jo").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&response), "text/plain");
    assert!(body_text(response).await.starts_with("Error parsing query param 'message'"));

    let response = get("/hello?message=abc&message=def").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response)
        .await
        .contains("Multi value query params 'message' not supported"));
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let request = Request::builder()
        .uri("/hello")
        .header(X_REQUEST_ID, "req-123")
        .body(Body::empty())
        .unwrap();
    let response = send(ServerConfig::default(), request).await;
    assert_eq!(response.headers()[X_REQUEST_ID], "req-123");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = get("/nothing/here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(content_type(&response), "text/plain");
    assert_eq!(body_text(response).await, "Not Found");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/hello")
        .body(Body::empty())
        .unwrap();
    let response = send(ServerConfig::default(), request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_options_answers_with_default_headers() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/anything")
        .body(Body::empty())
        .unwrap();
    let response = send(ServerConfig::default().with_cors(), request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_path_query_header_and_cookie_params() {
    let request = Request::builder()
        .uri("/api/users/42?verbose=true")
        .header("x-token", "secret")
        .header(header::COOKIE, "session=abc; theme=dark")
        .body(Body::empty())
        .unwrap();
    let response = send(ServerConfig::default(), request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/json");

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"id": 42, "verbose": true, "token": "secret", "session": "abc"})
    );
}

#[tokio::test]
async fn test_invalid_params_are_reported_together() {
    let request = Request::builder()
        .uri("/api/users/abc?verbose=maybe")
        .body(Body::empty())
        .unwrap();
    let response = send(ServerConfig::default(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let text = body_text(response).await;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Error parsing path param 'userId'"));
    assert!(lines[1].starts_with("Error parsing query param 'verbose'"));
}

#[tokio::test]
async fn test_wrapped_result_sets_status_headers_and_cookies() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .body(Body::from(r#"{"name":"Ann","age":30}"#))
        .unwrap();
    let response = send(ServerConfig::default(), request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()["location"], "/api/users/7");

    let cookies: Vec<&str> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(cookies, ["created=7", "owner=Ann"]);
    assert_eq!(content_type(&response), "application/json");
}

#[tokio::test]
async fn test_body_failing_schema_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .body(Body::from(r#"{"name":"Ann"}"#))
        .unwrap();
    let response = send(ServerConfig::default(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.starts_with("Error parsing body param 'user'"));
}

#[tokio::test]
async fn test_binary_round_trip() {
    let payload: Vec<u8> = vec![0, 159, 146, 150, 255];
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/files/blob.bin")
        .body(Body::from(payload.clone()))
        .unwrap();
    let response = send(ServerConfig::default(), request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/octet-stream");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(bytes.to_vec(), payload);
}

#[tokio::test]
async fn test_handler_http_error_and_empty_result() {
    let delete = |uri: &str| {
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    };

    let response = send(ServerConfig::default(), delete("/api/users/1")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_text(response).await, "Forbidden");

    let response = send(ServerConfig::default(), delete("/api/users/2")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    assert_eq!(body_text(response).await, "");
}

#[tokio::test]
async fn test_unexpected_failure_is_internal_error() {
    let response = get("/api/explode").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type(&response), "text/plain");
    assert_eq!(body_text(response).await, "Internal Server Error");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = ServerConfig::default();
    config.limits.max_body_bytes = 8;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/echo")
        .body(Body::from("this body is too long"))
        .unwrap();
    let response = send(config, request).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_text_body_echo() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/echo")
        .body(Body::from("plain text"))
        .unwrap();
    let response = send(ServerConfig::default(), request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "plain text");
}

#[tokio::test]
async fn test_gzip_request_body_is_decompressed() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(b"compressed hello").unwrap();
    let compressed = encoder.finish().unwrap();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/echo")
        .header(header::CONTENT_ENCODING, "gzip")
        .body(Body::from(compressed))
        .unwrap();
    let response = send(ServerConfig::default(), request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "compressed hello");
}

#[tokio::test]
async fn test_malformed_percent_escapes_are_rejected() {
    let response = get("/hello?message=%zzabc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "Error parsing query param 'message': Malformed percent-encoding"
    );

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/files/%zz")
        .body(Body::from("data"))
        .unwrap();
    let response = send(ServerConfig::default(), request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response)
        .await
        .starts_with("Error parsing path param 'name': Malformed percent-encoding"));
}
