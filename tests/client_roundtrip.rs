//! Client calls against a server on an ephemeral port.

use bytes::Bytes;
use serde_json::json;

use apibind::api::Payload;
use apibind::client::{ApiClient, ClientError, ClientInput, ClientRequest};
use apibind::config::ServerConfig;
use apibind::hello::{hello_definition, SAY_HELLO};

mod common;

#[tokio::test]
async fn test_hello_round_trip() {
    let server = common::spawn_server(ServerConfig::default()).await;
    let client = ApiClient::new(hello_definition().unwrap(), server.endpoint());

    let greeting = client.call(SAY_HELLO, ClientInput::new()).await.unwrap();
    assert_eq!(greeting, Some(Payload::Text("Hello world".into())));

    let greeting = client
        .call(SAY_HELLO, ClientInput::new().with("message", "Joe & friends"))
        .await
        .unwrap();
    assert_eq!(greeting, Some(Payload::Text("Hello Joe & friends".into())));

    let err = client
        .call(SAY_HELLO, ClientInput::new().with("message", "Jo"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));

    server.stop().await;
}

#[tokio::test]
async fn test_showcase_round_trip() {
    let server = common::spawn_server(ServerConfig::default()).await;
    let client = ApiClient::new(common::showcase_definition(), server.endpoint());

    let user = client
        .call(
            "getUser",
            ClientInput::new()
                .with("userId", 5)
                .with("verbose", true)
                .with("token", "t0k")
                .with("session", "s1"),
        )
        .await
        .unwrap();
    assert_eq!(
        user,
        Some(Payload::Json(
            json!({"id": 5, "verbose": true, "token": "t0k", "session": "s1"})
        ))
    );

    let created = client
        .call(
            "createUser",
            ClientInput::new().with("user", json!({"name": "Ann", "age": 30})),
        )
        .await
        .unwrap();
    assert_eq!(
        created,
        Some(Payload::Json(json!({"id": 7, "name": "Ann", "age": 30})))
    );

    let bytes = Bytes::from_static(&[1, 2, 3, 254]);
    let echoed = client
        .call(
            "upload",
            ClientInput::new().with("name", "a b.bin").with("data", bytes.clone()),
        )
        .await
        .unwrap();
    assert_eq!(echoed, Some(Payload::Binary(bytes)));

    let deleted = client
        .call("deleteUser", ClientInput::new().with("userId", 2))
        .await
        .unwrap();
    assert_eq!(deleted, None);

    server.stop().await;
}

#[tokio::test]
async fn test_errors_map_to_client_errors() {
    let server = common::spawn_server(ServerConfig::default()).await;
    let client = ApiClient::new(common::showcase_definition(), server.endpoint());

    let err = client
        .call("deleteUser", ClientInput::new().with("userId", 1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Http { status: 403, ref message } if message == "Forbidden"
    ));

    let err = client.call("explode", ClientInput::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    server.stop().await;
}

#[tokio::test]
async fn test_interceptor_rewrites_request() {
    let server = common::spawn_server(ServerConfig::default()).await;
    let client = ApiClient::new(common::showcase_definition(), server.endpoint())
        .with_interceptor(|mut request: ClientRequest| async move {
            request
                .headers
                .insert("x-token".to_string(), "from-interceptor".to_string());
            Ok::<_, ClientError>(request)
        });

    let user = client
        .call("getUser", ClientInput::new().with("userId", 9))
        .await
        .unwrap();
    let token = user.as_ref().and_then(|p| p.as_json()).map(|v| v["token"].clone());
    assert_eq!(token, Some(json!("from-interceptor")));

    server.stop().await;
}

#[tokio::test]
async fn test_interceptor_failure_reaches_caller() {
    let server = common::spawn_server(ServerConfig::default()).await;
    let client = ApiClient::new(common::showcase_definition(), server.endpoint()).with_interceptor(
        |_request: ClientRequest| async move {
            Err::<ClientRequest, _>(ClientError::Interceptor("no credentials available".into()))
        },
    );

    let err = client
        .call("getUser", ClientInput::new().with("userId", 9))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Interceptor(_)));
    assert_eq!(err.to_string(), "Interceptor failed: no credentials available");
    assert_eq!(err.status(), None);

    server.stop().await;
}
