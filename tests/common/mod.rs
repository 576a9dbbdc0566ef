//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use apibind::api::{controller, ControllerDef, OperationDef, OutputDef, ParamDef, Schema};
use apibind::config::ServerConfig;
use apibind::hello::hello_controller;
use apibind::lifecycle::Shutdown;
use apibind::server::{ApiResult, ControllerImpl, Dispatcher, HandlerError, HttpError, Input, Json};
use apibind::HttpServer;

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub age: u32,
}

/// An API touching every parameter location and output kind.
pub fn showcase_definition() -> ControllerDef {
    controller("/api")
        .operation(
            "getUser",
            OperationDef::get("/users/{userId}")
                .input("userId", ParamDef::path(Schema::integer()))
                .input("verbose", ParamDef::query(Schema::boolean().optional()))
                .input("token", ParamDef::header(Schema::string().optional(), "x-token"))
                .input("session", ParamDef::cookie(Schema::string().optional()))
                .output(OutputDef::json()),
        )
        .operation(
            "createUser",
            OperationDef::post("/users")
                .input("user", ParamDef::body(Schema::object().typed::<NewUser>()))
                .output(OutputDef::json()),
        )
        .operation(
            "deleteUser",
            OperationDef::delete("/users/{userId}").input("userId", ParamDef::path(Schema::integer())),
        )
        .operation(
            "upload",
            OperationDef::put("/files/{name}")
                .input("name", ParamDef::path(Schema::string()))
                .input("data", ParamDef::body_binary())
                .output(OutputDef::binary()),
        )
        .operation(
            "echo",
            OperationDef::post("/echo")
                .input("text", ParamDef::body_text())
                .output(OutputDef::text()),
        )
        .operation("explode", OperationDef::get("/explode"))
        .define()
        .expect("showcase definition is valid")
}

async fn get_user(input: Input) -> Result<Json<serde_json::Value>, HandlerError> {
    let id: i64 = input.parse("userId")?.unwrap_or_default();
    Ok(Json(json!({
        "id": id,
        "verbose": input.parse::<bool>("verbose")?.unwrap_or(false),
        "token": input.str("token"),
        "session": input.str("session"),
    })))
}

async fn create_user(input: Input) -> Result<ApiResult, HandlerError> {
    let user: NewUser = input
        .parse("user")?
        .ok_or_else(|| HttpError::bad_request("missing user"))?;
    Ok(ApiResult::new(json!({ "id": 7, "name": user.name, "age": user.age }))
        .status(StatusCode::CREATED)
        .header("location", "/api/users/7")
        .cookie("created", 7)
        .cookie("owner", user.name))
}

async fn delete_user(input: Input) -> Result<(), HandlerError> {
    let id: i64 = input.parse("userId")?.unwrap_or_default();
    if id == 1 {
        return Err(HttpError::new(StatusCode::FORBIDDEN).into());
    }
    Ok(())
}

async fn upload(input: Input) -> Result<Bytes, HandlerError> {
    Ok(input.bytes("data").cloned().unwrap_or_default())
}

async fn echo(input: Input) -> Result<String, HandlerError> {
    Ok(input.str("text").unwrap_or_default().to_string())
}

async fn explode(_input: Input) -> Result<(), HandlerError> {
    Err(HandlerError::unexpected("boom"))
}

pub fn showcase_controller() -> ControllerImpl {
    showcase_definition()
        .implement()
        .handler("getUser", get_user)
        .handler("createUser", create_user)
        .handler("deleteUser", delete_user)
        .handler("upload", upload)
        .handler("echo", echo)
        .handler("explode", explode)
        .build()
        .expect("every operation has a handler")
}

pub fn dispatcher() -> Dispatcher {
    Dispatcher::builder()
        .controller(hello_controller().expect("hello controller is valid"))
        .controller(showcase_controller())
        .build()
        .expect("no route conflicts")
}

pub fn test_server(config: ServerConfig) -> HttpServer {
    HttpServer::new(config, dispatcher())
}

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Arc<Shutdown>,
    handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Trigger graceful shutdown and wait for the server task.
    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle
            .await
            .expect("server task panicked")
            .expect("server failed");
    }
}

pub async fn spawn_server(config: ServerConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Arc::new(Shutdown::new());
    let signalled = shutdown.signalled();
    let server = test_server(config);
    let handle = tokio::spawn(async move { server.run(listener, signalled).await });
    TestServer {
        addr,
        shutdown,
        handle,
    }
}
