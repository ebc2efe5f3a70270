#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use menu_server::db::DbService;
use menu_server::{Config, ServerState, build_router};
use serde_json::Value;
use tower::ServiceExt;

/// Router over a fresh in-memory database
pub async fn app() -> Router {
    let db = DbService::in_memory().await.unwrap();
    let state = ServerState::new(Config::default(), db).unwrap();
    build_router(state)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

/// POST that must succeed; returns the JSON body
pub async fn create(app: &Router, uri: &str, body: Value) -> Value {
    let (status, value) = post(app, uri, body).await;
    assert_eq!(status, StatusCode::OK, "POST {uri} failed: {value}");
    value
}

pub fn id(value: &Value) -> i64 {
    value["id"].as_i64().unwrap()
}
