#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::Value;
use tower::ServiceExt;
use uniform_checkout::{AppState, config::Config, router::create_router};

pub const ADMIN_PASSWORD: &str = "correct-admin-pw";
pub const CAIXA_PASSWORD: &str = "correct-caixa-pw";

pub fn test_config() -> Config {
    Config {
        admin_password: Some(ADMIN_PASSWORD.into()),
        caixa_password: Some(CAIXA_PASSWORD.into()),
        token_secret: "integration-test-secret".into(),
        upstream_timeout_secs: 2,
        ..Config::default()
    }
}

pub fn app(config: Config) -> Router {
    create_router(AppState::new(config).unwrap())
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
