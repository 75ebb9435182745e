mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use common::{ADMIN_PASSWORD, CAIXA_PASSWORD, app, post_json, send, test_config};
use serde_json::json;
use uniform_checkout::{
    config::Config,
    utils::{Role, verify_token},
};

#[tokio::test]
async fn test_admin_login() {
    let config = test_config();
    let app = app(config.clone());

    let before = chrono::Utc::now().timestamp_millis();
    let (status, body) = send(
        &app,
        post_json("/api/auth/login", &json!({ "password": ADMIN_PASSWORD }).to_string()),
    )
    .await;
    let after = chrono::Utc::now().timestamp_millis();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["type"], "admin");

    let expires_at = body["expiresAt"].as_i64().unwrap();
    assert!(expires_at >= before + 3_600_000 && expires_at <= after + 3_600_000);

    let claims = verify_token(body["token"].as_str().unwrap(), &config, after).unwrap();
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.expires_at, expires_at);
}

#[tokio::test]
async fn test_cashier_login() {
    let config = test_config();
    let app = app(config.clone());

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/login",
            &json!({ "password": CAIXA_PASSWORD, "type": "caixa" }).to_string(),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "caixa");
    let claims = verify_token(body["token"].as_str().unwrap(), &config, 0).unwrap();
    assert_eq!(claims.role, Role::Cashier);
}

#[tokio::test]
async fn test_non_string_type_means_admin() {
    let app = app(test_config());

    for login_type in [json!(1), json!(true), json!({ "role": "caixa" }), json!(null)] {
        let (status, body) = send(
            &app,
            post_json(
                "/api/auth/login",
                &json!({ "password": ADMIN_PASSWORD, "type": login_type }).to_string(),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "admin");
    }
}

#[tokio::test]
async fn test_wrong_password() {
    let app = app(Config {
        caixa_password: Some("y".into()),
        ..test_config()
    });

    let (status, body) = send(
        &app,
        post_json("/api/auth/login", r#"{"password":"x","type":"caixa"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Senha incorreta" }));
}

#[tokio::test]
async fn test_cashier_password_does_not_open_admin() {
    let app = app(test_config());

    let (status, body) = send(
        &app,
        post_json("/api/auth/login", &json!({ "password": CAIXA_PASSWORD }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_unset_secret_is_server_error() {
    let app = app(Config {
        admin_password: None,
        ..test_config()
    });

    for password in [ADMIN_PASSWORD, "", "anything"] {
        let (status, body) = send(
            &app,
            post_json("/api/auth/login", &json!({ "password": password }).to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
        assert!(body.get("token").is_none());
    }
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app(test_config());

    let (status, body) = send(&app, post_json("/api/auth/login", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, post_json("/api/auth/login", r#"{"type":"caixa"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tokens_carry_fresh_nonces() {
    let config = test_config();
    let app = app(config.clone());
    let body = json!({ "password": ADMIN_PASSWORD }).to_string();

    let (_, first) = send(&app, post_json("/api/auth/login", &body)).await;
    let (_, second) = send(&app, post_json("/api/auth/login", &body)).await;

    assert_ne!(first["token"], second["token"]);
    let first = verify_token(first["token"].as_str().unwrap(), &config, 0).unwrap();
    let second = verify_token(second["token"].as_str().unwrap(), &config, 0).unwrap();
    assert_ne!(first.nonce, second.nonce);
}

#[tokio::test]
async fn test_login_rate_limited() {
    let app = app(Config {
        rate_limit_requests: 2,
        ..test_config()
    });

    let attempt = || {
        let mut request = post_json("/api/auth/login", r#"{"password":"guess"}"#);
        request
            .headers_mut()
            .insert("x-real-ip", "203.0.113.50".parse().unwrap());
        request
    };

    assert_eq!(send(&app, attempt()).await.0, StatusCode::UNAUTHORIZED);
    assert_eq!(send(&app, attempt()).await.0, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, attempt()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap().starts_with("Muitas tentativas"));
}

#[tokio::test]
async fn test_check_session() {
    let app = app(test_config());

    let (_, login) = send(
        &app,
        post_json(
            "/api/auth/login",
            &json!({ "password": CAIXA_PASSWORD, "type": "caixa" }).to_string(),
        ),
    )
    .await;
    let token = login["token"].as_str().unwrap();

    let request = Request::builder()
        .uri("/api/auth/session")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["type"], "caixa");
    assert_eq!(body["expiresAt"], login["expiresAt"]);
}

#[tokio::test]
async fn test_check_session_rejects_bad_tokens() {
    let app = app(test_config());

    let missing = Request::builder()
        .uri("/api/auth/session")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, missing).await.0, StatusCode::UNAUTHORIZED);

    let garbage = Request::builder()
        .uri("/api/auth/session")
        .header(AUTHORIZATION, "Bearer abc.def.ghi")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, garbage).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    // signed by a different deployment
    let other = Config {
        token_secret: "someone-else".into(),
        ..test_config()
    };
    let (foreign, _) = uniform_checkout::utils::generate_token(
        Role::Admin,
        &other,
        chrono::Utc::now().timestamp_millis(),
    )
    .unwrap();
    let request = Request::builder()
        .uri("/api/auth/session")
        .header(AUTHORIZATION, format!("Bearer {foreign}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, request).await.0, StatusCode::UNAUTHORIZED);
}
