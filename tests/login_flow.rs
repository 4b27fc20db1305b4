// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! End-to-end: log in, then use the returned header on a protected route.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use tower::ServiceExt;

use user_auth_server::{
    api::router,
    auth::{FixedClock, InMemoryCredentials, RoleSet, SystemClock, TokenService},
    config::SigningConfiguration,
    state::AppState,
};

const ISSUER: &str = "https://auth.example.com";
const AUDIENCE: &str = "user-service";
const SECRET: &str = "integration secret";

fn signing(expiration_millis: u64) -> SigningConfiguration {
    SigningConfiguration::new(SECRET, ISSUER, AUDIENCE, expiration_millis).unwrap()
}

fn app() -> Router {
    let credentials = InMemoryCredentials::new().with_account(
        "admin",
        "admin123",
        ["ADMIN", "USER"].into_iter().collect(),
    );
    router(AppState::new(
        TokenService::new(signing(60_000), Arc::new(SystemClock)),
        credentials,
    ))
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Option<String>) {
    let body = serde_json::json!({ "username": username, "password": password }).to_string();
    let response = app
        .clone()
        .oneshot(
            Request::post("/login")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let header = response
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap().to_string());
    (response.status(), header)
}

async fn get_me(app: &Router, authorization: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::get("/api/users/me");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn login_then_access_protected_route() {
    let app = app();

    let (status, header) = login(&app, "admin", "admin123").await;
    assert_eq!(status, StatusCode::OK);
    let header = header.expect("login must return an Authorization header");

    let (status, body) = get_me(&app, Some(header.as_str())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "admin");
    assert_eq!(body["authorities"], serde_json::json!(["ROLE_ADMIN", "ROLE_USER"]));
}

#[tokio::test]
async fn issued_token_carries_expected_claims() {
    let app = app();
    let (_, header) = login(&app, "admin", "admin123").await;
    let header = header.unwrap();

    let token = header.strip_prefix("Bearer ").unwrap();
    let payload = token.split('.').nth(1).unwrap();
    let claims: serde_json::Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();

    assert_eq!(claims["sub"], "admin");
    assert_eq!(claims["roles"], serde_json::json!(["ADMIN", "USER"]));
    assert_eq!(claims["iss"], ISSUER);
    assert_eq!(claims["aud"], AUDIENCE);
    assert_eq!(
        claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap(),
        60
    );
}

#[tokio::test]
async fn failed_login_returns_no_token() {
    let app = app();

    let (status, header) = login(&app, "admin", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(header.is_none());

    let (status, header) = login(&app, "nobody", "admin123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(header.is_none());
}

#[tokio::test]
async fn tampered_token_is_unauthenticated() {
    let app = app();
    let (_, header) = login(&app, "admin", "admin123").await;
    let mut header = header.unwrap();

    let last = header.pop().unwrap();
    header.push(if last == 'A' { 'B' } else { 'A' });

    let (status, _) = get_me(&app, Some(header.as_str())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_header_is_unauthenticated() {
    let (status, body) = get_me(&app(), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "missing_authentication");
}

#[test]
fn fixed_clock_scenario() {
    let roles: RoleSet = ["ADMIN", "USER"].into_iter().collect();
    let at = |instant: &str| {
        TokenService::new(signing(1000), Arc::new(FixedClock::parse(instant).unwrap()))
    };

    let issued = at("2020-04-09T20:54:43Z").issue("admin", &roles).unwrap();
    assert_eq!(issued.issued_at.timestamp(), 1586465683);
    assert_eq!(issued.expires_at.timestamp(), 1586465684);

    let auth = at("2020-04-09T20:54:43.999Z")
        .try_authenticate(&issued.token)
        .unwrap();
    assert_eq!(auth.principal(), "admin");
    assert_eq!(auth.roles(), &roles);

    assert!(at("2020-04-09T20:54:44Z").try_authenticate(&issued.token).is_none());
    assert!(at("2020-04-09T20:54:45Z").try_authenticate(&issued.token).is_none());
}
