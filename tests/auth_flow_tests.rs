mod common;

use std::fs;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use catalog::config::CONFIG;
use catalog::db::models::Role;
use catalog::middleware::auth::Claims;
use catalog::{CatalogState, catalog_router};
use jsonwebtoken::{EncodingKey, Header, encode};
use tower::ServiceExt;

async fn test_app(tag: &str) -> (Router, catalog::db::Store, std::path::PathBuf) {
    let (store, path) = common::temp_store(tag).await;
    let app = catalog_router(CatalogState {
        store: store.clone(),
    });
    (app, store, path)
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn cookie_value(resp: &axum::response::Response<Body>, name: &str) -> Option<String> {
    for header in resp.headers().get_all(header::SET_COOKIE) {
        let raw = header.to_str().ok()?;
        if let Some(rest) = raw.strip_prefix(&format!("{name}=")) {
            let value = rest.split(';').next().unwrap_or("");
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

async fn register_and_login(app: &Router, email: &str) -> (String, String) {
    let resp = app
        .clone()
        .oneshot(json_request(
            "/auth/register",
            serde_json::json!({
                "name": "Test User",
                "email": email,
                "password": "s3cret",
                "confirmPassword": "s3cret",
            }),
        ))
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .oneshot(json_request(
            "/auth/login",
            serde_json::json!({ "email": email, "password": "s3cret" }),
        ))
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let access = cookie_value(&resp, "access_token").expect("no access cookie set");
    let refresh = cookie_value(&resp, "refresh_token").expect("no refresh cookie set");
    (access, refresh)
}

#[tokio::test]
async fn login_sets_cookies_and_me_returns_profile() {
    let (app, _store, path) = test_app("auth-login").await;

    let (access, refresh) = register_and_login(&app, "user@example.com").await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(
                    header::COOKIE,
                    format!("access_token={access}; refresh_token={refresh}"),
                )
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("me request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let profile: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(profile["email"], "user@example.com");
    assert_eq!(profile["role"], "user");

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (app, _store, path) = test_app("auth-wrong-password").await;

    register_and_login(&app, "user@example.com").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "/auth/login",
            serde_json::json!({ "email": "user@example.com", "password": "nope" }),
        ))
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn protected_route_without_cookie_is_rejected() {
    let (app, _store, path) = test_app("auth-no-cookie").await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("me request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn expired_access_token_is_reissued_from_refresh_token() {
    let (app, _store, path) = test_app("auth-reissue").await;

    let (_access, refresh) = register_and_login(&app, "user@example.com").await;

    // Well past the verifier's 60s leeway.
    let now = chrono::Utc::now().timestamp();
    let expired = encode(
        &Header::default(),
        &Claims {
            sub: "user@example.com".to_string(),
            role: Role::User,
            iat: now - 7200,
            exp: now - 3600,
        },
        &EncodingKey::from_secret(CONFIG.access_token_secret.as_bytes()),
    )
    .unwrap();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(
                    header::COOKIE,
                    format!("access_token={expired}; refresh_token={refresh}"),
                )
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("me request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        cookie_value(&resp, "access_token").is_some(),
        "expected a reissued access cookie"
    );

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn logout_revokes_the_refresh_token() {
    let (app, store, path) = test_app("auth-logout").await;

    let (_access, refresh) = register_and_login(&app, "user@example.com").await;
    assert!(store.refresh_token_exists(&refresh).await.unwrap());

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header(header::COOKIE, format!("refresh_token={refresh}"))
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("logout request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!store.refresh_token_exists(&refresh).await.unwrap());

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn regular_users_cannot_list_users() {
    let (app, _store, path) = test_app("auth-forbidden").await;

    let (access, refresh) = register_and_login(&app, "user@example.com").await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users")
                .header(
                    header::COOKIE,
                    format!("access_token={access}; refresh_token={refresh}"),
                )
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("users request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let _ = fs::remove_file(&path);
}
