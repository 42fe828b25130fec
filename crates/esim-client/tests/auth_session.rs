//! Integration tests for admin sign-in, sign-out and session persistence.

mod common;

use common::{build, fast_config, harness_at, unbound_base_url};
use esim_client::{FileStorage, MemoryStorage, SessionStorage, SessionStore, AUTH_TOKEN_KEY, AUTH_USER_KEY};
use esim_core::{Route, ADMIN_ROLE};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_persists_token_and_synthesized_user() {
    let h = harness_at(Route::AdminLogin).await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .and(body_json(json!({"email": "admin@esim.com.mm", "password": "s3cret!"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok_abc123",
            "token_type": "bearer",
            "expires_in": 86400
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    assert!(h.storefront.auth.login("admin@esim.com.mm", "s3cret!").await);

    assert!(h.storefront.auth.is_authenticated());
    assert!(h.storefront.auth.is_admin());
    assert_eq!(h.storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("tok_abc123"));

    let user: serde_json::Value =
        serde_json::from_str(&h.storage.get(AUTH_USER_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(user, json!({"email": "admin@esim.com.mm", "role": ADMIN_ROLE}));
}

#[tokio::test]
async fn test_login_then_authorized_request() {
    let h = harness_at(Route::AdminLogin).await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok_abc123"})))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard"))
        .and(header("Authorization", "Bearer tok_abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statistics": {
                "total_payments": 0,
                "completed_payments": 0,
                "pending_payments": 0,
                "failed_payments": 0,
                "success_rate": 0
            },
            "recent_transactions": [],
            "current_environment": "UAT"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    assert!(h.storefront.auth.login("admin@esim.com.mm", "s3cret!").await);
    let dashboard = h.storefront.admin_console().dashboard().await.unwrap();
    assert_eq!(dashboard.statistics.total_payments, 0);
}

#[tokio::test]
async fn test_login_without_token_is_false() {
    let h = harness_at(Route::AdminLogin).await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "bearer"})))
        .mount(&h.server)
        .await;

    assert!(!h.storefront.auth.login("admin@esim.com.mm", "s3cret!").await);
    assert!(!h.storefront.auth.is_authenticated());
    assert_eq!(h.storage.get(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(h.storage.get(AUTH_USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_login_rejected_credentials_is_false() {
    let h = harness_at(Route::AdminLogin).await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})))
        .mount(&h.server)
        .await;

    assert!(!h.storefront.auth.login("admin@esim.com.mm", "wrong-password").await);
    assert!(!h.storefront.auth.is_authenticated());
    assert!(h.navigator.history().is_empty());
}

#[tokio::test]
async fn test_login_network_failure_is_false() {
    let server = MockServer::start().await;
    let config = fast_config(&server.uri()).with_api_base_url(unbound_base_url());
    let h = build(server, config, Route::AdminLogin, Arc::new(MemoryStorage::new()));

    assert!(!h.storefront.auth.login("admin@esim.com.mm", "s3cret!").await);
    assert!(!h.storefront.auth.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let h = harness_at(Route::AdminDashboard).await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok_abc123"})))
        .mount(&h.server)
        .await;

    assert!(h.storefront.auth.login("admin@esim.com.mm", "s3cret!").await);
    h.storefront.auth.logout();

    assert!(!h.storefront.auth.is_authenticated());
    assert!(h.storefront.session.user().is_none());
    assert_eq!(h.storage.get(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(h.storage.get(AUTH_USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_session_survives_restart_with_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok_file"})))
        .mount(&server)
        .await;

    let config = fast_config(&server.uri()).with_session_file(&session_file);
    let navigator = Arc::new(esim_core::MemoryNavigator::starting_at(Route::AdminLogin));
    let first = esim_client::Storefront::with_file_session(config, navigator).unwrap();
    assert!(first.auth.login("admin@esim.com.mm", "s3cret!").await);

    let restored = SessionStore::load(Arc::new(FileStorage::new(&session_file)));
    assert!(restored.is_admin());
    assert_eq!(restored.token().as_deref(), Some("tok_file"));
}
