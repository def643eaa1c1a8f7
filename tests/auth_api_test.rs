mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{json_request, spawn_app, PASSWORD};
use hr_portal_backend::models::account::Role;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn login_issues_token_usable_on_me() {
    let app = spawn_app();
    app.create_account("hr@example.com", Role::HrManager).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "HR@example.com", "password": PASSWORD })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["account"]["role"], "HR_MANAGER");
    assert!(body["account"].get("password_hash").is_none());

    let token = body["token"].as_str().unwrap();
    let (status, me) = app
        .send(json_request("GET", "/api/auth/me", Some(token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "hr@example.com");
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_unauthenticated() {
    let app = spawn_app();
    app.create_account("admin@example.com", Role::Admin).await;

    for (email, password) in [("admin@example.com", "nope"), ("ghost@example.com", PASSWORD)] {
        let (status, body) = app
            .send(json_request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            ))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthenticated");
    }
}

#[tokio::test]
async fn register_creates_candidate_and_rejects_duplicates() {
    let app = spawn_app();
    let payload = json!({
        "email": "cand@example.com",
        "password": "long-enough-password",
        "full_name": "Grace Hopper"
    });

    let (status, body) = app
        .send(json_request("POST", "/api/auth/register", None, Some(payload.clone())))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["account"]["role"], "CANDIDATE");

    let (status, body) = app
        .send(json_request("POST", "/api/auth/register", None, Some(payload)))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn register_validates_fields() {
    let app = spawn_app();
    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "email": "not-an-email", "password": "short", "full_name": "" })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");
    assert!(body["details"].get("email").is_some());
    assert!(body["details"].get("password").is_some());
}

#[tokio::test]
async fn missing_malformed_and_expired_tokens_are_rejected() {
    let app = spawn_app();
    let account = app.create_account("emp@example.com", Role::Employee).await;
    let expired = app
        .state
        .tokens
        .issue_with_ttl(account.id, &account.email, account.role, Duration::minutes(-5))
        .unwrap()
        .token;

    let (status, _) = app.send(json_request("GET", "/api/jobs", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(json_request("GET", "/api/jobs", Some("garbage.token.value"), None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(json_request("GET", "/api/jobs", Some(&expired), None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid_token");

    let forged = hr_portal_backend::utils::token::TokenService::new("another-secret", 60)
        .issue(Uuid::new_v4(), "x@example.com", Role::Admin)
        .unwrap()
        .token;
    let (status, _) = app
        .send(json_request("GET", "/api/jobs", Some(&forged), None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deactivated_accounts_cannot_log_in() {
    let app = spawn_app();
    let admin = app.login_as(Role::Admin).await;
    let target = app.create_account("leaver@example.com", Role::Employee).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            &format!("/api/accounts/{}/deactivate", target.id),
            Some(&admin),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["is_active"], false);

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "leaver@example.com", "password": PASSWORD })),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "account_deactivated");
}

#[tokio::test]
async fn seed_admin_runs_once() {
    let app = spawn_app();
    let first = app
        .state
        .auth_service
        .seed_admin("root@example.com", "bootstrap-password")
        .await
        .unwrap();
    assert!(first.is_some());
    let second = app
        .state
        .auth_service
        .seed_admin("other@example.com", "bootstrap-password")
        .await
        .unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn health_is_public() {
    let app = spawn_app();
    let (status, body) = app.send(json_request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
