mod common;

use axum::http::StatusCode;
use common::{json_request, spawn_app, TestApp};
use hr_portal_backend::models::account::Role;
use hr_portal_backend::repository::AccountRepository;
use serde_json::{json, Value as JsonValue};

struct Pipeline {
    hr: String,
    candidate: String,
    application_id: String,
}

/// A job, an application from `email` and a candidate account owning that email.
async fn pipeline(app: &TestApp, email: &str) -> Pipeline {
    let hr = app.login_as(Role::HrManager).await;
    let job = app.create_job(&hr).await;
    let (status, application) = app.apply(job["id"].as_str().unwrap(), email).await;
    assert_eq!(status, StatusCode::CREATED, "{}", application);
    let account = app.create_account(email, Role::Candidate).await;
    Pipeline {
        candidate: app.token_for(&account),
        hr,
        application_id: application["id"].as_str().unwrap().to_string(),
    }
}

async fn extend_offer(app: &TestApp, hr: &str, application_id: &str) -> (StatusCode, JsonValue) {
    app.send(json_request(
        "POST",
        "/api/offers",
        Some(hr),
        Some(json!({
            "application_id": application_id,
            "position_title": "Backend Engineer",
            "department": "Engineering",
            "salary": "95000",
            "currency": "eur",
            "start_date": "2030-02-01",
            "benefits": "Remote budget"
        })),
    ))
    .await
}

async fn respond(app: &TestApp, token: &str, offer_id: &str, decision: &str) -> (StatusCode, JsonValue) {
    app.send(json_request(
        "POST",
        &format!("/api/candidate/offers/{}/respond", offer_id),
        Some(token),
        Some(json!({ "decision": decision })),
    ))
    .await
}

#[tokio::test]
async fn accepting_an_offer_hires_the_candidate() {
    let app = spawn_app();
    let flow = pipeline(&app, "hire.me@x.com").await;

    let (status, offer) = extend_offer(&app, &flow.hr, &flow.application_id).await;
    assert_eq!(status, StatusCode::CREATED, "{}", offer);
    assert_eq!(offer["status"], "PENDING");
    assert_eq!(offer["currency"], "EUR");
    assert_eq!(offer["candidate_email"], "hire.me@x.com");
    let offer_id = offer["id"].as_str().unwrap();

    let (_, application) = app
        .send(json_request(
            "GET",
            &format!("/api/applications/{}", flow.application_id),
            Some(&flow.hr),
            None,
        ))
        .await;
    assert_eq!(application["status"], "OFFERED");

    let (status, sent) = app
        .send(json_request("POST", &format!("/api/offers/{}/send", offer_id), Some(&flow.hr), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sent["status"], "SENT");

    let (status, mine) = app
        .send(json_request("GET", "/api/candidate/offers", Some(&flow.candidate), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, decision) = respond(&app, &flow.candidate, offer_id, "accept").await;
    assert_eq!(status, StatusCode::OK, "{}", decision);
    assert_eq!(decision["offer"]["status"], "ACCEPTED");
    assert_eq!(decision["application"]["status"], "HIRED");
    assert_eq!(decision["employee"]["department"], "Engineering");
    assert_eq!(decision["employee"]["position"], "Backend Engineer");
    assert_eq!(decision["employee"]["hire_date"], "2030-02-01");

    let (status, me) = app
        .send(json_request("GET", "/api/auth/me", Some(&flow.candidate), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["role"], "EMPLOYEE");

    let (status, employees) = app
        .send(json_request("GET", "/api/employees", Some(&flow.hr), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(employees
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["email"] == "hire.me@x.com"));

    let (status, _) = respond(&app, &flow.candidate, offer_id, "accept").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(
        app.sink.templates(),
        vec!["application_received", "offer_extended", "offer_sent", "welcome_aboard"]
    );
}

#[tokio::test]
async fn rejecting_an_offer_leaves_the_application_offered() {
    let app = spawn_app();
    let flow = pipeline(&app, "no.thanks@x.com").await;
    let (_, offer) = extend_offer(&app, &flow.hr, &flow.application_id).await;

    let (status, decision) = respond(&app, &flow.candidate, offer["id"].as_str().unwrap(), "REJECT").await;
    assert_eq!(status, StatusCode::OK, "{}", decision);
    assert_eq!(decision["offer"]["status"], "REJECTED");
    assert!(decision.get("application").is_none());

    let (_, application) = app
        .send(json_request(
            "GET",
            &format!("/api/applications/{}", flow.application_id),
            Some(&flow.hr),
            None,
        ))
        .await;
    assert_eq!(application["status"], "OFFERED");

    let account = app
        .store
        .find_account_by_email("no.thanks@x.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.role, Role::Candidate);

    // A closed offer no longer blocks a new one.
    let (status, _) = extend_offer(&app, &flow.hr, &flow.application_id).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn one_open_offer_per_application() {
    let app = spawn_app();
    let flow = pipeline(&app, "twice@x.com").await;
    let (_, first) = extend_offer(&app, &flow.hr, &flow.application_id).await;

    let (status, body) = extend_offer(&app, &flow.hr, &flow.application_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["existing_id"], first["id"]);
}

#[tokio::test]
async fn offers_are_private_to_their_candidate() {
    let app = spawn_app();
    let flow = pipeline(&app, "owner@x.com").await;
    let (_, offer) = extend_offer(&app, &flow.hr, &flow.application_id).await;
    let intruder = app.login_as(Role::Candidate).await;

    let (status, _) = respond(&app, &intruder, offer["id"].as_str().unwrap(), "accept").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, mine) = app
        .send(json_request("GET", "/api/candidate/offers", Some(&intruder), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(mine.as_array().unwrap().is_empty());

    let (status, _) = respond(&app, &flow.hr, offer["id"].as_str().unwrap(), "accept").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = respond(&app, &flow.candidate, offer["id"].as_str().unwrap(), "maybe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expired_offers_cannot_be_accepted() {
    let app = spawn_app();
    let flow = pipeline(&app, "late@x.com").await;
    let (status, offer) = app
        .send(json_request(
            "POST",
            "/api/offers",
            Some(&flow.hr),
            Some(json!({
                "application_id": flow.application_id,
                "position_title": "Analyst",
                "department": "Finance",
                "salary": "70000",
                "start_date": "2030-02-01",
                "expires_at": "2020-01-01T00:00:00Z"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", offer);
    assert_eq!(offer["currency"], "USD");

    let (status, _) = respond(&app, &flow.candidate, offer["id"].as_str().unwrap(), "accept").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn offer_validation_and_terminal_applications() {
    let app = spawn_app();
    let flow = pipeline(&app, "edge@x.com").await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/offers",
            Some(&flow.hr),
            Some(json!({
                "application_id": flow.application_id,
                "position_title": "Analyst",
                "department": "Finance",
                "salary": "0",
                "start_date": "2030-02-01"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].get("salary").is_some());

    app.send(json_request(
        "PATCH",
        &format!("/api/applications/{}/status", flow.application_id),
        Some(&flow.hr),
        Some(json!({ "status": "REJECTED" })),
    ))
    .await;
    let (status, _) = extend_offer(&app, &flow.hr, &flow.application_id).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let employee = app.login_as(Role::Employee).await;
    let (status, _) = extend_offer(&app, &employee, &flow.application_id).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn only_pending_offers_are_sent() {
    let app = spawn_app();
    let flow = pipeline(&app, "send@x.com").await;
    let (_, offer) = extend_offer(&app, &flow.hr, &flow.application_id).await;
    let uri = format!("/api/offers/{}/send", offer["id"].as_str().unwrap());

    let (status, _) = app.send(json_request("POST", &uri, Some(&flow.hr), None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.send(json_request("POST", &uri, Some(&flow.hr), None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn candidates_manage_their_own_applications() {
    let app = spawn_app();
    let flow = pipeline(&app, "mine@x.com").await;

    let (status, body) = app
        .send(json_request("GET", "/api/candidate/applications", Some(&flow.candidate), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);

    let (status, _) = app
        .send(json_request(
            "GET",
            "/api/candidate/applications?email=someone.else@x.com",
            Some(&flow.candidate),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(json_request(
            "GET",
            "/api/candidate/applications?email=mine@x.com",
            Some(&flow.hr),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);

    let withdraw_uri = format!("/api/candidate/applications/{}/withdraw", flow.application_id);
    let intruder = app.login_as(Role::Candidate).await;
    let (status, _) = app
        .send(json_request("POST", &withdraw_uri, Some(&intruder), None))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(json_request("POST", &withdraw_uri, Some(&flow.candidate), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "WITHDRAWN");

    let (status, _) = app
        .send(json_request("POST", &withdraw_uri, Some(&flow.candidate), None))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
